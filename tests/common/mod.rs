//! Synthetic JPEG cover images for integration tests, built with the
//! crate's own container assembler rather than shipped as binary
//! fixtures.

use stegano::jpeg::container;
use stegano::jpeg::header::{Component, Header};
use stegano::jpeg::mcu::Mcu;

fn quant_segment(destination: u8) -> Vec<u8> {
    let mut segment = vec![0xFF, 0xDB, 0x00, 0x43, destination];
    segment.extend([1u8; 64]);
    segment
}

/// A single-component grayscale cover image of the given pixel
/// dimensions, with every AC coefficient set to `fill` (a value whose
/// magnitude is >= 2, so the whole image is JSteg-usable).
pub fn grayscale_cover(width: u16, height: u16, fill: i32) -> Vec<u8> {
    let header = Header {
        precision: 8,
        width,
        height,
        components: vec![Component {
            identifier: 1,
            h_samp: 1,
            v_samp: 1,
            quant_table_number: 0,
            dc_huff_id: 0,
            ac_huff_id: 0,
        }],
        quant_tables: Vec::new(),
        quant_table_segments: vec![quant_segment(0)],
        dc_huffman_tables: [None, None, None, None],
        ac_huffman_tables: [None, None, None, None],
        restart_interval: 0,
        app0_payload: None,
        start_of_selection: 0,
        end_of_selection: 63,
        successive_approx_high: 0,
        successive_approx_low: 0,
        zero_based: false,
        entropy_offset: 0,
    };

    let b_width = (width as usize).div_ceil(8);
    let b_height = (height as usize).div_ceil(8);
    let mcu_count = b_width * b_height;

    let mcus: Vec<Mcu> = (0..mcu_count)
        .map(|_| {
            let mut mcu = Mcu::new(1, 0);
            mcu.luma[0].ac = [fill; 63];
            mcu
        })
        .collect();

    container::assemble(&header, &mcus).expect("synthetic grayscale cover must assemble")
}

/// A 4:2:0 YCbCr cover image (luma sampling 2x2) of the given pixel
/// dimensions, both required to be multiples of 16, with every AC
/// coefficient set to `fill`.
pub fn color_cover(width: u16, height: u16, fill: i32) -> Vec<u8> {
    let header = Header {
        precision: 8,
        width,
        height,
        components: vec![
            Component {
                identifier: 1,
                h_samp: 2,
                v_samp: 2,
                quant_table_number: 0,
                dc_huff_id: 0,
                ac_huff_id: 0,
            },
            Component {
                identifier: 2,
                h_samp: 1,
                v_samp: 1,
                quant_table_number: 1,
                dc_huff_id: 1,
                ac_huff_id: 1,
            },
            Component {
                identifier: 3,
                h_samp: 1,
                v_samp: 1,
                quant_table_number: 1,
                dc_huff_id: 1,
                ac_huff_id: 1,
            },
        ],
        quant_tables: Vec::new(),
        quant_table_segments: vec![quant_segment(0), quant_segment(1)],
        dc_huffman_tables: [None, None, None, None],
        ac_huffman_tables: [None, None, None, None],
        restart_interval: 0,
        app0_payload: None,
        start_of_selection: 0,
        end_of_selection: 63,
        successive_approx_high: 0,
        successive_approx_low: 0,
        zero_based: false,
        entropy_offset: 0,
    };

    let b_width = (width as usize).div_ceil(8);
    let b_height = (height as usize).div_ceil(8);
    let mcu_count = (b_width * b_height) / 4;

    let mcus: Vec<Mcu> = (0..mcu_count)
        .map(|_| {
            let mut mcu = Mcu::new(4, 2);
            for channel in mcu.luma.iter_mut().chain(mcu.chroma.iter_mut()) {
                channel.ac = [fill; 63];
            }
            mcu
        })
        .collect();

    container::assemble(&header, &mcus).expect("synthetic colour cover must assemble")
}
