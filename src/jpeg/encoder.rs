//! Re-emits an MCU sequence as a Huffman-coded, 0xFF00-stuffed byte
//! stream using the canonical JFIF Annex K.3.3 tables.
//!
//! The coefficient distribution after JSteg embedding no longer
//! matches whatever tables the source image shipped, so encoding
//! always targets the fixed standard tables rather than the ones
//! parsed from the cover image.

use log::info;

use super::huffman::HuffmanTable;
use super::mcu::{Channel, Mcu};
use super::tables::{
    standard_ac_chrominance, standard_ac_luminance, standard_dc_chrominance,
    standard_dc_luminance,
};
use crate::bitio::BitWriter;
use crate::error::Result;

/// Minimum number of bits needed to represent `|value|` (0 for 0).
fn bit_length(value: i32) -> u8 {
    if value == 0 {
        0
    } else {
        32 - value.unsigned_abs().leading_zeros() as u8
    }
}

/// Convert a signed coefficient into its `size`-bit JPEG wire
/// representation: the one's-complement-flavoured encoding where a
/// negative value is first decremented by one before truncation to
/// `size` bits. This, together with `sign_extend` in the decoder, is
/// the single place the ± asymmetry of JPEG's coefficient encoding is
/// stated.
fn to_wire_bits(value: i32, size: u8) -> u32 {
    if size == 0 {
        return 0;
    }
    let mask = (1u32 << size) - 1;
    if value < 0 {
        ((value - 1) as u32) & mask
    } else {
        value as u32 & mask
    }
}

fn encode_block(
    writer: &mut BitWriter,
    channel: &Channel,
    dc_table: &HuffmanTable,
    ac_table: &HuffmanTable,
) -> Result<()> {
    let dc_size = bit_length(channel.dc);
    let (dc_code, dc_len) = dc_table.symbol_to_code(dc_size)?;
    writer.write_code(dc_code as u32, dc_len);
    writer.write_code(to_wire_bits(channel.dc, dc_size), dc_size);

    let mut zero_run = 0u32;
    let mut last_nonzero = None;
    for (index, &value) in channel.ac.iter().enumerate() {
        if value != 0 {
            last_nonzero = Some(index);
        }
    }

    for (index, &value) in channel.ac.iter().enumerate() {
        if value == 0 {
            zero_run += 1;
            if last_nonzero.map(|l| index > l).unwrap_or(true) {
                // Trailing zeros past the last nonzero: stop, EOB
                // handled after the loop.
                break;
            }
            continue;
        }
        while zero_run > 15 {
            let (code, len) = ac_table.symbol_to_code(0xF0)?;
            writer.write_code(code as u32, len);
            zero_run -= 16;
        }
        let size = bit_length(value);
        let symbol = ((zero_run as u8) << 4) | size;
        let (code, len) = ac_table.symbol_to_code(symbol)?;
        writer.write_code(code as u32, len);
        writer.write_code(to_wire_bits(value, size), size);
        zero_run = 0;
    }

    if last_nonzero != Some(62) {
        let (code, len) = ac_table.symbol_to_code(0x00)?;
        writer.write_code(code as u32, len);
    }

    Ok(())
}

/// Encode `mcus` into a standalone entropy-coded byte stream (already
/// 0xFF00-stuffed; no restart markers are ever emitted).
pub fn encode(mcus: &[Mcu]) -> Result<Vec<u8>> {
    let dc_luma = standard_dc_luminance();
    let ac_luma = standard_ac_luminance();
    let dc_chroma = standard_dc_chrominance();
    let ac_chroma = standard_ac_chrominance();

    let mut writer = BitWriter::new();
    for mcu in mcus {
        for channel in &mcu.luma {
            encode_block(&mut writer, channel, &dc_luma, &ac_luma)?;
        }
        for channel in &mcu.chroma {
            encode_block(&mut writer, channel, &dc_chroma, &ac_chroma)?;
        }
    }
    info!("encoded {} MCUs", mcus.len());
    Ok(writer.pad_and_finish())
}
