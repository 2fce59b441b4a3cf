//! Typed representation of the segments that precede the entropy-coded
//! scan: SOF0, DQT, DHT, DRI, APP0 and SOS.

use super::huffman::HuffmanTable;

/// A single SOF0/SOS component record.
#[derive(Debug, Clone)]
pub struct Component {
    pub identifier: u8,
    pub h_samp: u8,
    pub v_samp: u8,
    pub quant_table_number: u8,
    pub dc_huff_id: u8,
    pub ac_huff_id: u8,
}

/// One quantisation table as read from a DQT segment.
#[derive(Debug, Clone)]
pub struct QuantTable {
    pub destination: u8,
    /// 0 = 8-bit entries, 1 = 16-bit entries, as encoded in the DQT
    /// precision nibble.
    pub precision: u8,
    /// 64 entries in zig-zag order, exactly as read from the wire.
    pub values: [u16; 64],
}

/// The fully validated, read-only-after-SOS container header.
#[derive(Debug, Clone)]
pub struct Header {
    pub precision: u8,
    pub width: u16,
    pub height: u16,
    pub components: Vec<Component>,
    pub quant_tables: Vec<QuantTable>,
    /// Raw DQT segment bytes (marker + length + payload), preserved
    /// verbatim so the container writer can re-emit them unchanged.
    pub quant_table_segments: Vec<Vec<u8>>,
    pub dc_huffman_tables: [Option<HuffmanTable>; 4],
    pub ac_huffman_tables: [Option<HuffmanTable>; 4],
    pub restart_interval: u16,
    pub app0_payload: Option<Vec<u8>>,
    pub start_of_selection: u8,
    pub end_of_selection: u8,
    pub successive_approx_high: u8,
    pub successive_approx_low: u8,
    /// Set if any component identifier was read as 0, in which case
    /// every identifier was remapped `id + 1` so they are consistently
    /// 1-based from this point on.
    pub zero_based: bool,
    /// Byte offset of the first entropy-coded byte, set once SOS has
    /// been parsed.
    pub entropy_offset: usize,
}

impl Header {
    pub fn new() -> Self {
        Header {
            precision: 0,
            width: 0,
            height: 0,
            components: Vec::new(),
            quant_tables: Vec::new(),
            quant_table_segments: Vec::new(),
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
        }
    }

    /// True when the image has three components (YCbCr); false for a
    /// single-component grayscale image.
    pub fn is_color(&self) -> bool {
        self.components.len() == 3
    }

    pub fn luma(&self) -> &Component {
        &self.components[0]
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}
