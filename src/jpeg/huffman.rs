//! Canonical Huffman code derivation, symbol decoding and encoding.
//!
//! Codes are derived the way ITU T.81 Annex C describes: walk the
//! `(offsets, symbols)` pairs by increasing bit length, assigning
//! sequential codes within a length and left-shifting between lengths.

use crate::bitio::BitReader;
use crate::error::{Result, StegError};

/// A JPEG Huffman table in its decoded, code-bearing form.
#[derive(Debug, Clone)]
pub struct HuffmanTable {
    /// `offsets[k]` is the index in `symbols` where codes of bit-length
    /// `k + 1` begin; `offsets[16]` is the total symbol count.
    pub offsets: [u16; 17],
    /// Symbols in canonical order.
    pub symbols: Vec<u8>,
    /// `codes[i]` is the Huffman code assigned to `symbols[i]`.
    pub codes: Vec<u16>,
    /// Guards against a file redefining the same (class, destination)
    /// table twice.
    pub set: bool,
}

impl HuffmanTable {
    /// Build a table from cumulative offsets and a symbol list, deriving
    /// canonical codes.
    pub fn from_counts(offsets: &[u16; 17], symbols: &[u8]) -> Self {
        let codes = derive_canonical_codes(offsets, symbols.len());
        HuffmanTable {
            offsets: *offsets,
            symbols: symbols.to_vec(),
            codes,
            set: true,
        }
    }

    /// Bit-length of the Huffman code assigned to `symbols[index]`.
    fn length_of(&self, index: usize) -> u8 {
        for length in 1..=16u8 {
            let lo = self.offsets[length as usize - 1] as usize;
            let hi = self.offsets[length as usize] as usize;
            if index >= lo && index < hi {
                return length;
            }
        }
        0
    }

    /// Look up `(code, length)` for `symbol`. Linear scan, as the
    /// tables are total but small (at most 162 entries for AC).
    pub fn symbol_to_code(&self, symbol: u8) -> Result<(u16, u8)> {
        for (index, &candidate) in self.symbols.iter().enumerate() {
            if candidate == symbol {
                return Ok((self.codes[index], self.length_of(index)));
            }
        }
        Err(StegError::malformed_table(format!(
            "symbol {symbol:#04x} has no assigned Huffman code"
        )))
    }
}

/// Derive canonical Huffman codes (ITU T.81 Annex C, Figures C.1/C.2).
fn derive_canonical_codes(offsets: &[u16; 17], symbol_count: usize) -> Vec<u16> {
    let mut codes = vec![0u16; symbol_count];
    let mut code: u16 = 0;
    for length in 1..=16usize {
        let lo = offsets[length - 1] as usize;
        let hi = offsets[length] as usize;
        for slot in codes.iter_mut().take(hi).skip(lo) {
            *slot = code;
            code += 1;
        }
        code <<= 1;
    }
    codes
}

/// Decode one symbol from `reader` using `table`.
///
/// Bits are accumulated one at a time into a running code; after `L`
/// bits the `[offsets[L-1], offsets[L])` slot is scanned for a code
/// match. A code longer than 16 bits is always a malformed stream.
pub fn next_symbol(reader: &mut BitReader<'_>, table: &HuffmanTable) -> Result<u8> {
    let mut code: u32 = 0;
    for length in 1..=16u8 {
        code = (code << 1) | reader.next_bit();
        let lo = table.offsets[length as usize - 1] as usize;
        let hi = table.offsets[length as usize] as usize;
        for index in lo..hi {
            if table.codes[index] as u32 == code {
                return Ok(table.symbols[index]);
            }
        }
    }
    Err(StegError::malformed_table(
        "no Huffman code matched within 16 bits",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jpeg::tables::standard_dc_luminance;

    #[test]
    fn canonical_codes_increase_monotonically_within_a_length_slot() {
        let table = standard_dc_luminance();
        for length in 1..=16usize {
            let lo = table.offsets[length - 1] as usize;
            let hi = table.offsets[length] as usize;
            assert_eq!(hi - lo, hi - lo);
            for window in table.codes[lo..hi].windows(2) {
                assert!(window[1] > window[0]);
            }
        }
    }

    #[test]
    fn offsets_delta_matches_symbol_counts_per_length() {
        let table = standard_dc_luminance();
        let mut total = 0usize;
        for length in 1..=16usize {
            total += (table.offsets[length] - table.offsets[length - 1]) as usize;
        }
        assert_eq!(total, table.symbols.len());
    }

    #[test]
    fn encode_then_decode_round_trips_every_symbol() {
        let table = standard_dc_luminance();
        for &symbol in &table.symbols {
            let (code, length) = table.symbol_to_code(symbol).unwrap();
            let mut bytes = vec![0u8; 4];
            let mut bit_index = 0usize;
            for i in (0..length).rev() {
                let bit = (code >> i) & 1;
                if bit == 1 {
                    bytes[bit_index / 8] |= 1 << (7 - (bit_index % 8));
                }
                bit_index += 1;
            }
            let mut reader = BitReader::new(&bytes);
            let decoded = next_symbol(&mut reader, &table).unwrap();
            assert_eq!(decoded, symbol);
        }
    }

    #[test]
    fn unknown_symbol_is_malformed_table_error() {
        let table = standard_dc_luminance();
        assert!(table.symbol_to_code(0xFF).is_err());
    }
}
