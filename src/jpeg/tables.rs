//! The canonical JFIF Annex K.3.3 Huffman tables.
//!
//! These are the "standard" tables every baseline encoder is allowed to
//! ship instead of computing optimal tables per image. The entropy
//! encoder (`jpeg::encoder`) always re-encodes with these four tables
//! regardless of what the source image's DHT segments contained, since
//! embedding perturbs the coefficient distribution enough that the
//! original tables are no longer a sensible fit.

use super::huffman::HuffmanTable;

/// Zig-zag scan position -> natural (row-major) position within an 8x8
/// block.
pub const ZIGZAG_ORDER: [usize; 64] = [
    0, 1, 8, 16, 9, 2, 3, 10, 17, 24, 32, 25, 18, 11, 4, 5, 12, 19, 26, 33, 40, 48, 41, 34, 27, 20,
    13, 6, 7, 14, 21, 28, 35, 42, 49, 56, 57, 50, 43, 36, 29, 22, 15, 23, 30, 37, 44, 51, 58, 59,
    52, 45, 38, 31, 39, 46, 53, 60, 61, 54, 47, 55, 62, 63,
];

const BITS_DC_LUMINANCE: [u8; 17] = [0, 0, 1, 5, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0];
const VAL_DC_LUMINANCE: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

const BITS_DC_CHROMINANCE: [u8; 17] = [0, 0, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0];
const VAL_DC_CHROMINANCE: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

const BITS_AC_LUMINANCE: [u8; 17] = [0, 0, 2, 1, 3, 3, 2, 4, 3, 5, 5, 4, 4, 0, 0, 1, 125];
const VAL_AC_LUMINANCE: [u8; 162] = [
    1, 2, 3, 0, 4, 17, 5, 18, 33, 49, 6, 65, 81, 7, 97, 113, 19, 34, 50, 129, 8, 20, 66, 145, 161,
    177, 193, 9, 35, 51, 82, 240, 21, 98, 114, 209, 10, 22, 36, 52, 225, 37, 241, 23, 24, 25, 26,
    38, 39, 40, 41, 42, 53, 54, 55, 56, 57, 58, 67, 68, 69, 70, 71, 72, 73, 74, 83, 84, 85, 86, 87,
    88, 89, 90, 99, 100, 101, 102, 103, 104, 105, 106, 115, 116, 117, 118, 119, 120, 121, 122, 130,
    131, 132, 133, 134, 135, 136, 137, 138, 146, 147, 148, 149, 150, 151, 152, 153, 154, 162, 163,
    164, 165, 166, 167, 168, 169, 170, 178, 179, 180, 181, 182, 183, 184, 185, 186, 194, 195, 196,
    197, 198, 199, 200, 201, 202, 210, 211, 212, 213, 214, 215, 216, 217, 218, 226, 227, 228, 229,
    230, 231, 232, 233, 234, 242, 243, 244, 245, 246, 247, 248, 249, 250,
];

const BITS_AC_CHROMINANCE: [u8; 17] = [0, 0, 2, 1, 2, 4, 4, 3, 4, 7, 5, 4, 4, 0, 1, 2, 119];
const VAL_AC_CHROMINANCE: [u8; 162] = [
    0, 1, 2, 3, 17, 4, 5, 18, 33, 49, 6, 65, 81, 7, 97, 113, 19, 34, 50, 129, 8, 20, 66, 145, 161,
    177, 193, 9, 35, 51, 82, 240, 21, 98, 114, 209, 10, 22, 36, 52, 225, 37, 241, 23, 24, 25, 26,
    38, 39, 40, 41, 42, 53, 54, 55, 56, 57, 58, 67, 68, 69, 70, 71, 72, 73, 74, 83, 84, 85, 86, 87,
    88, 89, 90, 99, 100, 101, 102, 103, 104, 105, 106, 115, 116, 117, 118, 119, 120, 121, 122, 130,
    131, 132, 133, 134, 135, 136, 137, 138, 146, 147, 148, 149, 150, 151, 152, 153, 154, 162, 163,
    164, 165, 166, 167, 168, 169, 170, 178, 179, 180, 181, 182, 183, 184, 185, 186, 194, 195, 196,
    197, 198, 199, 200, 201, 202, 210, 211, 212, 213, 214, 215, 216, 217, 218, 226, 227, 228, 229,
    230, 231, 232, 233, 234, 242, 243, 244, 245, 246, 247, 248, 249, 250,
];

fn counts_to_offsets(counts: &[u8; 17]) -> [u16; 17] {
    let mut offsets = [0u16; 17];
    for length in 1..=16usize {
        offsets[length] = offsets[length - 1] + counts[length] as u16;
    }
    offsets
}

/// Build the standard DC luminance table (destination 0, class 0).
pub fn standard_dc_luminance() -> HuffmanTable {
    HuffmanTable::from_counts(&counts_to_offsets(&BITS_DC_LUMINANCE), &VAL_DC_LUMINANCE)
}

/// Build the standard DC chrominance table (destination 1, class 0).
pub fn standard_dc_chrominance() -> HuffmanTable {
    HuffmanTable::from_counts(&counts_to_offsets(&BITS_DC_CHROMINANCE), &VAL_DC_CHROMINANCE)
}

/// Build the standard AC luminance table (destination 0, class 1).
pub fn standard_ac_luminance() -> HuffmanTable {
    HuffmanTable::from_counts(&counts_to_offsets(&BITS_AC_LUMINANCE), &VAL_AC_LUMINANCE)
}

/// Build the standard AC chrominance table (destination 1, class 1).
pub fn standard_ac_chrominance() -> HuffmanTable {
    HuffmanTable::from_counts(&counts_to_offsets(&BITS_AC_CHROMINANCE), &VAL_AC_CHROMINANCE)
}

fn encode_table_payload(class: u8, dest: u8, counts: &[u8; 17], values: &[u8]) -> Vec<u8> {
    let mut out = vec![(class << 4) | dest];
    out.extend_from_slice(&counts[1..=16]);
    out.extend_from_slice(values);
    out
}

/// The four standard tables' DHT payloads (class/dest byte + 16 length
/// counts + symbols), each destined for its own DHT segment: DC-luma,
/// DC-chroma, AC-luma, AC-chroma (destinations 0/1, classes 0/1).
pub fn standard_dht_table_payloads() -> [Vec<u8>; 4] {
    [
        encode_table_payload(0, 0, &BITS_DC_LUMINANCE, &VAL_DC_LUMINANCE),
        encode_table_payload(0, 1, &BITS_DC_CHROMINANCE, &VAL_DC_CHROMINANCE),
        encode_table_payload(1, 0, &BITS_AC_LUMINANCE, &VAL_AC_LUMINANCE),
        encode_table_payload(1, 1, &BITS_AC_CHROMINANCE, &VAL_AC_CHROMINANCE),
    ]
}
