//! Reconstructs the MCU sequence from the post-SOS entropy-coded byte
//! stream.

use log::{info, trace};

use super::header::Header;
use super::huffman::{next_symbol, HuffmanTable};
use super::mcu::{Channel, Mcu};
use crate::bitio::BitReader;
use crate::error::{Result, StegError};

/// The decoded MCU sequence plus the JSteg embedding capacity it
/// implies (one payload bit per AC coefficient whose magnitude is
/// >= 2).
pub struct DecodedScan {
    pub mcus: Vec<Mcu>,
    pub capacity_bits: u64,
}

/// Strip 0xFF00 byte-stuffing from the entropy-coded region, stopping
/// at EOI. A restart marker mid-stream is fatal, since restart-marker
/// resynchronisation is out of scope.
fn unstuff(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0usize;
    while i < data.len() {
        let byte = data[i];
        if byte == 0xFF {
            if i + 1 >= data.len() {
                return Err(StegError::invalid_container(
                    "entropy stream truncated after a 0xFF byte",
                ));
            }
            match data[i + 1] {
                0x00 => {
                    out.push(0xFF);
                    i += 2;
                }
                0xD9 => break, // EOI
                0xD0..=0xD7 => {
                    return Err(StegError::unsupported(
                        "restart markers in the entropy stream are not supported",
                    ))
                }
                other => {
                    return Err(StegError::invalid_container(format!(
                        "unexpected marker {other:#04x} inside entropy stream"
                    )))
                }
            }
        } else {
            out.push(byte);
            i += 1;
        }
    }
    Ok(out)
}

/// `ceil(width / 8)`, rounded up to an even number when `double` is set.
fn block_count(dimension: u16, double: bool) -> usize {
    let blocks = (dimension as usize).div_ceil(8);
    if double && blocks % 2 == 1 {
        blocks + 1
    } else {
        blocks
    }
}

fn sign_extend(unsigned: u32, size: u8) -> i32 {
    if size == 0 {
        return 0;
    }
    let half = 1u32 << (size - 1);
    if unsigned < half {
        unsigned as i32 - (1i32 << size) + 1
    } else {
        unsigned as i32
    }
}

fn decode_block(
    reader: &mut BitReader<'_>,
    dc_table: &HuffmanTable,
    ac_table: &HuffmanTable,
    capacity_bits: &mut u64,
) -> Result<Channel> {
    let mut channel = Channel::new();

    let dc_symbol = next_symbol(reader, dc_table)?;
    let dc_size = dc_symbol & 0x0F;
    if dc_size > 11 {
        return Err(StegError::malformed_table(format!(
            "DC coefficient length {dc_size} exceeds the 11-bit baseline limit"
        )));
    }
    let dc_bits = reader.next_bits(dc_size);
    channel.dc = sign_extend(dc_bits, dc_size);

    let mut index = 0usize;
    while index < 63 {
        let symbol = next_symbol(reader, ac_table)?;
        if symbol == 0x00 {
            break; // EOB
        }
        if symbol == 0xF0 {
            index += 16;
            continue;
        }
        let run = (symbol >> 4) as usize;
        let size = symbol & 0x0F;
        if size > 10 {
            return Err(StegError::malformed_table(format!(
                "AC coefficient length {size} exceeds the 10-bit baseline limit"
            )));
        }
        index += run;
        if index >= 63 {
            return Err(StegError::invalid_container(
                "AC zero-run advanced past the end of the block",
            ));
        }
        let bits = reader.next_bits(size);
        let value = sign_extend(bits, size);
        channel.ac[index] = value;
        if value.unsigned_abs() >= 2 {
            *capacity_bits += 1;
        }
        index += 1;
    }

    Ok(channel)
}

/// Decode the entropy-coded scan described by `header`, starting at
/// `header.entropy_offset` within `file`.
pub fn decode(file: &[u8], header: &Header) -> Result<DecodedScan> {
    let entropy_bytes = &file[header.entropy_offset..];
    let clean = unstuff(entropy_bytes)?;
    let mut reader = BitReader::new(&clean);

    let luma = header.luma();
    let color = header.is_color();

    let double_w = luma.h_samp == 2;
    let double_h = luma.v_samp == 2;
    let b_width = block_count(header.width, double_w);
    let b_height = block_count(header.height, double_h);
    let luma_per_mcu = (luma.h_samp as usize) * (luma.v_samp as usize);
    if luma_per_mcu == 0 {
        return Err(StegError::invalid_container(
            "luma sampling factors must be nonzero",
        ));
    }
    let total_mcus = (b_width * b_height) / luma_per_mcu;

    let dc_tables: Vec<&HuffmanTable> = header
        .components
        .iter()
        .map(|c| {
            header.dc_huffman_tables[c.dc_huff_id as usize]
                .as_ref()
                .ok_or_else(|| {
                    StegError::malformed_table(format!(
                        "no DC Huffman table at destination {}",
                        c.dc_huff_id
                    ))
                })
        })
        .collect::<Result<_>>()?;
    let ac_tables: Vec<&HuffmanTable> = header
        .components
        .iter()
        .map(|c| {
            header.ac_huffman_tables[c.ac_huff_id as usize]
                .as_ref()
                .ok_or_else(|| {
                    StegError::malformed_table(format!(
                        "no AC Huffman table at destination {}",
                        c.ac_huff_id
                    ))
                })
        })
        .collect::<Result<_>>()?;

    let mut capacity_bits = 0u64;
    let mut mcus = Vec::with_capacity(total_mcus);

    for mcu_index in 0..total_mcus {
        let chroma_count = if color { 2 } else { 0 };
        let mut mcu = Mcu::new(luma_per_mcu, chroma_count);

        for slot in mcu.luma.iter_mut() {
            *slot = decode_block(&mut reader, dc_tables[0], ac_tables[0], &mut capacity_bits)?;
        }
        if color {
            mcu.chroma[0] =
                decode_block(&mut reader, dc_tables[1], ac_tables[1], &mut capacity_bits)?;
            mcu.chroma[1] =
                decode_block(&mut reader, dc_tables[2], ac_tables[2], &mut capacity_bits)?;
        }

        trace!("decoded MCU {mcu_index}");
        mcus.push(mcu);
    }

    info!(
        "decoded {} MCUs, capacity {} bits ({} bytes)",
        mcus.len(),
        capacity_bits,
        capacity_bits / 8
    );

    Ok(DecodedScan {
        mcus,
        capacity_bits,
    })
}
