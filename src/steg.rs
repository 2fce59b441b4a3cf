//! JSteg embedding and extraction: frames a secret file, then drives
//! the coefficient walker to hide or recover its bits one per usable
//! AC coefficient.
//!
//! Frame format, in order: four length bytes (little-endian, the
//! count of bytes that follow), the file's raw contents, an ASCII
//! `'/'` separator, then the file's basename as ASCII bytes.

use log::{debug, info};

use crate::error::{Result, StegError};
use crate::jpeg::mcu::Mcu;
use crate::jpeg::walker::{read_value, resolve_mut, Walker};

fn build_frame(contents: &[u8], basename: &str) -> Vec<u8> {
    let tail_len = (contents.len() + 1 + basename.len()) as u32;
    let mut frame = Vec::with_capacity(4 + tail_len as usize);
    frame.extend_from_slice(&tail_len.to_le_bytes());
    frame.extend_from_slice(contents);
    frame.push(b'/');
    frame.extend_from_slice(basename.as_bytes());
    frame
}

/// Set or clear the least significant bit of a signed coefficient,
/// treating it as a two's-complement value. Rust's bitwise operators
/// already do this correctly for negative `i32`s: `-5 & !1 == -6`,
/// matching the "magnitude change of at most one" invariant a
/// negative odd coefficient exhibits when its LSB is cleared.
fn set_lsb(value: i32, bit: bool) -> i32 {
    if bit {
        value | 1
    } else {
        value & !1
    }
}

fn bit_at(byte: u8, position: u8) -> bool {
    (byte >> (7 - position)) & 1 == 1
}

/// Embed `contents` (saved under `basename`) into `mcus`, mutating AC
/// coefficients in place. `capacity_bits` is the count of usable
/// coefficients reported by the entropy decoder.
pub fn embed(mcus: &mut [Mcu], capacity_bits: u64, contents: &[u8], basename: &str) -> Result<()> {
    let frame = build_frame(contents, basename);
    let required_bits = (frame.len() as u64) * 8;
    if required_bits > capacity_bits {
        return Err(StegError::CapacityExceeded {
            required: required_bits,
            available: capacity_bits,
        });
    }

    debug!("embedding {} frame bytes ({required_bits} bits)", frame.len());
    let mut walker = Walker::new(mcus);
    for &byte in &frame {
        for position in 0..8u8 {
            let locator = walker.next_usable_coefficient(mcus)?;
            let bit = bit_at(byte, position);
            let current = read_value(mcus, &locator);
            *resolve_mut(mcus, &locator) = set_lsb(current, bit);
        }
    }
    info!("embedded {} bytes under filename \"{basename}\"", contents.len());
    Ok(())
}

/// The recovered payload: the original file's contents and the
/// basename it was saved under.
pub struct ExtractedPayload {
    pub contents: Vec<u8>,
    pub basename: String,
}

/// Drive the walker read-only over `mcus`, recovering the frame that
/// `embed` wrote.
pub fn extract(mcus: &[Mcu]) -> Result<ExtractedPayload> {
    let mut walker = Walker::new(mcus);

    let mut read_byte = || -> Result<u8> {
        let mut byte = 0u8;
        for _ in 0..8 {
            let locator = walker.next_usable_coefficient(mcus)?;
            let bit = (read_value(mcus, &locator) & 1) as u8;
            byte = (byte << 1) | bit;
        }
        Ok(byte)
    };

    let mut length_bytes = [0u8; 4];
    for slot in length_bytes.iter_mut() {
        *slot = read_byte().map_err(|_| {
            StegError::frame_corrupt("cover image exhausted before the length prefix was read")
        })?;
    }
    let tail_len = u32::from_le_bytes(length_bytes) as usize;

    let mut tail = Vec::with_capacity(tail_len);
    for _ in 0..tail_len {
        tail.push(read_byte()?);
    }

    let separator = tail
        .iter()
        .rposition(|&b| b == b'/')
        .ok_or_else(|| StegError::frame_corrupt("no '/' separator found in the embedded frame"))?;

    let contents = tail[..separator].to_vec();
    let basename = String::from_utf8(tail[separator + 1..].to_vec())
        .map_err(|_| StegError::frame_corrupt("embedded filename is not valid UTF-8"))?;

    info!("extracted {} bytes under filename \"{basename}\"", contents.len());
    Ok(ExtractedPayload { contents, basename })
}
