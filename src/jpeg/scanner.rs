//! Walks a JPEG byte buffer marker by marker, populating a [`Header`]
//! and stopping once SOS has been parsed.

use log::{debug, warn};

use super::header::{Component, Header, QuantTable};
use super::huffman::HuffmanTable;
use super::marker::Marker;
use crate::error::{Result, StegError};

/// Scan `data` from offset 0, dispatching each segment to its parser.
///
/// Returns the populated header; `header.entropy_offset` is the byte
/// offset of the first entropy-coded byte after SOS.
pub fn scan(data: &[u8]) -> Result<Header> {
    if data.len() < 2 || data[0] != 0xFF || Marker::from_u8(data[1]) != Some(Marker::Soi) {
        return Err(StegError::invalid_container(
            "file does not start with an SOI marker",
        ));
    }

    let mut header = Header::new();
    let mut pos = 2usize;

    loop {
        if pos + 1 >= data.len() {
            return Err(StegError::invalid_container(
                "unexpected end of file while scanning for a marker",
            ));
        }
        if data[pos] != 0xFF {
            return Err(StegError::invalid_container(format!(
                "expected marker prefix 0xFF at offset {pos}, found {:#04x}",
                data[pos]
            )));
        }
        let marker_byte = data[pos + 1];
        let marker = Marker::from_u8(marker_byte).ok_or_else(|| {
            StegError::invalid_container(format!(
                "invalid marker byte {marker_byte:#04x} at offset {}",
                pos + 1
            ))
        })?;
        pos += 2;

        debug!("marker {marker:?} at offset {pos}");

        if !marker.has_length() {
            match marker {
                Marker::Tem | Marker::Rst(_) => continue,
                other => {
                    return Err(StegError::invalid_container(format!(
                        "unexpected marker without length field: {other:?}"
                    )))
                }
            }
        }

        if pos + 2 > data.len() {
            return Err(StegError::invalid_container(
                "truncated segment length field",
            ));
        }
        let length = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
        if length < 2 || pos + length > data.len() {
            return Err(StegError::invalid_container(format!(
                "segment length {length} at offset {pos} overruns the buffer"
            )));
        }
        let payload = &data[pos + 2..pos + length];
        let segment_start = pos - 2;

        match marker {
            Marker::App0 => {
                header.app0_payload = Some(payload.to_vec());
            }
            Marker::Dqt => {
                parse_dqt(payload, &mut header)?;
                header
                    .quant_table_segments
                    .push(data[segment_start..pos + length].to_vec());
            }
            Marker::Sof0 => parse_sof0(payload, &mut header)?,
            Marker::UnsupportedSof(n) => {
                return Err(StegError::unsupported(format!(
                    "SOF{n} is not a supported frame type (only baseline SOF0 is)"
                )))
            }
            Marker::Dht => parse_dht(payload, &mut header)?,
            Marker::Dac => {
                return Err(StegError::unsupported(
                    "arithmetic coding (DAC) is not supported",
                ))
            }
            Marker::Dri => parse_dri(payload, &mut header)?,
            Marker::Sos => {
                parse_sos(payload, &mut header)?;
                header.entropy_offset = pos + length;
                return Ok(header);
            }
            Marker::AppN(_) | Marker::Com => {
                // Preserved for diagnostics only; not round-tripped.
            }
            Marker::Eoi | Marker::Soi => {
                return Err(StegError::invalid_container(format!(
                    "unexpected {marker:?} before SOS"
                )))
            }
            Marker::Rst(_) | Marker::Tem => unreachable!("handled above via has_length"),
            Marker::Other(n) => {
                return Err(StegError::invalid_container(format!(
                    "unsupported marker {n:#04x}"
                )))
            }
        }

        pos += length;
    }
}

fn parse_dqt(payload: &[u8], header: &mut Header) -> Result<()> {
    let mut cursor = 0usize;
    while cursor < payload.len() {
        let pq_tq = payload[cursor];
        let precision = pq_tq >> 4;
        let destination = pq_tq & 0x0F;
        if destination > 3 {
            return Err(StegError::malformed_table(format!(
                "quantisation table destination {destination} out of range"
            )));
        }
        cursor += 1;
        let entry_size = if precision == 0 { 1 } else { 2 };
        let table_bytes = 64 * entry_size;
        if cursor + table_bytes > payload.len() {
            return Err(StegError::invalid_container(
                "DQT segment truncated before 64 entries",
            ));
        }
        let mut values = [0u16; 64];
        for (i, slot) in values.iter_mut().enumerate() {
            *slot = if precision == 0 {
                payload[cursor + i] as u16
            } else {
                u16::from_be_bytes([payload[cursor + 2 * i], payload[cursor + 2 * i + 1]])
            };
        }
        cursor += table_bytes;
        header.quant_tables.push(QuantTable {
            destination,
            precision,
            values,
        });
    }
    Ok(())
}

fn parse_sof0(payload: &[u8], header: &mut Header) -> Result<()> {
    if payload.len() < 6 {
        return Err(StegError::invalid_container("SOF0 segment too short"));
    }
    let precision = payload[0];
    if precision != 8 {
        return Err(StegError::unsupported(format!(
            "precision {precision} bits is not supported (only 8-bit)"
        )));
    }
    let height = u16::from_be_bytes([payload[1], payload[2]]);
    let width = u16::from_be_bytes([payload[3], payload[4]]);
    if height == 0 || width == 0 {
        return Err(StegError::invalid_container(
            "SOF0 declares zero width or height",
        ));
    }
    let component_count = payload[5] as usize;
    if component_count != 1 && component_count != 3 {
        return Err(StegError::unsupported(format!(
            "{component_count} components is not supported (only 1 or 3, i.e. gray or YCbCr)"
        )));
    }
    if payload.len() < 6 + component_count * 3 {
        return Err(StegError::invalid_container(
            "SOF0 segment truncated before all component records",
        ));
    }

    let mut components = Vec::with_capacity(component_count);
    let mut zero_based = false;
    for i in 0..component_count {
        let base = 6 + i * 3;
        let mut identifier = payload[base];
        if identifier == 0 {
            zero_based = true;
        }
        let sampling = payload[base + 1];
        let h_samp = sampling >> 4;
        let v_samp = sampling & 0x0F;
        let quant_table_number = payload[base + 2];
        components.push(Component {
            identifier,
            h_samp,
            v_samp,
            quant_table_number,
            dc_huff_id: 0,
            ac_huff_id: 0,
        });
        let _ = &mut identifier;
    }
    if zero_based {
        for c in components.iter_mut() {
            c.identifier += 1;
        }
    }
    for c in &components {
        if matches!(c.identifier, 4 | 5) {
            return Err(StegError::unsupported(format!(
                "component identifier {} is not a supported YCbCr/grayscale id",
                c.identifier
            )));
        }
    }
    let mut seen = Vec::new();
    for c in &components {
        if seen.contains(&c.identifier) {
            return Err(StegError::invalid_container(format!(
                "duplicate component identifier {}",
                c.identifier
            )));
        }
        seen.push(c.identifier);
    }

    if component_count == 3 {
        for c in components.iter().skip(1) {
            if c.h_samp != 1 || c.v_samp != 1 {
                return Err(StegError::unsupported(
                    "chroma components must have sampling factors 1x1",
                ));
            }
        }
        let luma = &components[0];
        if !matches!(luma.h_samp, 1 | 2) || !matches!(luma.v_samp, 1 | 2) {
            return Err(StegError::unsupported(
                "luma sampling factors must each be 1 or 2",
            ));
        }
    }

    header.precision = precision;
    header.width = width;
    header.height = height;
    header.components = components;
    header.zero_based = zero_based;
    Ok(())
}

fn parse_dht(payload: &[u8], header: &mut Header) -> Result<()> {
    let mut cursor = 0usize;
    while cursor < payload.len() {
        if cursor + 17 > payload.len() {
            return Err(StegError::invalid_container(
                "DHT segment truncated before 16 length counts",
            ));
        }
        let class_dest = payload[cursor];
        let class = class_dest >> 4;
        let destination = (class_dest & 0x0F) as usize;
        if destination > 3 {
            return Err(StegError::malformed_table(format!(
                "Huffman table destination {destination} out of range"
            )));
        }
        cursor += 1;
        let counts: [u8; 16] = payload[cursor..cursor + 16].try_into().unwrap();
        cursor += 16;
        let total: usize = counts.iter().map(|&c| c as usize).sum();
        if cursor + total > payload.len() {
            return Err(StegError::invalid_container(
                "DHT segment truncated before all symbols",
            ));
        }
        let symbols = payload[cursor..cursor + total].to_vec();
        cursor += total;

        let mut offsets = [0u16; 17];
        for length in 1..=16usize {
            offsets[length] = offsets[length - 1] + counts[length - 1] as u16;
        }
        let table = HuffmanTable::from_counts(&offsets, &symbols);

        let slot = match class {
            0 => &mut header.dc_huffman_tables[destination],
            1 => &mut header.ac_huffman_tables[destination],
            other => {
                return Err(StegError::malformed_table(format!(
                    "Huffman table class {other} is neither DC (0) nor AC (1)"
                )))
            }
        };
        if slot.as_ref().map(|t| t.set).unwrap_or(false) {
            warn!("redefinition of Huffman table class={class} dest={destination}");
            return Err(StegError::malformed_table(format!(
                "duplicate definition of Huffman table class={class} dest={destination}"
            )));
        }
        *slot = Some(table);
    }
    Ok(())
}

fn parse_dri(payload: &[u8], header: &mut Header) -> Result<()> {
    if payload.len() != 2 {
        return Err(StegError::invalid_container(
            "DRI segment must carry exactly one 16-bit interval",
        ));
    }
    header.restart_interval = u16::from_be_bytes([payload[0], payload[1]]);
    if header.restart_interval != 0 {
        warn!(
            "restart interval {} present but restart markers are not supported in the entropy stream",
            header.restart_interval
        );
    }
    Ok(())
}

fn parse_sos(payload: &[u8], header: &mut Header) -> Result<()> {
    if payload.is_empty() {
        return Err(StegError::invalid_container("empty SOS segment"));
    }
    let component_count = payload[0] as usize;
    if component_count != header.components.len() {
        return Err(StegError::invalid_container(format!(
            "SOS declares {component_count} components but SOF0 declared {}",
            header.components.len()
        )));
    }
    if payload.len() < 1 + component_count * 2 + 3 {
        return Err(StegError::invalid_container("SOS segment truncated"));
    }
    for i in 0..component_count {
        let base = 1 + i * 2;
        let mut identifier = payload[base];
        if header.zero_based {
            identifier += 1;
        }
        if identifier != header.components[i].identifier {
            return Err(StegError::invalid_container(format!(
                "SOS component {i} id {identifier} does not match SOF0 id {}",
                header.components[i].identifier
            )));
        }
        let tables = payload[base + 1];
        header.components[i].dc_huff_id = tables >> 4;
        header.components[i].ac_huff_id = tables & 0x0F;
    }
    let tail = 1 + component_count * 2;
    let start = payload[tail];
    let end = payload[tail + 1];
    let approx = payload[tail + 2];
    header.start_of_selection = start;
    header.end_of_selection = end;
    header.successive_approx_high = approx >> 4;
    header.successive_approx_low = approx & 0x0F;
    if start != 0 || end != 63 || approx != 0 {
        return Err(StegError::unsupported(
            "non-trivial spectral selection or successive approximation (progressive JPEG) is not supported",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_grayscale_bytes() -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xD8];
        // DQT: one 8-bit luma table, all ones.
        bytes.extend([0xFF, 0xDB, 0x00, 0x43, 0x00]);
        bytes.extend([1u8; 64]);
        // SOF0: 8x8, 1 component.
        bytes.extend([0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x00, 0x08, 0x00, 0x08, 0x01, 0x01, 0x11, 0x00]);
        // DHT: trivial single-symbol DC table.
        bytes.extend([
            0xFF, 0xC4, 0x00, 0x14, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x00,
        ]);
        // DHT: trivial single-symbol AC table.
        bytes.extend([
            0xFF, 0xC4, 0x00, 0x14, 0x10, 0x00, 0x01, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x00,
        ]);
        // SOS
        bytes.extend([0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
        bytes.extend([0xAA, 0xBB]);
        bytes.extend([0xFF, 0xD9]);
        bytes
    }

    #[test]
    fn scans_minimal_grayscale_header() {
        let bytes = minimal_grayscale_bytes();
        let header = scan(&bytes).unwrap();
        assert_eq!(header.width, 8);
        assert_eq!(header.height, 8);
        assert_eq!(header.components.len(), 1);
        assert_eq!(header.quant_tables.len(), 1);
        assert!(header.dc_huffman_tables[0].is_some());
        assert!(header.ac_huffman_tables[0].is_some());
    }

    #[test]
    fn rejects_missing_soi() {
        let bytes = vec![0x00, 0x00, 0xFF, 0xD9];
        assert!(scan(&bytes).is_err());
    }

    #[test]
    fn rejects_progressive_sof2() {
        let mut bytes = vec![0xFF, 0xD8];
        bytes.extend([
            0xFF, 0xC2, 0x00, 0x0B, 0x08, 0x00, 0x08, 0x00, 0x08, 0x01, 0x01, 0x11, 0x00,
        ]);
        bytes.extend([0xFF, 0xD9]);
        let err = scan(&bytes).unwrap_err();
        assert!(matches!(err, StegError::UnsupportedFeature(_)));
    }

    #[test]
    fn rejects_nonzero_dqt_destination_over_three() {
        let mut bytes = vec![0xFF, 0xD8];
        bytes.extend([0xFF, 0xDB, 0x00, 0x43, 0x04]);
        bytes.extend([1u8; 64]);
        bytes.extend([0xFF, 0xD9]);
        let err = scan(&bytes).unwrap_err();
        assert!(matches!(err, StegError::MalformedTable(_)));
    }
}
