//! Assembles a finished JPEG file from a decoded [`Header`] and an MCU
//! sequence: SOI, APP0, DQT, SOF0, DHT x 4, SOS, the entropy-coded
//! scan, EOI.
//!
//! Every length field is recomputed from the content actually written,
//! never copied from the input file (the one exception is DQT, whose
//! segments are re-emitted byte-for-byte since quantisation is
//! untouched by embedding).

use super::encoder;
use super::header::Header;
use super::mcu::Mcu;
use super::tables::standard_dht_table_payloads;
use super::writer::SegmentWriter;
use crate::error::Result;

const SOI: [u8; 2] = [0xFF, 0xD8];
const EOI: [u8; 2] = [0xFF, 0xD9];
const APP0: [u8; 2] = [0xFF, 0xE0];
const SOF0: [u8; 2] = [0xFF, 0xC0];
const DHT: [u8; 2] = [0xFF, 0xC4];
const SOS: [u8; 2] = [0xFF, 0xDA];

fn write_sof0(writer: &mut SegmentWriter, header: &Header) {
    let mut payload = Vec::with_capacity(6 + header.components.len() * 3);
    payload.push(header.precision);
    payload.extend_from_slice(&header.height.to_be_bytes());
    payload.extend_from_slice(&header.width.to_be_bytes());
    payload.push(header.components.len() as u8);
    for component in &header.components {
        payload.push(component.identifier);
        payload.push((component.h_samp << 4) | component.v_samp);
        payload.push(component.quant_table_number);
    }
    writer.write_segment(SOF0, &payload);
}

/// Writes the SOS segment, pointing every component at the standard
/// table destinations the encoder actually used: 0 for luma, 1 for
/// chroma. This may differ from the destinations the source image's
/// own SOS referenced, since re-encoding always targets the four
/// standard tables regardless of what the cover image shipped.
fn write_sos(writer: &mut SegmentWriter, header: &Header) {
    let mut payload = Vec::with_capacity(1 + header.components.len() * 2 + 3);
    payload.push(header.components.len() as u8);
    for (index, component) in header.components.iter().enumerate() {
        let destination = if index == 0 { 0u8 } else { 1u8 };
        payload.push(component.identifier);
        payload.push((destination << 4) | destination);
    }
    payload.push(header.start_of_selection);
    payload.push(header.end_of_selection);
    payload.push((header.successive_approx_high << 4) | header.successive_approx_low);
    writer.write_segment(SOS, &payload);
}

/// Re-encode `mcus` against `header`'s geometry and assemble the
/// finished JPEG byte stream, always re-quantising against the
/// standard Annex K.3.3 Huffman tables.
pub fn assemble(header: &Header, mcus: &[Mcu]) -> Result<Vec<u8>> {
    let entropy = encoder::encode(mcus)?;

    let mut writer = SegmentWriter::new();
    writer.write_raw(&SOI);

    if let Some(payload) = &header.app0_payload {
        writer.write_segment(APP0, payload);
    }

    for segment in &header.quant_table_segments {
        writer.write_raw(segment);
    }

    write_sof0(&mut writer, header);

    for payload in standard_dht_table_payloads() {
        writer.write_segment(DHT, &payload);
    }

    write_sos(&mut writer, header);
    writer.write_raw(&entropy);
    writer.write_raw(&EOI);

    Ok(writer.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jpeg::decoder;
    use crate::jpeg::header::Component;
    use crate::jpeg::scanner;
    use crate::jpeg::tables::{standard_ac_luminance, standard_dc_luminance};

    fn grayscale_header_and_bytes() -> (Header, Vec<u8>) {
        let mut bytes = vec![0xFF, 0xD8];
        bytes.extend([0xFF, 0xDB, 0x00, 0x43, 0x00]);
        bytes.extend([1u8; 64]);
        bytes.extend([
            0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x00, 0x08, 0x00, 0x08, 0x01, 0x01, 0x11, 0x00,
        ]);
        bytes.extend([
            0xFF, 0xC4, 0x00, 0x14, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x00,
        ]);
        bytes.extend([
            0xFF, 0xC4, 0x00, 0x14, 0x10, 0x00, 0x01, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x00,
        ]);
        bytes.extend([0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
        bytes.extend([0xAA, 0xBB]);
        bytes.extend([0xFF, 0xD9]);
        let header = scanner::scan(&bytes).unwrap();
        (header, bytes)
    }

    #[test]
    fn assembled_file_starts_with_soi_and_ends_with_eoi() {
        let (header, _) = grayscale_header_and_bytes();
        let mcus = vec![Mcu::new(1, 0)];
        let out = assemble(&header, &mcus).unwrap();
        assert_eq!(&out[..2], &SOI);
        assert_eq!(&out[out.len() - 2..], &EOI);
    }

    #[test]
    fn assembled_file_carries_four_dht_segments() {
        let (header, _) = grayscale_header_and_bytes();
        let mcus = vec![Mcu::new(1, 0)];
        let out = assemble(&header, &mcus).unwrap();
        let count = out.windows(2).filter(|w| w == &DHT).count();
        assert_eq!(count, 4);
    }

    #[test]
    fn assemble_then_rescan_round_trips_the_header() {
        let (header, _) = grayscale_header_and_bytes();
        let mcus = vec![Mcu::new(1, 0)];
        let out = assemble(&header, &mcus).unwrap();
        let rescanned = scanner::scan(&out).unwrap();
        assert_eq!(rescanned.width, header.width);
        assert_eq!(rescanned.height, header.height);
        assert_eq!(rescanned.components.len(), header.components.len());
    }

    #[test]
    fn assemble_then_decode_recovers_coefficients() {
        let (header, _) = grayscale_header_and_bytes();
        let mut mcus = vec![Mcu::new(1, 0)];
        mcus[0].luma[0].dc = 4;
        mcus[0].luma[0].ac[0] = 3;
        mcus[0].luma[0].ac[3] = -9;

        let out = assemble(&header, &mcus).unwrap();
        let rescanned = scanner::scan(&out).unwrap();
        let decoded = decoder::decode(&out, &rescanned).unwrap();

        assert_eq!(decoded.mcus[0].luma[0].dc, 4);
        assert_eq!(decoded.mcus[0].luma[0].ac[0], 3);
        assert_eq!(decoded.mcus[0].luma[0].ac[3], -9);
    }

    #[test]
    fn omits_app0_when_source_carried_none() {
        let header = Header {
            precision: 8,
            width: 8,
            height: 8,
            components: vec![Component {
                identifier: 1,
                h_samp: 1,
                v_samp: 1,
                quant_table_number: 0,
                dc_huff_id: 0,
                ac_huff_id: 0,
            }],
            quant_tables: Vec::new(),
            quant_table_segments: Vec::new(),
            dc_huffman_tables: [Some(standard_dc_luminance()), None, None, None],
            ac_huffman_tables: [Some(standard_ac_luminance()), None, None, None],
            restart_interval: 0,
            app0_payload: None,
            start_of_selection: 0,
            end_of_selection: 63,
            successive_approx_high: 0,
            successive_approx_low: 0,
            zero_based: false,
            entropy_offset: 0,
        };
        let mcus = vec![Mcu::new(1, 0)];
        let out = assemble(&header, &mcus).unwrap();
        assert!(out.windows(2).position(|w| w == APP0).is_none());
    }

    #[test]
    fn carries_app0_when_source_provided_one() {
        let mut bytes = vec![0xFF, 0xD8];
        bytes.extend([0xFF, 0xE0, 0x00, 0x10]);
        bytes.extend([b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00]);
        bytes.extend([0xFF, 0xDB, 0x00, 0x43, 0x00]);
        bytes.extend([1u8; 64]);
        bytes.extend([
            0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x00, 0x08, 0x00, 0x08, 0x01, 0x01, 0x11, 0x00,
        ]);
        bytes.extend([
            0xFF, 0xC4, 0x00, 0x14, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x00,
        ]);
        bytes.extend([
            0xFF, 0xC4, 0x00, 0x14, 0x10, 0x00, 0x01, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x00,
        ]);
        bytes.extend([0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
        bytes.extend([0xAA, 0xBB]);
        bytes.extend([0xFF, 0xD9]);
        let header = scanner::scan(&bytes).unwrap();
        assert!(header.app0_payload.is_some());

        let mcus = vec![Mcu::new(1, 0)];
        let out = assemble(&header, &mcus).unwrap();
        let app0_pos = out.windows(2).position(|w| w == APP0).unwrap();
        let payload = header.app0_payload.as_ref().unwrap();
        let payload_start = app0_pos + 4;
        assert_eq!(&out[payload_start..payload_start + payload.len()], payload.as_slice());
    }
}
