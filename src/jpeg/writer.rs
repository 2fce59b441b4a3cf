//! A small in-memory segment writer used by the container assembler.
//!
//! The core never writes to a file handle directly (see the atomic
//! output writer at the CLI boundary); every JPEG segment is appended
//! to a growing byte buffer that the caller eventually hands off as a
//! whole.

/// Appends length-prefixed JPEG segments and raw byte ranges to an
/// in-memory buffer.
#[derive(Default)]
pub struct SegmentWriter {
    buf: Vec<u8>,
}

impl SegmentWriter {
    pub fn new() -> Self {
        SegmentWriter { buf: Vec::new() }
    }

    /// Append bytes verbatim (used for markers with no length field,
    /// and for segments whose length prefix was computed by the
    /// caller already).
    pub fn write_raw(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Append `marker` followed by a big-endian `u16` length (payload
    /// length + 2) and the payload itself.
    pub fn write_segment(&mut self, marker: [u8; 2], payload: &[u8]) {
        let length = (payload.len() + 2) as u16;
        self.buf.extend_from_slice(&marker);
        self.buf.extend_from_slice(&length.to_be_bytes());
        self.buf.extend_from_slice(payload);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
