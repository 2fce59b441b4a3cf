use std::fmt;
use thiserror::Error;

/// Result type used throughout the core: every fallible operation in this
/// crate returns `Result<T>` rather than `std::result::Result<T, E>`.
pub type Result<T> = std::result::Result<T, StegError>;

/// Unified error type for the JPEG codec and JSteg engine.
///
/// Each variant names the offending marker, offset, or value so a CLI
/// failure is actionable without attaching a debugger.
#[derive(Error)]
pub enum StegError {
    /// Bad SOI, unexpected marker, length mismatch, or EOF mid-segment.
    #[error("invalid JPEG container: {0}")]
    InvalidContainer(String),

    /// Progressive/lossless/arithmetic JPEG, CMYK/YIQ colour, 16-bit
    /// precision, or non-trivial spectral selection/successive approximation.
    #[error("unsupported JPEG feature: {0}")]
    UnsupportedFeature(String),

    /// Duplicate Huffman table definition, code-length overflow, symbol
    /// lookup failure, or quantisation table destination out of range.
    #[error("malformed Huffman or quantisation table: {0}")]
    MalformedTable(String),

    /// The secret frame is larger than the cover image's AC-coefficient
    /// bit capacity.
    #[error("payload of {required} bits exceeds cover capacity of {available} bits")]
    CapacityExceeded { required: u64, available: u64 },

    /// Extraction found no `'/'` separator, or the length prefix was
    /// truncated before 32 bits could be recovered.
    #[error("corrupt embedded frame: {0}")]
    FrameCorrupt(String),

    /// File not found, not readable, or the target already exists.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Use Display for Debug so an accidental `.unwrap()` prints the
// human-readable message rather than a derived struct dump.
impl fmt::Debug for StegError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl StegError {
    pub fn invalid_container(msg: impl Into<String>) -> Self {
        StegError::InvalidContainer(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        StegError::UnsupportedFeature(msg.into())
    }

    pub fn malformed_table(msg: impl Into<String>) -> Self {
        StegError::MalformedTable(msg.into())
    }

    pub fn frame_corrupt(msg: impl Into<String>) -> Self {
        StegError::FrameCorrupt(msg.into())
    }
}
