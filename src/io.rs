//! Filesystem commit helpers. The container writer never touches disk
//! itself; it hands back an owned buffer that this module commits
//! atomically.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Write `bytes` to `destination` via a same-directory temporary file
/// followed by a rename, so a crash or an error mid-write never
/// leaves a truncated or empty file at the requested path.
pub fn write_atomically(destination: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp_path = PathBuf::from(destination);
    let tmp_name = match destination.file_name() {
        Some(name) => format!(".{}.tmp", name.to_string_lossy()),
        None => ".stegano-output.tmp".to_string(),
    };
    tmp_path.set_file_name(tmp_name);

    fs::write(&tmp_path, bytes)?;
    fs::rename(&tmp_path, destination)?;
    Ok(())
}
