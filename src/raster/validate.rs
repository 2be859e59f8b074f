use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::export::ByteSize;

/// Extensions the converter accepts, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Default upper bound on source file size (10 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RasterError {
    #[error("unsupported file type: .{0}")]
    UnsupportedType(String),
    #[error("file exceeds size limit: {size} > {limit}")]
    TooLarge { size: ByteSize, limit: ByteSize },
    #[error("invalid icon size {0}: must be between 1 and 256")]
    InvalidSize(u32),
}

/// Check that `path` looks like a convertible image and is not too large.
///
/// Returns the file's length in bytes.
pub fn validate_file(path: &Path, max_bytes: u64) -> Result<u64> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(RasterError::UnsupportedType(ext).into());
    }

    let len = std::fs::metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len();
    if len > max_bytes {
        return Err(RasterError::TooLarge {
            size: ByteSize(len),
            limit: ByteSize(max_bytes),
        }
        .into());
    }
    Ok(len)
}
