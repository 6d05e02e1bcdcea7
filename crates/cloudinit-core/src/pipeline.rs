//! Compression and text encoding around the raw MIME bytes
//!
//! Order is gzip first, then base64. The gzip header is written with a zero
//! mtime, no file name and OS byte 255 (unknown) so identical input
//! compresses to identical bytes on every platform.

use crate::errors::EncodeError;
use crate::model::EncodingConfig;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use flate2::{Compression, GzBuilder};
use std::io::Write;

/// Reject option combinations that can never render
///
/// # Errors
/// `GzipRequiresBase64` when gzip is requested without base64.
pub fn check_encoding(cfg: &EncodingConfig) -> Result<(), EncodeError> {
    if cfg.gzip && !cfg.base64 {
        return Err(EncodeError::GzipRequiresBase64);
    }
    Ok(())
}

/// OS header byte for "unknown"
const GZIP_OS_UNKNOWN: u8 = 255;

/// Gzip with fixed settings: level 6, mtime 0, no name or comment
pub fn gzip(raw: &[u8]) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = GzBuilder::new()
        .mtime(0)
        .operating_system(GZIP_OS_UNKNOWN)
        .write(Vec::with_capacity(raw.len() / 2), Compression::default());
    encoder.write_all(raw).map_err(compression_error)?;
    encoder.finish().map_err(compression_error)
}

fn compression_error(err: std::io::Error) -> EncodeError {
    EncodeError::Compression {
        message: err.to_string(),
    }
}

/// Apply the configured encodings to the raw document
///
/// # Errors
/// * `GzipRequiresBase64` - checked before any work is done
/// * `Compression` - the gzip stream could not be written
/// * `NonTextOutput` - plain output is not valid UTF-8
pub fn apply_pipeline(raw: Vec<u8>, cfg: &EncodingConfig) -> Result<String, EncodeError> {
    check_encoding(cfg)?;

    let buffer = if cfg.gzip { gzip(&raw)? } else { raw };

    if cfg.base64 {
        return Ok(STANDARD.encode(buffer));
    }

    String::from_utf8(buffer).map_err(|e| EncodeError::NonTextOutput {
        valid_up_to: e.utf8_error().valid_up_to(),
    })
}
