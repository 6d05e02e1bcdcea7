//! Drift comparison between a fresh rendering and the stored one
//!
//! Plain byte equality. Rendering is deterministic, so any difference is a
//! real change in the inputs.

use crate::model::document::digest_bytes;

/// `true` only if a stored document exists and equals `rendered` byte for byte
pub fn is_up_to_date(rendered: &str, stored: Option<&str>) -> bool {
    stored == Some(rendered)
}

/// Outcome of comparing a rendering with the stored document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drift {
    UpToDate,
    /// Nothing has been stored yet
    Missing,
    Changed {
        rendered_digest: String,
        stored_digest: String,
    },
}

impl Drift {
    pub fn is_up_to_date(&self) -> bool {
        matches!(self, Drift::UpToDate)
    }
}

impl std::fmt::Display for Drift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Drift::UpToDate => f.write_str("up to date"),
            Drift::Missing => f.write_str("no stored document"),
            Drift::Changed {
                rendered_digest,
                stored_digest,
            } => write!(
                f,
                "changed (stored sha256:{}, rendered sha256:{})",
                stored_digest, rendered_digest
            ),
        }
    }
}

/// Compare and describe the difference by digest
pub fn compare(rendered: &str, stored: Option<&str>) -> Drift {
    compare_bytes(rendered.as_bytes(), stored.map(str::as_bytes))
}

/// Like [`compare`], for stored values that may not be valid text
pub fn compare_bytes(rendered: &[u8], stored: Option<&[u8]>) -> Drift {
    match stored {
        None => Drift::Missing,
        Some(stored) if stored == rendered => Drift::UpToDate,
        Some(stored) => Drift::Changed {
            rendered_digest: digest_bytes(rendered),
            stored_digest: digest_bytes(stored),
        },
    }
}
