use sha2::{Digest, Sha256};
use std::fmt;

/// Final rendered document, exactly as it should be persisted
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderedDocument(String);

impl RenderedDocument {
    pub fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Hex-encoded SHA256 of the document bytes (64 characters)
    pub fn digest(&self) -> String {
        digest_str(&self.0)
    }
}

impl fmt::Display for RenderedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RenderedDocument {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub(crate) fn digest_str(s: &str) -> String {
    digest_bytes(s.as_bytes())
}

pub(crate) fn digest_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
