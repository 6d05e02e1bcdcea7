use cloudinit_core_types::Sensitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Data key read from a referenced object when the reference names none
pub const DEFAULT_DATA_KEY: &str = "cloud-init";

/// Kind of namespaced key-value object a part may reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SourceKind {
    ConfigObject,
    SecretObject,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::ConfigObject => "ConfigObject",
            SourceKind::SecretObject => "SecretObject",
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, SourceKind::SecretObject)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to one key of a namespaced key-value object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRef {
    pub source_kind: SourceKind,
    pub namespace: String,
    pub name: String,
    pub key: Option<String>,
    /// A missing object or key skips the part instead of failing the render
    pub optional: bool,
}

impl KeyRef {
    pub fn new(source_kind: SourceKind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            source_kind,
            namespace: namespace.into(),
            name: name.into(),
            key: None,
            optional: false,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// The key to read: the declared one if non-empty, else [`DEFAULT_DATA_KEY`]
    pub fn effective_key(&self) -> &str {
        match self.key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => DEFAULT_DATA_KEY,
        }
    }
}

impl fmt::Display for KeyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.source_kind, self.namespace, self.name)
    }
}

/// Declarative description of one document part
///
/// When both `content` and `external_ref` are set the reference wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartSpec {
    pub content: Option<String>,
    pub external_ref: Option<KeyRef>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub merge_type: Option<String>,
}

impl PartSpec {
    pub fn inline(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn reference(external_ref: KeyRef) -> Self {
        Self {
            external_ref: Some(external_ref),
            ..Self::default()
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_merge_type(mut self, merge_type: impl Into<String>) -> Self {
        self.merge_type = Some(merge_type.into());
        self
    }
}

/// A part with concrete content, ready for encoding
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedPart {
    content: Vec<u8>,
    filename: Option<String>,
    content_type: Option<String>,
    merge_type: Option<String>,
    source: Option<SourceKind>,
}

impl ResolvedPart {
    /// Build a resolved part carrying the metadata of `spec`
    pub fn from_spec(spec: &PartSpec, content: Vec<u8>, source: Option<SourceKind>) -> Self {
        Self {
            content,
            filename: spec.filename.clone(),
            content_type: spec.content_type.clone(),
            merge_type: spec.merge_type.clone(),
            source,
        }
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn merge_type(&self) -> Option<&str> {
        self.merge_type.as_deref()
    }

    /// Kind of object the content came from, `None` for inline content
    pub fn source(&self) -> Option<SourceKind> {
        self.source
    }
}

impl fmt::Debug for ResolvedPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("ResolvedPart");
        if self.source.is_some_and(|k| k.is_secret()) {
            s.field("content", &Sensitive::new(&self.content));
        } else {
            s.field("content", &String::from_utf8_lossy(&self.content));
        }
        s.field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("merge_type", &self.merge_type)
            .field("source", &self.source)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_key_defaults_when_empty() {
        let r = KeyRef::new(SourceKind::ConfigObject, "default", "cm");
        assert_eq!(r.effective_key(), DEFAULT_DATA_KEY);
        assert_eq!(r.clone().with_key("").effective_key(), DEFAULT_DATA_KEY);
        assert_eq!(r.with_key("user-data").effective_key(), "user-data");
    }

    #[test]
    fn test_key_ref_display() {
        let r = KeyRef::new(SourceKind::SecretObject, "infra", "node-secrets");
        assert_eq!(r.to_string(), "SecretObject infra/node-secrets");
    }

    #[test]
    fn test_secret_content_is_redacted_in_debug() {
        let spec = PartSpec::inline("ignored");
        let part = ResolvedPart::from_spec(
            &spec,
            b"password: hunter2".to_vec(),
            Some(SourceKind::SecretObject),
        );
        let out = format!("{:?}", part);
        assert!(!out.contains("hunter2"));
        assert!(out.contains("REDACTED"));
    }

    #[test]
    fn test_config_content_is_visible_in_debug() {
        let part = ResolvedPart::from_spec(
            &PartSpec::inline("x"),
            b"#cloud-config".to_vec(),
            Some(SourceKind::ConfigObject),
        );
        assert!(format!("{:?}", part).contains("#cloud-config"));
    }
}
