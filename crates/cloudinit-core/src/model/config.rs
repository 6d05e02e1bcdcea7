//! Render options and the declared input surface
//!
//! `ConfigParameters` mirrors what an operator writes: a YAML/JSON document
//! with global flags and an ordered `part` list. It is converted into
//! [`PartSpec`]s and an [`EncodingConfig`] before rendering.

use super::part::{KeyRef, PartSpec, SourceKind};
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Render-time encoding options
///
/// `boundary` is always supplied by the caller; the renderer never makes one
/// up. `gzip` without `base64` is rejected at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingConfig {
    pub boundary: String,
    pub gzip: bool,
    pub base64: bool,
}

impl EncodingConfig {
    /// Plain-text output with the given boundary
    pub fn new(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            gzip: false,
            base64: false,
        }
    }

    pub fn with_gzip(mut self, gzip: bool) -> Self {
        self.gzip = gzip;
        self
    }

    pub fn with_base64(mut self, base64: bool) -> Self {
        self.base64 = base64;
        self
    }
}

/// Selector for one key of a namespaced object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataKeySelector {
    pub namespace: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

impl DataKeySelector {
    fn to_key_ref(&self, source_kind: SourceKind) -> KeyRef {
        KeyRef {
            source_kind,
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            key: non_empty(&self.key),
            optional: self.optional,
        }
    }
}

/// One declared part
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartDecl {
    #[serde(rename = "configMapKeyRef", skip_serializing_if = "Option::is_none")]
    pub config_map_key_ref: Option<DataKeySelector>,
    #[serde(rename = "secretKeyRef", skip_serializing_if = "Option::is_none")]
    pub secret_key_ref: Option<DataKeySelector>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filename: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub merge_type: String,
}

/// Declared cloud-init configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigParameters {
    pub gzip: bool,
    pub base64_encode: bool,
    pub boundary: String,
    pub part: Vec<PartDecl>,
}

impl ConfigParameters {
    pub fn from_yaml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(input)?)
    }

    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn encoding(&self) -> EncodingConfig {
        EncodingConfig {
            boundary: self.boundary.clone(),
            gzip: self.gzip,
            base64: self.base64_encode,
        }
    }

    /// Convert the declared parts, preserving order
    pub fn part_specs(&self) -> Result<Vec<PartSpec>, ConfigError> {
        self.part
            .iter()
            .enumerate()
            .map(|(index, decl)| {
                let external_ref = match (&decl.config_map_key_ref, &decl.secret_key_ref) {
                    (Some(_), Some(_)) => return Err(ConfigError::AmbiguousReference { index }),
                    (Some(sel), None) => Some(sel.to_key_ref(SourceKind::ConfigObject)),
                    (None, Some(sel)) => Some(sel.to_key_ref(SourceKind::SecretObject)),
                    (None, None) => None,
                };
                Ok(PartSpec {
                    content: non_empty(&decl.content),
                    external_ref,
                    filename: non_empty(&decl.filename),
                    content_type: non_empty(&decl.content_type),
                    merge_type: non_empty(&decl.merge_type),
                })
            })
            .collect()
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}
