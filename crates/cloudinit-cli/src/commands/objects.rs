//! Objects file loader
//!
//! An objects file is a YAML or JSON list standing in for the cluster:
//!
//! ```yaml
//! - kind: ConfigObject
//!   namespace: default
//!   name: user-data
//!   data:
//!     cloud-init: "#cloud-config"
//! ```
//!
//! An entry without `data` is an object that exists but holds nothing.

use super::{io_error, is_json};
use cloudinit_core::{ExError, ExErrorKind, SourceKind, StaticLookup};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ObjectEntry {
    kind: SourceKind,
    namespace: String,
    name: String,
    #[serde(default)]
    data: Option<BTreeMap<String, String>>,
}

/// Build a lookup from an optional objects file
pub fn load_objects(path: Option<&Path>) -> Result<StaticLookup, ExError> {
    let Some(path) = path else {
        return Ok(StaticLookup::new());
    };

    let text = std::fs::read_to_string(path).map_err(|e| io_error("read_objects", path, e))?;
    let parsed: Result<Vec<ObjectEntry>, String> = if is_json(path) {
        serde_json::from_str(&text).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str(&text).map_err(|e| e.to_string())
    };
    let entries = parsed.map_err(|message| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("parse_objects")
            .with_object(path.display().to_string())
            .with_message(message)
    })?;

    let mut lookup = StaticLookup::new();
    for entry in entries {
        match entry.data {
            Some(data) => lookup.insert(entry.kind, &entry.namespace, &entry.name, data),
            None => lookup = lookup.with_empty_object(entry.kind, &entry.namespace, &entry.name),
        }
    }
    tracing::debug!(objects = %path.display(), count = lookup.len(), "loaded objects");
    Ok(lookup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudinit_core::KeyValueLookup;
    use std::io::Write;

    #[test]
    fn test_load_yaml_objects() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(
            file,
            "- kind: SecretObject\n  namespace: ns\n  name: s\n  data:\n    cloud-init: hi\n- kind: ConfigObject\n  namespace: ns\n  name: empty\n"
        )
        .unwrap();

        let lookup = load_objects(Some(file.path())).unwrap();

        assert_eq!(lookup.len(), 2);
        let data = lookup.get(SourceKind::SecretObject, "ns", "s").unwrap().unwrap();
        assert_eq!(data["cloud-init"], b"hi".to_vec());
        assert_eq!(lookup.get(SourceKind::ConfigObject, "ns", "empty").unwrap(), None);
    }

    #[test]
    fn test_malformed_objects_file_is_serialization_error() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "[{{\"kind\": \"Nope\"}}]").unwrap();

        let err = load_objects(Some(file.path())).unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::Serialization);
        assert_eq!(err.op(), Some("parse_objects"));
    }

    #[test]
    fn test_no_objects_file_is_empty_lookup() {
        assert!(load_objects(None).unwrap().is_empty());
    }
}
