//! Error handling for cloudinit-engine
//!
//! Wraps cloudinit-core ExError with engine-specific helpers

use crate::store::ObjectKey;
use cloudinit_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// The resource does not say where to write the document
pub fn missing_target_ref(resource: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidConfig)
        .with_op("resolve_target")
        .with_message(format!(
            "resource {} has no writeCloudInitToRef",
            resource
        ))
}

pub fn object_exists(key: &ObjectKey) -> ExError {
    ExError::new(ExErrorKind::AlreadyExists)
        .with_op("create_object")
        .with_object(key.to_string())
        .with_message("object already exists")
}

pub fn object_missing(op: &str, key: &ObjectKey) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op(op.to_string())
        .with_object(key.to_string())
        .with_message("object not found")
}

/// Lock poisoned by a panicking writer
pub fn store_poisoned(op: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op(op.to_string())
        .with_message("object store lock poisoned")
}
