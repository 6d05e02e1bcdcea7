//! cloudinit-engine - Orchestration layer
//!
//! Drives the deterministic renderer from a managed `CloudInitConfig`
//! resource: late-initialises the MIME boundary, renders, compares against
//! the stored document and writes it back through an [`ObjectStore`].

pub mod client;
pub mod errors;
pub mod resource;
pub mod store;

pub use client::{late_initialize, CloudInitClient, Observation, ReconcileOutcome};
pub use errors::Result;
pub use resource::{
    CloudInitConfig, Condition, ConditionReason, ConditionType, ConfigObservation, ConfigSpec,
    ConfigStatus, ObjectRef,
};
pub use store::{InMemoryObjectStore, ObjectKey, ObjectStore};
