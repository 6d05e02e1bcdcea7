//! Core types shared across the cloud-init rendering crates
//!
//! This crate provides foundational types used by both error handling
//! and logging facilities:
//!
//! - **Correlation types**: RequestId, RequestContext
//! - **Sensitive data**: Sensitive<T> marker for secret-backed part content
//! - **Schema constants**: Canonical envelope keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::{RequestContext, RequestId};
pub use sensitive::Sensitive;
