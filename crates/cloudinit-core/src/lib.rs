//! cloudinit-core - Deterministic cloud-init document renderer
//!
//! This crate turns a declared, ordered list of parts into a single
//! multi-part MIME document consumed by cloud-init at boot, optionally
//! gzip-compressed and base64-encoded:
//! - Part model and the declared (serde) input surface
//! - Content resolution against an injected key-value lookup
//! - Canonical MIME encoding with a fixed header order
//! - The gzip/base64 encoding pipeline
//! - Drift comparison against a previously stored rendering
//!
//! Rendering the same logical input always produces the same bytes. Nothing
//! in this crate generates randomness or keeps state between renders.

pub mod drift;
pub mod errors;
pub mod logging_facility;
pub mod lookup;
pub mod mime;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod resolve;

#[doc(hidden)]
pub use cloudinit_core_types as core_types;

pub use drift::{compare, compare_bytes, is_up_to_date, Drift};
pub use errors::{
    ConfigError, EncodeError, ExError, ExErrorKind, RenderError, ResolutionError, Result,
};
pub use lookup::{CancelHandle, Cancellation, DataMap, KeyValueLookup, LookupError, StaticLookup};
pub use model::{
    ConfigParameters, EncodingConfig, KeyRef, PartSpec, RenderedDocument, ResolvedPart,
    SourceKind, DEFAULT_DATA_KEY,
};
pub use render::{render, render_config, render_with_cancellation};
