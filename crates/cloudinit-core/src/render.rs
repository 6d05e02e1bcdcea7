//! Render entry point
//!
//! `render` is a pure function of the parts, the lookup snapshot and the
//! encoding options: gzip precondition, then resolution, then MIME
//! encoding, then the gzip/base64 pipeline.

use crate::errors::{RenderError, Result};
use crate::lookup::{Cancellation, KeyValueLookup};
use crate::model::{ConfigParameters, EncodingConfig, PartSpec, RenderedDocument};
use crate::{log_op_end, log_op_error, log_op_start, mime, pipeline, resolve};
use std::time::Instant;

/// Render `parts` into the final document
///
/// # Errors
/// * `Encode(GzipRequiresBase64)` - before any lookup
/// * `Resolution(..)` - a reference could not be resolved
/// * `Encode(NoParts | InvalidBoundary | ..)` - the document could not be built
pub fn render(
    parts: &[PartSpec],
    lookup: &dyn KeyValueLookup,
    cfg: &EncodingConfig,
) -> Result<RenderedDocument> {
    render_with_cancellation(parts, lookup, cfg, &Cancellation::none())
}

/// Like [`render`], aborting with `Cancelled` if `cancel` fires mid-resolution
pub fn render_with_cancellation(
    parts: &[PartSpec],
    lookup: &dyn KeyValueLookup,
    cfg: &EncodingConfig,
    cancel: &Cancellation,
) -> Result<RenderedDocument> {
    let start = Instant::now();
    log_op_start!(
        "render",
        part_count = parts.len(),
        gzip = cfg.gzip,
        base64 = cfg.base64
    );

    match render_inner(parts, lookup, cfg, cancel) {
        Ok(doc) => {
            log_op_end!(
                "render",
                duration_ms = start.elapsed().as_millis() as u64,
                document_len = doc.len(),
                document_digest = %doc.digest()
            );
            Ok(doc)
        }
        Err(err) => {
            log_op_error!(
                "render",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(err)
        }
    }
}

fn render_inner(
    parts: &[PartSpec],
    lookup: &dyn KeyValueLookup,
    cfg: &EncodingConfig,
    cancel: &Cancellation,
) -> Result<RenderedDocument> {
    pipeline::check_encoding(cfg)?;

    let resolved = resolve::resolve(parts, lookup, cancel)?;
    tracing::debug!(
        part_count = resolved.len(),
        skipped_count = parts.len() - resolved.len(),
        "parts resolved"
    );

    let raw = mime::encode_document(&resolved, &cfg.boundary)?;
    let text = pipeline::apply_pipeline(raw, cfg)?;
    Ok(RenderedDocument::new(text))
}

/// Render a declared configuration
///
/// # Errors
/// `Config(AmbiguousReference)` in addition to everything [`render`] returns.
pub fn render_config(
    params: &ConfigParameters,
    lookup: &dyn KeyValueLookup,
) -> Result<RenderedDocument> {
    let parts = params.part_specs().map_err(RenderError::from)?;
    render(&parts, lookup, &params.encoding())
}
