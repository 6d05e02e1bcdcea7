//! Content resolution
//!
//! Turns declared parts into concrete bytes, in input order. Parts whose
//! optional reference points at a missing object or key are dropped from
//! the output entirely.

use crate::errors::ResolutionError;
use crate::lookup::{Cancellation, KeyValueLookup, LookupError};
use crate::model::{KeyRef, PartSpec, ResolvedPart};

/// Resolve every part against `lookup`
///
/// # Errors
/// * `ReferenceNotFound` - non-optional reference to a missing object
/// * `KeyNotFound` - non-optional reference to a missing key
/// * `Cancelled` - `cancel` fired before a lookup
/// * `Lookup` - the lookup backend failed
pub fn resolve(
    parts: &[PartSpec],
    lookup: &dyn KeyValueLookup,
    cancel: &Cancellation,
) -> Result<Vec<ResolvedPart>, ResolutionError> {
    let mut resolved = Vec::with_capacity(parts.len());

    for (index, spec) in parts.iter().enumerate() {
        let Some(reference) = &spec.external_ref else {
            let content = spec.content.clone().unwrap_or_default().into_bytes();
            resolved.push(ResolvedPart::from_spec(spec, content, None));
            continue;
        };

        if spec.content.is_some() {
            tracing::warn!(
                part_index = index,
                object = %reference,
                "part declares both inline content and a reference; using the reference"
            );
        }

        if cancel.is_cancelled() {
            return Err(ResolutionError::Cancelled { index });
        }

        if let Some(content) = fetch(index, reference, lookup)? {
            resolved.push(ResolvedPart::from_spec(
                spec,
                content,
                Some(reference.source_kind),
            ));
        }
    }

    Ok(resolved)
}

/// Fetch the referenced value; `Ok(None)` means skip the part
fn fetch(
    index: usize,
    reference: &KeyRef,
    lookup: &dyn KeyValueLookup,
) -> Result<Option<Vec<u8>>, ResolutionError> {
    let data = match lookup.get(reference.source_kind, &reference.namespace, &reference.name) {
        Ok(Some(data)) => data,
        Ok(None) | Err(LookupError::NotFound) => {
            if reference.optional {
                tracing::debug!(
                    part_index = index,
                    object = %reference,
                    "optional reference not found, skipping part"
                );
                return Ok(None);
            }
            return Err(ResolutionError::ReferenceNotFound {
                index,
                reference: reference.to_string(),
            });
        }
        Err(LookupError::Cancelled) => return Err(ResolutionError::Cancelled { index }),
        Err(LookupError::Backend(message)) => {
            return Err(ResolutionError::Lookup {
                index,
                reference: reference.to_string(),
                message,
            })
        }
    };

    let key = reference.effective_key();
    match data.get(key) {
        Some(value) => Ok(Some(value.clone())),
        None if reference.optional => {
            tracing::debug!(
                part_index = index,
                object = %reference,
                key,
                "optional key not found, skipping part"
            );
            Ok(None)
        }
        None => Err(ResolutionError::KeyNotFound {
            index,
            reference: reference.to_string(),
            key: key.to_string(),
        }),
    }
}
