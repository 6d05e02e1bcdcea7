//! Managed-resource operations for `CloudInitConfig`
//!
//! `observe`, `create`, `update` and `delete` each act on the target object
//! named by `writeCloudInitToRef`. `reconcile` strings them together for one
//! tick and records the result in the resource status.

use crate::errors::{self, Result};
use crate::resource::{CloudInitConfig, Condition};
use crate::store::{ObjectKey, ObjectStore};
use cloudinit_core::errors::{ExError, ExErrorKind};
use cloudinit_core::{
    compare_bytes, log_op_end, log_op_error, log_op_start, render_config, DataMap, Drift,
    RenderedDocument, DEFAULT_DATA_KEY,
};
use cloudinit_core_types::RequestContext;
use std::time::Instant;
use uuid::Uuid;

/// What `observe` found for a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub resource_exists: bool,
    pub resource_up_to_date: bool,
    pub drift: Drift,
    /// Digest of the fresh rendering, if one was made
    pub rendered_digest: Option<String>,
}

/// What one reconcile tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Created,
    Updated,
    UpToDate,
}

impl ReconcileOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileOutcome::Created => "Created",
            ReconcileOutcome::Updated => "Updated",
            ReconcileOutcome::UpToDate => "UpToDate",
        }
    }
}

/// Give an empty boundary a fixed random value, once
///
/// The value is written into `spec.forProvider` so every later render reuses it.
/// Returns `true` if the resource changed and must be persisted.
pub fn late_initialize(cr: &mut CloudInitConfig) -> bool {
    if !cr.spec.for_provider.boundary.is_empty() {
        return false;
    }
    cr.spec.for_provider.boundary = Uuid::new_v4().to_string();
    tracing::info!(
        resource = %cr.name,
        boundary = %cr.spec.for_provider.boundary,
        "late-initialized MIME boundary"
    );
    true
}

pub struct CloudInitClient<S> {
    store: S,
}

impl<S: ObjectStore> CloudInitClient<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn target(cr: &CloudInitConfig) -> Result<ObjectKey> {
        cr.spec
            .write_cloud_init_to_ref
            .as_ref()
            .map(|r| ObjectKey::config(cr.namespace.clone(), r.name.clone()))
            .ok_or_else(|| errors::missing_target_ref(&cr.name))
    }

    fn render(&self, cr: &CloudInitConfig) -> Result<RenderedDocument> {
        render_config(&cr.spec.for_provider, &self.store).map_err(ExError::from)
    }

    fn document_data(doc: &RenderedDocument) -> DataMap {
        DataMap::from([(
            DEFAULT_DATA_KEY.to_string(),
            doc.as_str().as_bytes().to_vec(),
        )])
    }

    /// Compare the stored document with a fresh rendering
    pub fn observe(&self, cr: &CloudInitConfig) -> Result<Observation> {
        let target = Self::target(cr)?;
        let Some(data) = self.store.get_object(&target)? else {
            return Ok(Observation {
                resource_exists: false,
                resource_up_to_date: false,
                drift: Drift::Missing,
                rendered_digest: None,
            });
        };

        let want = self.render(cr)?;
        let got = data.get(DEFAULT_DATA_KEY).map(Vec::as_slice);
        let drift = compare_bytes(want.as_str().as_bytes(), got);
        tracing::debug!(resource = %cr.name, object = %target, %drift, "observed");

        Ok(Observation {
            resource_exists: true,
            resource_up_to_date: drift.is_up_to_date(),
            drift,
            rendered_digest: Some(want.digest()),
        })
    }

    /// Render and write a new target object
    pub fn create(&self, cr: &mut CloudInitConfig) -> Result<RenderedDocument> {
        cr.status.set_condition(Condition::creating());
        let target = Self::target(cr)?;
        let doc = self.render(cr)?;
        self.store
            .create_object(&target, Self::document_data(&doc))?;
        Ok(doc)
    }

    /// Render and overwrite the existing target object
    pub fn update(&self, cr: &mut CloudInitConfig) -> Result<RenderedDocument> {
        let target = Self::target(cr)?;
        let doc = self.render(cr)?;
        self.store
            .update_object(&target, Self::document_data(&doc))?;
        Ok(doc)
    }

    /// Remove the target object; an already missing object is not an error
    pub fn delete(&self, cr: &mut CloudInitConfig) -> Result<()> {
        cr.status.set_condition(Condition::deleting());
        let target = Self::target(cr)?;
        match self.store.delete_object(&target) {
            Err(e) if e.kind() == ExErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    /// Run one reconcile tick and record the result in `cr.status`
    ///
    /// Errors are returned to the caller, which owns retry policy; the
    /// status is updated either way.
    pub fn reconcile(
        &self,
        cr: &mut CloudInitConfig,
        ctx: &RequestContext,
    ) -> Result<ReconcileOutcome> {
        let start = Instant::now();
        log_op_start!(
            "reconcile",
            request_id = %ctx.request_id,
            resource = %cr.name
        );

        late_initialize(cr);

        match self.reconcile_inner(cr) {
            Ok((outcome, digest)) => {
                cr.status.set_condition(Condition::available());
                cr.status.set_condition(Condition::reconcile_success());
                cr.status.synced = true;
                cr.status.at_provider.state = outcome.as_str().to_string();
                if let Some(digest) = digest {
                    cr.status.at_provider.document_digest = digest;
                }
                log_op_end!(
                    "reconcile",
                    duration_ms = start.elapsed().as_millis() as u64,
                    request_id = %ctx.request_id,
                    resource = %cr.name,
                    outcome = outcome.as_str()
                );
                Ok(outcome)
            }
            Err(err) => {
                let err = err.with_request_id(ctx.request_id.clone());
                cr.status
                    .set_condition(Condition::reconcile_error(err.to_string()));
                cr.status.synced = false;
                cr.status.failed = cr.status.failed.saturating_add(1);
                log_op_error!(
                    "reconcile",
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    request_id = %ctx.request_id,
                    resource = %cr.name
                );
                Err(err)
            }
        }
    }

    fn reconcile_inner(
        &self,
        cr: &mut CloudInitConfig,
    ) -> Result<(ReconcileOutcome, Option<String>)> {
        let observation = self.observe(cr)?;
        if !observation.resource_exists {
            let doc = self.create(cr)?;
            return Ok((ReconcileOutcome::Created, Some(doc.digest())));
        }
        if !observation.resource_up_to_date {
            let doc = self.update(cr)?;
            return Ok((ReconcileOutcome::Updated, Some(doc.digest())));
        }
        Ok((ReconcileOutcome::UpToDate, observation.rendered_digest))
    }
}
