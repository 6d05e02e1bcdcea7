//! Managed `CloudInitConfig` resource and its status

use chrono::{DateTime, Utc};
use cloudinit_core::{ConfigError, ConfigParameters};
use serde::{Deserialize, Serialize};

/// Name of an object in the resource's own namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSpec {
    pub for_provider: ConfigParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_cloud_init_to_ref: Option<ObjectRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionType {
    Ready,
    Synced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionReason {
    Creating,
    Available,
    Deleting,
    ReconcileSuccess,
    ReconcileError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub kind: ConditionType,
    pub status: bool,
    pub reason: ConditionReason,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    pub last_transition_time: DateTime<Utc>,
}

impl Condition {
    fn new(kind: ConditionType, status: bool, reason: ConditionReason) -> Self {
        Self {
            kind,
            status,
            reason,
            message: String::new(),
            last_transition_time: Utc::now(),
        }
    }

    pub fn creating() -> Self {
        Self::new(ConditionType::Ready, false, ConditionReason::Creating)
    }

    pub fn available() -> Self {
        Self::new(ConditionType::Ready, true, ConditionReason::Available)
    }

    pub fn deleting() -> Self {
        Self::new(ConditionType::Ready, false, ConditionReason::Deleting)
    }

    pub fn reconcile_success() -> Self {
        Self::new(ConditionType::Synced, true, ConditionReason::ReconcileSuccess)
    }

    pub fn reconcile_error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::new(ConditionType::Synced, false, ConditionReason::ReconcileError)
        }
    }

    fn same_state(&self, other: &Condition) -> bool {
        self.status == other.status && self.reason == other.reason && self.message == other.message
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigObservation {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub document_digest: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub at_provider: ConfigObservation,
    #[serde(default)]
    pub failed: u32,
    #[serde(default)]
    pub synced: bool,
}

impl ConfigStatus {
    /// Set a condition, replacing any with the same type
    ///
    /// The transition time is kept when nothing but the time changed.
    pub fn set_condition(&mut self, condition: Condition) {
        match self.conditions.iter_mut().find(|c| c.kind == condition.kind) {
            Some(existing) if existing.same_state(&condition) => {}
            Some(existing) => *existing = condition,
            None => self.conditions.push(condition),
        }
    }

    pub fn condition(&self, kind: ConditionType) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.kind == kind)
    }
}

/// Cluster-visible cloud-init configuration resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudInitConfig {
    pub name: String,
    pub namespace: String,
    pub spec: ConfigSpec,
    #[serde(default)]
    pub status: ConfigStatus,
}

impl CloudInitConfig {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, spec: ConfigSpec) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            spec,
            status: ConfigStatus::default(),
        }
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(input)?)
    }

    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }
}
