//! Key-value lookup capability and render cancellation
//!
//! The renderer never talks to a backing store directly. The caller injects
//! a [`KeyValueLookup`] and, optionally, a [`Cancellation`] that is checked
//! before every lookup.

use crate::model::SourceKind;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Data of one namespaced object, keyed by data key
pub type DataMap = BTreeMap<String, Vec<u8>>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("object not found")]
    NotFound,

    #[error("lookup cancelled")]
    Cancelled,

    #[error("{0}")]
    Backend(String),
}

/// Read access to namespaced key-value objects
///
/// `Ok(None)` means the object exists but carries no data; the resolver
/// treats it like a missing object.
pub trait KeyValueLookup {
    fn get(
        &self,
        kind: SourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<Option<DataMap>, LookupError>;
}

impl<T: KeyValueLookup + ?Sized> KeyValueLookup for &T {
    fn get(
        &self,
        kind: SourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<Option<DataMap>, LookupError> {
        (**self).get(kind, namespace, name)
    }
}

impl<T: KeyValueLookup + ?Sized> KeyValueLookup for Arc<T> {
    fn get(
        &self,
        kind: SourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<Option<DataMap>, LookupError> {
        (**self).get(kind, namespace, name)
    }
}

/// Immutable in-memory snapshot of objects
#[derive(Debug, Clone, Default)]
pub struct StaticLookup {
    objects: BTreeMap<(SourceKind, String, String), Option<DataMap>>,
}

impl StaticLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object with data
    pub fn with_object<K, V>(
        mut self,
        kind: SourceKind,
        namespace: &str,
        name: &str,
        data: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<Vec<u8>>,
    {
        self.insert(kind, namespace, name, data);
        self
    }

    /// Add an object that exists but has no data
    pub fn with_empty_object(mut self, kind: SourceKind, namespace: &str, name: &str) -> Self {
        self.objects
            .insert((kind, namespace.to_string(), name.to_string()), None);
        self
    }

    pub fn insert<K, V>(
        &mut self,
        kind: SourceKind,
        namespace: &str,
        name: &str,
        data: impl IntoIterator<Item = (K, V)>,
    ) where
        K: Into<String>,
        V: Into<Vec<u8>>,
    {
        let data = data
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.objects
            .insert((kind, namespace.to_string(), name.to_string()), Some(data));
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl KeyValueLookup for StaticLookup {
    fn get(
        &self,
        kind: SourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<Option<DataMap>, LookupError> {
        self.objects
            .get(&(kind, namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or(LookupError::NotFound)
    }
}

/// Cancellation signal checked by the resolver before each lookup
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    flag: Option<Arc<AtomicBool>>,
    deadline: Option<Instant>,
}

/// Handle used to cancel an in-flight render from another thread
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl Cancellation {
    /// Never cancelled
    pub fn none() -> Self {
        Self::default()
    }

    /// A cancellation paired with the handle that triggers it
    pub fn token() -> (Self, CancelHandle) {
        let flag = Arc::new(AtomicBool::new(false));
        let cancel = Self {
            flag: Some(flag.clone()),
            deadline: None,
        };
        (cancel, CancelHandle(flag))
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn is_cancelled(&self) -> bool {
        if self
            .flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
        {
            return true;
        }
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }
}
