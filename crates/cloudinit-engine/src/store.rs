//! Object store capability
//!
//! The engine reads referenced objects and writes the rendered document
//! through the same store. `InMemoryObjectStore` backs tests and the CLI.

use crate::errors::{self, Result};
use cloudinit_core::{DataMap, KeyValueLookup, LookupError, SourceKind};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::RwLock;

/// Identity of one namespaced object
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    pub kind: SourceKind,
    pub namespace: String,
    pub name: String,
}

impl ObjectKey {
    pub fn new(kind: SourceKind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn config(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(SourceKind::ConfigObject, namespace, name)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.kind, self.namespace, self.name)
    }
}

/// Read/write access to namespaced key-value objects
pub trait ObjectStore: KeyValueLookup {
    /// `Ok(None)` when the object does not exist
    fn get_object(&self, key: &ObjectKey) -> Result<Option<DataMap>>;

    /// Fails with `AlreadyExists` if the object is present
    fn create_object(&self, key: &ObjectKey, data: DataMap) -> Result<()>;

    /// Fails with `NotFound` if the object is absent
    fn update_object(&self, key: &ObjectKey, data: DataMap) -> Result<()>;

    /// Fails with `NotFound` if the object is absent
    fn delete_object(&self, key: &ObjectKey) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: RwLock<BTreeMap<ObjectKey, DataMap>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an object
    pub fn put<K, V>(&self, key: ObjectKey, data: impl IntoIterator<Item = (K, V)>) -> Result<()>
    where
        K: Into<String>,
        V: Into<Vec<u8>>,
    {
        let data = data
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.objects
            .write()
            .map_err(|_| errors::store_poisoned("put_object"))?
            .insert(key, data);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueLookup for InMemoryObjectStore {
    fn get(
        &self,
        kind: SourceKind,
        namespace: &str,
        name: &str,
    ) -> std::result::Result<Option<DataMap>, LookupError> {
        let objects = self
            .objects
            .read()
            .map_err(|_| LookupError::Backend("object store lock poisoned".to_string()))?;
        objects
            .get(&ObjectKey::new(kind, namespace, name))
            .cloned()
            .map(Some)
            .ok_or(LookupError::NotFound)
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn get_object(&self, key: &ObjectKey) -> Result<Option<DataMap>> {
        let objects = self
            .objects
            .read()
            .map_err(|_| errors::store_poisoned("get_object"))?;
        Ok(objects.get(key).cloned())
    }

    fn create_object(&self, key: &ObjectKey, data: DataMap) -> Result<()> {
        let mut objects = self
            .objects
            .write()
            .map_err(|_| errors::store_poisoned("create_object"))?;
        if objects.contains_key(key) {
            return Err(errors::object_exists(key));
        }
        objects.insert(key.clone(), data);
        Ok(())
    }

    fn update_object(&self, key: &ObjectKey, data: DataMap) -> Result<()> {
        let mut objects = self
            .objects
            .write()
            .map_err(|_| errors::store_poisoned("update_object"))?;
        match objects.get_mut(key) {
            Some(existing) => {
                *existing = data;
                Ok(())
            }
            None => Err(errors::object_missing("update_object", key)),
        }
    }

    fn delete_object(&self, key: &ObjectKey) -> Result<()> {
        let mut objects = self
            .objects
            .write()
            .map_err(|_| errors::store_poisoned("delete_object"))?;
        objects
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| errors::object_missing("delete_object", key))
    }
}
