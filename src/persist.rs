//! Persistence adapter: snapshot/restore of the project model through an
//! opaque string-keyed blob store.
//!
//! DESIGN
//! ======
//! The whole model is written as one JSON object keyed by container name,
//! each value an ordered list of `{"id", "type", "configuration"}` records.
//! There is no version field. Restore never fails: a missing or unparseable
//! blob yields an empty model, and damaged entries are dropped one at a time
//! with a warning so the rest of the project still loads.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use serde_json::Value;

use crate::error::BuilderError;
use crate::model::{ComponentInstance, Container, Fields, ProjectModel};

/// A synchronous key/value store for string blobs.
pub trait BlobStore {
    /// Read the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `Storage` when the medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, BuilderError>;

    /// Write `value` under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns `Storage` when the medium rejects the write.
    fn set(&mut self, key: &str, value: &str) -> Result<(), BuilderError>;
}

/// In-memory blob store, for tests and hosts without durable storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, BuilderError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), BuilderError> {
        self.blobs.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// One persisted instance record. Every key is optional so that older or
/// partially written blobs read as "missing" rather than failing.
#[derive(Debug, Deserialize)]
struct StoredInstance {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "type", alias = "typeTag")]
    kind: Option<String>,
    #[serde(default, rename = "configuration", alias = "fields")]
    fields: BTreeMap<String, Value>,
}

/// Outcome of a restore, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Instances rebuilt into the model.
    pub restored: usize,
    /// Entries skipped because they could not be rebuilt.
    pub dropped: usize,
}

/// Serialize every container and its instances.
///
/// # Errors
///
/// Returns `Storage` if serialization fails.
pub fn snapshot(model: &ProjectModel) -> Result<String, BuilderError> {
    let layout: BTreeMap<&str, &Vec<ComponentInstance>> = model
        .containers()
        .map(|Container { name, items }| (name.as_str(), items))
        .collect();
    serde_json::to_string(&layout).map_err(|err| BuilderError::Storage(err.to_string()))
}

/// Replace the contents of `model` with the project described by `blob`.
///
/// The model keeps its registry and container set; containers the blob
/// names but the model lacks are dropped.
pub fn restore(model: &mut ProjectModel, blob: Option<&str>) -> RestoreReport {
    model.clear();
    let Some(blob) = blob else {
        return RestoreReport::default();
    };

    let layout: serde_json::Map<String, Value> = match serde_json::from_str(blob) {
        Ok(layout) => layout,
        Err(err) => {
            tracing::warn!(error = %err, "saved project is malformed; starting empty");
            return RestoreReport::default();
        }
    };

    let mut report = RestoreReport::default();
    for (container, entries) in layout {
        let Value::Array(entries) = entries else {
            tracing::warn!(%container, "saved container is not a list; skipped");
            continue;
        };
        if !model.has_container(&container) {
            tracing::warn!(%container, count = entries.len(), "saved container is unknown; skipped");
            report.dropped += entries.len();
            continue;
        }
        for entry in entries {
            if restore_entry(model, &container, entry) {
                report.restored += 1;
            } else {
                report.dropped += 1;
            }
        }
    }
    report
}

fn restore_entry(model: &mut ProjectModel, container: &str, entry: Value) -> bool {
    let stored: StoredInstance = match serde_json::from_value(entry) {
        Ok(stored) => stored,
        Err(err) => {
            tracing::warn!(container, error = %err, "saved component is malformed; skipped");
            return false;
        }
    };
    let Some(id) = stored.id.filter(|id| !id.is_empty()) else {
        tracing::warn!(container, "saved component has no id; skipped");
        return false;
    };
    let tag = stored.kind.unwrap_or_default();
    let descriptor = match model.registry().describe(&tag) {
        Ok(descriptor) => descriptor,
        Err(err) => {
            tracing::warn!(%id, error = %err, "saved component skipped");
            return false;
        }
    };

    let mut fields = Fields::new();
    for (name, value) in stored.fields {
        let (Some(field), Value::String(value)) = (descriptor.field(&name), value) else {
            tracing::warn!(%id, field = %name, "saved field dropped");
            continue;
        };
        fields.insert(field.key.to_owned(), value);
    }

    let instance = ComponentInstance { id, kind: descriptor.kind, fields };
    if model.insert_restored(container, instance) {
        true
    } else {
        tracing::warn!(container, "saved component duplicates a live id; skipped");
        false
    }
}

/// Binds a blob store to the application's storage key.
pub struct Persistence {
    store: Box<dyn BlobStore>,
    key: String,
}

impl Persistence {
    #[must_use]
    pub fn new(store: Box<dyn BlobStore>, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    /// The key the project is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Snapshot `model` into the store.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if serialization or the write fails.
    pub fn save(&mut self, model: &ProjectModel) -> Result<(), BuilderError> {
        let blob = snapshot(model)?;
        self.store.set(&self.key, &blob)?;
        tracing::debug!(key = %self.key, bytes = blob.len(), "project saved");
        Ok(())
    }

    /// Rebuild `model` from the store. An unreadable store loads as empty.
    pub fn load(&self, model: &mut ProjectModel) -> RestoreReport {
        let blob = match self.store.get(&self.key) {
            Ok(blob) => blob,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "project store unreadable; starting empty");
                None
            }
        };
        let report = restore(model, blob.as_deref());
        tracing::info!(key = %self.key, restored = report.restored, dropped = report.dropped, "project loaded");
        report
    }
}
