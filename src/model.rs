//! Project model: named containers holding ordered component instances.
//!
//! DESIGN
//! ======
//! The model is the single source of truth for what is on the page. Each
//! container keeps its instances in visual (top-to-bottom) order, and an
//! id -> container index is maintained alongside the sequences so lookups
//! never have to consult the rendered view. Every fallible operation
//! validates all of its inputs before the first mutation.
//!
//! Moves always remove then append to the end of the target, including a
//! move onto the instance's own container.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::clock;
use crate::error::BuilderError;
use crate::registry::{ComponentKind, Registry};

/// Unique identifier of a placed instance, e.g. `"video-1718000000000"`.
pub type InstanceId = String;

/// Field values keyed by lower-cased field key. Absent means unset.
pub type Fields = BTreeMap<String, String>;

/// A placed component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentInstance {
    pub id: InstanceId,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    #[serde(rename = "configuration")]
    pub fields: Fields,
}

impl ComponentInstance {
    /// Stored value for `key`, if set.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

/// A named drop target and its instances in visual order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Container {
    pub name: String,
    pub items: Vec<ComponentInstance>,
}

impl Container {
    fn new(name: &str) -> Self {
        Self { name: name.to_owned(), items: Vec::new() }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Ids in visual order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.id.as_str())
    }
}

/// The whole editable project.
#[derive(Debug, Clone)]
pub struct ProjectModel {
    registry: Registry,
    containers: Vec<Container>,
    /// Instance id -> index into `containers`.
    index: HashMap<InstanceId, usize>,
    clock: fn() -> i64,
    /// Highest stamp issued or restored. Never lowered, so an id is not
    /// reissued after its instance is removed.
    last_stamp: i64,
}

impl ProjectModel {
    /// Create an empty model with one container per name. Repeated names
    /// collapse into the first occurrence.
    #[must_use]
    pub fn new<S: AsRef<str>>(registry: Registry, container_names: &[S]) -> Self {
        let mut containers: Vec<Container> = Vec::with_capacity(container_names.len());
        for name in container_names {
            let name = name.as_ref();
            if !containers.iter().any(|c| c.name == name) {
                containers.push(Container::new(name));
            }
        }
        Self { registry, containers, index: HashMap::new(), clock: clock::now_millis, last_stamp: i64::MIN }
    }

    /// Replace the timestamp source used for new ids.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    /// The catalog this model validates against.
    #[must_use]
    pub fn registry(&self) -> Registry {
        self.registry
    }

    // --- Mutations ---

    /// Append a new, unconfigured instance of `tag` to `container`.
    ///
    /// # Errors
    ///
    /// `UnknownType` for a tag outside the catalog, `UnknownContainer` for a
    /// container outside the configured set.
    pub fn place(&mut self, tag: &str, container: &str) -> Result<InstanceId, BuilderError> {
        let kind = self.registry.describe(tag)?.kind;
        let slot = self.slot(container)?;
        let id = self.fresh_id(kind);

        self.containers[slot]
            .items
            .push(ComponentInstance { id: id.clone(), kind, fields: Fields::new() });
        self.index.insert(id.clone(), slot);
        tracing::info!(%id, container, "component placed");
        Ok(id)
    }

    /// Move `id` out of `from` and append it to the end of `to`.
    ///
    /// # Errors
    ///
    /// `UnknownContainer` if either container is unknown, `NotFound` if `id`
    /// is not in `from`.
    pub fn move_to(&mut self, id: &str, from: &str, to: &str) -> Result<(), BuilderError> {
        let src = self.slot(from)?;
        let dst = self.slot(to)?;
        let pos = self.containers[src]
            .position(id)
            .ok_or_else(|| BuilderError::NotFound(id.to_owned()))?;

        let item = self.containers[src].items.remove(pos);
        self.containers[dst].items.push(item);
        self.index.insert(id.to_owned(), dst);
        tracing::info!(id, from, to, "component moved");
        Ok(())
    }

    /// Remove `id` from `container`. Absent ids and unknown containers are a
    /// no-op, since deletion may come from a stale view.
    pub fn remove(&mut self, id: &str, container: &str) -> Option<ComponentInstance> {
        let Ok(slot) = self.slot(container) else {
            tracing::debug!(id, container, "remove from unknown container ignored");
            return None;
        };
        let Some(pos) = self.containers[slot].position(id) else {
            tracing::debug!(id, container, "remove of absent component ignored");
            return None;
        };

        let item = self.containers[slot].items.remove(pos);
        self.index.remove(id);
        tracing::info!(id, container, "component removed");
        Some(item)
    }

    /// Overwrite the fields named in `values`, leaving the others untouched.
    /// Names are matched against the type's schema ignoring case and stored
    /// under their lower-cased key.
    ///
    /// # Errors
    ///
    /// `UnknownContainer`, `NotFound` if `id` is not in `container`, or
    /// `UnknownField` if any name is outside the type's schema. Nothing is
    /// written unless every name resolves.
    pub fn set_fields<I, K, V>(&mut self, id: &str, container: &str, values: I) -> Result<(), BuilderError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let slot = self.slot(container)?;
        let pos = self.containers[slot]
            .position(id)
            .ok_or_else(|| BuilderError::NotFound(id.to_owned()))?;
        let descriptor = self.registry.describe_kind(self.containers[slot].items[pos].kind);

        let mut resolved = Vec::new();
        for (name, value) in values {
            let key = descriptor.resolve_key(name.as_ref())?;
            resolved.push((key, value.into()));
        }

        let fields = &mut self.containers[slot].items[pos].fields;
        let count = resolved.len();
        for (key, value) in resolved {
            fields.insert(key.to_owned(), value);
        }
        tracing::info!(id, container, count, "component fields updated");
        Ok(())
    }

    /// Drop every instance, keeping the containers.
    pub fn clear(&mut self) {
        for container in &mut self.containers {
            container.items.clear();
        }
        self.index.clear();
    }

    /// Append an already-built instance, as when rebuilding from a snapshot.
    /// Returns false, leaving the model unchanged, if the container is
    /// unknown or the id is already live.
    pub fn insert_restored(&mut self, container: &str, instance: ComponentInstance) -> bool {
        let Ok(slot) = self.slot(container) else {
            return false;
        };
        if self.index.contains_key(&instance.id) {
            return false;
        }
        if let Some((_, suffix)) = instance.id.rsplit_once('-')
            && let Ok(stamp) = suffix.parse::<i64>()
        {
            self.last_stamp = self.last_stamp.max(stamp);
        }
        self.index.insert(instance.id.clone(), slot);
        self.containers[slot].items.push(instance);
        true
    }

    // --- Queries ---

    /// Locate `id`, returning its container name and the instance.
    ///
    /// # Errors
    ///
    /// `NotFound` if no container holds `id`.
    pub fn find(&self, id: &str) -> Result<(&str, &ComponentInstance), BuilderError> {
        let slot = self.index.get(id).ok_or_else(|| BuilderError::NotFound(id.to_owned()))?;
        let container = &self.containers[*slot];
        container
            .items
            .iter()
            .find(|item| item.id == id)
            .map(|item| (container.name.as_str(), item))
            .ok_or_else(|| BuilderError::NotFound(id.to_owned()))
    }

    /// Look up an instance by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ComponentInstance> {
        let slot = *self.index.get(id)?;
        self.containers[slot].items.iter().find(|item| item.id == id)
    }

    /// Whether `id` is live in any container.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Whether `name` is one of the configured containers.
    #[must_use]
    pub fn has_container(&self, name: &str) -> bool {
        self.containers.iter().any(|c| c.name == name)
    }

    /// A container by name.
    #[must_use]
    pub fn container(&self, name: &str) -> Option<&Container> {
        self.containers.iter().find(|c| c.name == name)
    }

    /// All containers in configured order.
    pub fn containers(&self) -> impl Iterator<Item = &Container> {
        self.containers.iter()
    }

    /// Total number of live instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if no container holds any instance.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // --- Internals ---

    fn slot(&self, name: &str) -> Result<usize, BuilderError> {
        self.containers
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| BuilderError::UnknownContainer(name.to_owned()))
    }

    fn fresh_id(&mut self, kind: ComponentKind) -> InstanceId {
        let mut stamp = (self.clock)().max(self.last_stamp.saturating_add(1));
        loop {
            let id = format!("{}-{stamp}", kind.tag());
            if !self.index.contains_key(&id) {
                self.last_stamp = stamp;
                return id;
            }
            stamp += 1;
        }
    }
}

/// Two models are equal when their containers hold the same instances in
/// the same order. The clock is not compared.
impl PartialEq for ProjectModel {
    fn eq(&self, other: &Self) -> bool {
        self.containers == other.containers
    }
}

impl Eq for ProjectModel {}
