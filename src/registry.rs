//! Component registry: the fixed catalog of placeable component types.
//!
//! Each entry describes how a component type is presented in the palette
//! (`icon`, `name`) and which fields its configuration dialog exposes, in
//! display order, together with the default text the renderer shows while a
//! field is unset. The catalog is static and never mutated; a `Registry`
//! handle is a cheap `Copy` view of it that the model, dialog, and engine
//! receive explicitly.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use serde::{Deserialize, Serialize};

use crate::error::BuilderError;

/// The kind of a placed component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// Video lesson with a source URL and duration.
    Video,
    /// Quiz with a question summary and time limit.
    Quiz,
    /// Free-form text block.
    Text,
    /// Code playground with starter code and instructions.
    Code,
    /// Image-based diagram with hotspots.
    Diagram,
}

impl ComponentKind {
    /// Every kind, in palette order.
    pub const ALL: [Self; 5] = [Self::Video, Self::Quiz, Self::Text, Self::Code, Self::Diagram];

    /// The type tag used in ids, DOM attributes, and the persisted blob.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Quiz => "quiz",
            Self::Text => "text",
            Self::Code => "code",
            Self::Diagram => "diagram",
        }
    }

    /// Parse a type tag. Tags are matched exactly.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

/// One configurable field of a component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Label shown next to the dialog input, e.g. `"Time Limit"`.
    pub label: &'static str,
    /// Storage key: the label lower-cased, e.g. `"time limit"`.
    pub key: &'static str,
    /// Text the renderer shows while the field is unset or empty.
    pub default: &'static str,
}

impl FieldDescriptor {
    const fn new(label: &'static str, key: &'static str, default: &'static str) -> Self {
        Self { label, key, default }
    }

    /// Whether `name` refers to this field, by label or key, ignoring case.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case(self.label) || name.eq_ignore_ascii_case(self.key)
    }
}

/// Static display metadata and field schema for one component type.
#[derive(Debug, PartialEq, Eq)]
pub struct ComponentTypeDescriptor {
    pub kind: ComponentKind,
    pub icon: &'static str,
    pub name: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl ComponentTypeDescriptor {
    /// Shorthand for `self.kind.tag()`.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }

    /// Look up a field by label or key, ignoring case.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|field| field.matches(name))
    }

    /// Resolve `name` to its storage key, or fail with `UnknownField`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownField` when `name` is not part of this type's schema.
    pub fn resolve_key(&self, name: &str) -> Result<&'static str, BuilderError> {
        self.field(name)
            .map(|field| field.key)
            .ok_or_else(|| BuilderError::UnknownField { kind: self.tag().to_owned(), field: name.to_owned() })
    }
}

const VIDEO_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("Title", "title", "Untitled Video"),
    FieldDescriptor::new("URL", "url", "No URL provided"),
    FieldDescriptor::new("Duration", "duration", "Not specified"),
];

const QUIZ_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("Title", "title", "Untitled Quiz"),
    FieldDescriptor::new("Questions", "questions", "None added yet"),
    FieldDescriptor::new("Time Limit", "time limit", "No limit"),
];

const TEXT_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("Title", "title", "Untitled Text"),
    FieldDescriptor::new("Content", "content", "No content added yet"),
];

const CODE_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("Language", "language", "Code"),
    FieldDescriptor::new("Starting Code", "starting code", "// Add code here"),
    FieldDescriptor::new("Instructions", "instructions", "No instructions provided"),
];

const DIAGRAM_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("Title", "title", "Untitled Diagram"),
    FieldDescriptor::new("Image URL", "image url", "No image provided"),
    FieldDescriptor::new("Hotspots", "hotspots", "None added"),
];

static CATALOG: [ComponentTypeDescriptor; 5] = [
    ComponentTypeDescriptor { kind: ComponentKind::Video, icon: "🎥", name: "Video Lesson", fields: VIDEO_FIELDS },
    ComponentTypeDescriptor { kind: ComponentKind::Quiz, icon: "❓", name: "Quiz", fields: QUIZ_FIELDS },
    ComponentTypeDescriptor { kind: ComponentKind::Text, icon: "📝", name: "Text Content", fields: TEXT_FIELDS },
    ComponentTypeDescriptor { kind: ComponentKind::Code, icon: "💻", name: "Code Playground", fields: CODE_FIELDS },
    ComponentTypeDescriptor {
        kind: ComponentKind::Diagram,
        icon: "📊",
        name: "Interactive Diagram",
        fields: DIAGRAM_FIELDS,
    },
];

/// Read-only handle to the component catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct Registry;

impl Registry {
    /// Handle to the built-in catalog.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Describe the component type named by `tag`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownType` when `tag` is not one of the catalog's tags.
    pub fn describe(&self, tag: &str) -> Result<&'static ComponentTypeDescriptor, BuilderError> {
        ComponentKind::from_tag(tag)
            .map(|kind| self.describe_kind(kind))
            .ok_or_else(|| BuilderError::UnknownType(tag.to_owned()))
    }

    /// Describe an already-validated kind.
    #[must_use]
    pub fn describe_kind(&self, kind: ComponentKind) -> &'static ComponentTypeDescriptor {
        // CATALOG is laid out in `ComponentKind` declaration order.
        &CATALOG[kind as usize]
    }

    /// All entries in palette order.
    #[must_use]
    pub fn entries(&self) -> &'static [ComponentTypeDescriptor] {
        &CATALOG
    }
}
