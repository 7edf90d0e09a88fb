//! Drag/drop gesture state machine.
//!
//! One gesture is tracked at a time, from drag start to drop or abort.
//! While dragging, entering and leaving drop targets only moves the
//! cosmetic drag-over highlight. A drop over a known container is turned
//! into a model operation: palette payloads are placed, existing instances
//! are moved. Every other way a gesture can end leaves the model untouched.

#[cfg(test)]
#[path = "dragdrop_test.rs"]
mod dragdrop_test;

use serde::Serialize;

use crate::error::BuilderError;
use crate::model::{InstanceId, ProjectModel};
use crate::registry::{ComponentKind, Registry};

/// Editor mode, toggled by a single external control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Components can be rearranged.
    #[default]
    Build,
    /// Placed components are locked in place.
    Preview,
}

impl Mode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Build => Self::Preview,
            Self::Preview => Self::Build,
        }
    }

    /// Label of the toggle control while in this mode.
    #[must_use]
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Build => "Switch to Preview Mode",
            Self::Preview => "Switch to Build Mode",
        }
    }

    /// Whether placed instances may start a drag. Palette entries are not
    /// gated by mode.
    #[must_use]
    pub fn allows_instance_drag(self) -> bool {
        matches!(self, Self::Build)
    }
}

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DragPayload {
    /// A new component dragged out of the palette.
    NewFromPalette {
        #[serde(rename = "type")]
        component: ComponentKind,
    },
    /// A placed instance dragged out of its container.
    ExistingInstance { id: InstanceId, source: String },
}

impl DragPayload {
    /// Key of the element showing the "dragging" style: the palette entry's
    /// type tag or the instance id.
    #[must_use]
    pub fn source_key(&self) -> &str {
        match self {
            Self::NewFromPalette { component } => component.tag(),
            Self::ExistingInstance { id, .. } => id,
        }
    }
}

/// Gesture state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GestureState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A drag is in progress.
    Dragging {
        payload: DragPayload,
        /// Drop target currently highlighted, if any.
        over: Option<String>,
    },
}

/// Result of ending a gesture with a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// A new instance was appended to `container`.
    Placed { id: InstanceId, container: String },
    /// An existing instance was moved to the end of `to`.
    Moved { id: InstanceId, from: String, to: String },
    /// Nothing was dragged, or the drop landed outside every container.
    Aborted,
}

/// A change of drag-over highlight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightMove {
    /// Target that gained the highlight.
    pub on: String,
    /// Target that lost it, if one was highlighted.
    pub off: Option<String>,
}

/// Tracks the active gesture and applies drops to the model.
#[derive(Debug, Default)]
pub struct DragDrop {
    state: GestureState,
}

impl DragDrop {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &GestureState {
        &self.state
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// The active payload, if dragging.
    #[must_use]
    pub fn payload(&self) -> Option<&DragPayload> {
        match &self.state {
            GestureState::Dragging { payload, .. } => Some(payload),
            GestureState::Idle => None,
        }
    }

    /// The highlighted drop target, if any.
    #[must_use]
    pub fn over(&self) -> Option<&str> {
        match &self.state {
            GestureState::Dragging { over, .. } => over.as_deref(),
            GestureState::Idle => None,
        }
    }

    /// Begin dragging a palette entry, replacing any active gesture.
    ///
    /// # Errors
    ///
    /// Returns `UnknownType` for a tag outside the catalog.
    pub fn start_palette(&mut self, registry: Registry, tag: &str) -> Result<(), BuilderError> {
        let component = registry.describe(tag)?.kind;
        self.begin(DragPayload::NewFromPalette { component });
        Ok(())
    }

    /// Begin dragging a placed instance from the container that holds it.
    /// Returns false, starting nothing, when `mode` forbids it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `id` is not in the model.
    pub fn start_instance(&mut self, model: &ProjectModel, id: &str, mode: Mode) -> Result<bool, BuilderError> {
        if !mode.allows_instance_drag() {
            tracing::debug!(id, "instance drag ignored in preview mode");
            return Ok(false);
        }
        let (source, _) = model.find(id)?;
        let payload = DragPayload::ExistingInstance { id: id.to_owned(), source: source.to_owned() };
        self.begin(payload);
        Ok(true)
    }

    fn begin(&mut self, payload: DragPayload) {
        tracing::debug!(source = payload.source_key(), "drag started");
        if let GestureState::Dragging { payload: previous, .. } =
            std::mem::replace(&mut self.state, GestureState::Dragging { payload, over: None })
        {
            tracing::debug!(source = previous.source_key(), "drag superseded");
        }
    }

    /// The pointer entered `target`. No-op when idle, when `target` is not
    /// a container, or when it is already highlighted.
    pub fn enter(&mut self, model: &ProjectModel, target: &str) -> Option<HighlightMove> {
        let GestureState::Dragging { over, .. } = &mut self.state else {
            return None;
        };
        if !model.has_container(target) || over.as_deref() == Some(target) {
            return None;
        }
        let off = over.replace(target.to_owned());
        Some(HighlightMove { on: target.to_owned(), off })
    }

    /// The pointer left `target`. Returns true if its highlight was cleared.
    pub fn leave(&mut self, target: &str) -> bool {
        let GestureState::Dragging { over, .. } = &mut self.state else {
            return false;
        };
        if over.as_deref() == Some(target) {
            *over = None;
            true
        } else {
            false
        }
    }

    /// Drop over `target`, ending the gesture.
    ///
    /// # Errors
    ///
    /// Propagates model failures. The gesture is over either way, and a
    /// failed drop leaves the model unchanged.
    pub fn drop_on(&mut self, model: &mut ProjectModel, target: &str) -> Result<DropOutcome, BuilderError> {
        let GestureState::Dragging { payload, .. } = std::mem::take(&mut self.state) else {
            return Ok(DropOutcome::Aborted);
        };
        if !model.has_container(target) {
            tracing::debug!(container = target, "drop outside any container");
            return Ok(DropOutcome::Aborted);
        }

        match payload {
            DragPayload::NewFromPalette { component } => {
                let id = model.place(component.tag(), target)?;
                Ok(DropOutcome::Placed { id, container: target.to_owned() })
            }
            DragPayload::ExistingInstance { id, source } => {
                model.move_to(&id, &source, target)?;
                Ok(DropOutcome::Moved { id, from: source, to: target.to_owned() })
            }
        }
    }

    /// Abandon the gesture. Returns its payload, if one was active.
    pub fn abort(&mut self) -> Option<DragPayload> {
        match std::mem::take(&mut self.state) {
            GestureState::Dragging { payload, .. } => {
                tracing::debug!(source = payload.source_key(), "drag aborted");
                Some(payload)
            }
            GestureState::Idle => None,
        }
    }
}
