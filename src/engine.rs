//! Editor engine: the top-level composition the host talks to.
//!
//! DESIGN
//! ======
//! `EditorCore` owns the registry, the project model, persistence, the
//! gesture state machine, the open dialog (at most one), the mode, and the
//! chat transcript. The host forwards DOM events to the `on_*` handlers and
//! applies the returned [`Action`]s to the page. Handlers never fail: a
//! rejected operation is reported as [`Action::Rejected`] after the model
//! has been left untouched.
//!
//! Every handler that mutates the model ends with a snapshot, taken after
//! the mutation completes.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::Serialize;

use crate::assistant::{self, ChatMessage};
use crate::config::{BuilderConfig, ConfigError};
use crate::dialog::ConfigDialog;
use crate::dragdrop::{DragDrop, DragPayload, DropOutcome, Mode};
use crate::error::{BuilderError, ErrorCode};
use crate::model::{InstanceId, ProjectModel};
use crate::persist::{BlobStore, Persistence};
use crate::registry::Registry;
use crate::view::{self, ViewNode};

/// Instructions returned from handlers for the host to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Replace a container's children with `node`'s children.
    ContainerRendered { container: String, node: ViewNode },
    /// Add or remove the "dragging" style on a palette entry or instance.
    SetDragging { key: String, on: bool },
    /// Add or remove the "drag-over" style on a drop target.
    SetHighlight { container: String, on: bool },
    /// Append `node` to the end of `container`.
    InstancePlaced { id: InstanceId, container: String, node: ViewNode },
    /// Move the instance's node to the end of `to`.
    InstanceMoved { id: InstanceId, to: String },
    /// Remove the instance's node.
    InstanceRemoved { id: InstanceId },
    /// Replace the instance's `.component-content` with `node`.
    ContentUpdated { id: InstanceId, node: ViewNode },
    /// Show the configuration modal.
    DialogOpened { id: InstanceId, node: ViewNode },
    /// Remove the configuration modal.
    DialogClosed,
    /// Mode switched; update the toggle label and instance draggability.
    ModeChanged { mode: Mode, label: &'static str, draggable: bool },
    /// Append a chat line after `delay_ms`.
    Chat { sender: &'static str, text: String, delay_ms: u64 },
    /// The project snapshot was written.
    Saved,
    /// The project snapshot could not be written.
    SaveFailed { message: String },
    /// An operation was refused and nothing changed.
    Rejected { code: &'static str, message: String },
}

impl Action {
    fn rejected(err: &BuilderError) -> Self {
        tracing::warn!(code = err.error_code(), error = %err, "operation rejected");
        Self::Rejected { code: err.error_code(), message: err.to_string() }
    }
}

/// Core editor state: everything that does not depend on the browser.
pub struct EditorCore {
    config: BuilderConfig,
    registry: Registry,
    model: ProjectModel,
    persistence: Persistence,
    drag: DragDrop,
    dialog: Option<ConfigDialog>,
    mode: Mode,
    transcript: Vec<ChatMessage>,
}

impl EditorCore {
    /// Build an editor over `store`. The model starts empty; call
    /// [`EditorCore::load`] to restore the saved project.
    ///
    /// # Errors
    ///
    /// Returns the config's first validation failure.
    pub fn new(config: BuilderConfig, store: Box<dyn BlobStore>) -> Result<Self, ConfigError> {
        config.validate()?;
        let registry = Registry::new();
        let model = ProjectModel::new(registry, &config.containers);
        let persistence = Persistence::new(store, config.storage_key.clone());
        Ok(Self {
            config,
            registry,
            model,
            persistence,
            drag: DragDrop::new(),
            dialog: None,
            mode: Mode::default(),
            transcript: Vec::new(),
        })
    }

    /// Replace the timestamp source used for new ids.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.model = self.model.with_clock(clock);
        self
    }

    // --- Startup ---

    /// Restore the saved project and render every container.
    pub fn load(&mut self) -> Vec<Action> {
        self.drag.abort();
        self.dialog = None;
        let report = self.persistence.load(&mut self.model);
        tracing::debug!(restored = report.restored, dropped = report.dropped, "editor state rebuilt");
        self.render_all()
            .into_iter()
            .map(|(container, node)| Action::ContainerRendered { container, node })
            .collect()
    }

    /// Palette entries for the toolbox.
    #[must_use]
    pub fn palette(&self) -> Vec<ViewNode> {
        view::render_palette(self.registry)
    }

    /// Every container's full subtree, in page order.
    #[must_use]
    pub fn render_all(&self) -> Vec<(String, ViewNode)> {
        let draggable = self.mode.allows_instance_drag();
        self.model
            .containers()
            .map(|container| (container.name.clone(), view::render_container(container, self.registry, draggable)))
            .collect()
    }

    // --- Drag and drop ---

    /// A palette entry started dragging.
    pub fn on_drag_start_palette(&mut self, tag: &str) -> Vec<Action> {
        if self.dialog.is_some() {
            return vec![Action::rejected(&BuilderError::DialogOpen)];
        }
        let superseded = self.end_gesture_styles();
        match self.drag.start_palette(self.registry, tag) {
            Ok(()) => Self::started(superseded, tag),
            Err(err) => vec![Action::rejected(&err)],
        }
    }

    /// A placed instance started dragging. Ignored in preview mode.
    pub fn on_drag_start_instance(&mut self, id: &str) -> Vec<Action> {
        if self.dialog.is_some() {
            return vec![Action::rejected(&BuilderError::DialogOpen)];
        }
        let superseded = self.end_gesture_styles();
        match self.drag.start_instance(&self.model, id, self.mode) {
            Ok(true) => Self::started(superseded, id),
            Ok(false) => Vec::new(),
            Err(err) => vec![Action::rejected(&err)],
        }
    }

    /// The pointer entered a drop target.
    pub fn on_drag_enter(&mut self, target: &str) -> Vec<Action> {
        let Some(change) = self.drag.enter(&self.model, target) else {
            return Vec::new();
        };
        let mut actions = Vec::with_capacity(2);
        if let Some(off) = change.off {
            actions.push(Action::SetHighlight { container: off, on: false });
        }
        actions.push(Action::SetHighlight { container: change.on, on: true });
        actions
    }

    /// The pointer left a drop target.
    pub fn on_drag_leave(&mut self, target: &str) -> Vec<Action> {
        if self.drag.leave(target) {
            vec![Action::SetHighlight { container: target.to_owned(), on: false }]
        } else {
            Vec::new()
        }
    }

    /// The dragged item was dropped on `target`.
    pub fn on_drop(&mut self, target: &str) -> Vec<Action> {
        let mut actions = self.end_gesture_styles();
        if self.dialog.is_some() {
            self.drag.abort();
            actions.push(Action::rejected(&BuilderError::DialogOpen));
            return actions;
        }
        match self.drag.drop_on(&mut self.model, target) {
            Ok(DropOutcome::Placed { id, container }) => {
                if let Some(node) = self.render_instance(&id) {
                    actions.push(Action::InstancePlaced { id: id.clone(), container, node });
                }
                actions.extend(self.open_dialog(&id));
                actions.push(self.persist());
            }
            Ok(DropOutcome::Moved { id, to, .. }) => {
                actions.push(Action::InstanceMoved { id, to });
                actions.push(self.persist());
            }
            Ok(DropOutcome::Aborted) => {}
            Err(err) => actions.push(Action::rejected(&err)),
        }
        actions
    }

    /// The gesture ended without a drop on a target.
    pub fn on_drag_end(&mut self) -> Vec<Action> {
        let actions = self.end_gesture_styles();
        self.drag.abort();
        actions
    }

    /// Styles for a gesture that began, after clearing the one it replaced.
    fn started(mut superseded: Vec<Action>, key: &str) -> Vec<Action> {
        superseded.push(Action::SetDragging { key: key.to_owned(), on: true });
        superseded
    }

    /// Cosmetic cleanup for the active gesture, if any.
    fn end_gesture_styles(&self) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(payload) = self.drag.payload() {
            actions.push(Action::SetDragging { key: payload.source_key().to_owned(), on: false });
        }
        if let Some(over) = self.drag.over() {
            actions.push(Action::SetHighlight { container: over.to_owned(), on: false });
        }
        actions
    }

    // --- Instance buttons ---

    /// The gear button of `id` was clicked. Refused mid-gesture, since the
    /// drop would need the dialog slot.
    pub fn on_configure(&mut self, id: &str) -> Vec<Action> {
        if self.drag.is_dragging() {
            return vec![Action::rejected(&BuilderError::Dragging)];
        }
        self.open_dialog(id)
    }

    /// The delete button of `id` was clicked. The owning container is read
    /// from the model; a stale id is a silent no-op.
    pub fn on_delete(&mut self, id: &str) -> Vec<Action> {
        let Ok((container, _)) = self.model.find(id) else {
            tracing::debug!(id, "delete of absent component ignored");
            return Vec::new();
        };
        let container = container.to_owned();
        if self.model.remove(id, &container).is_none() {
            return Vec::new();
        }
        if let Some(DragPayload::ExistingInstance { id: dragged, .. }) = self.drag.payload()
            && dragged == id
        {
            self.drag.abort();
        }
        vec![Action::InstanceRemoved { id: id.to_owned() }, self.persist()]
    }

    // --- Configuration dialog ---

    fn open_dialog(&mut self, id: &str) -> Vec<Action> {
        if self.dialog.is_some() {
            return vec![Action::rejected(&BuilderError::DialogOpen)];
        }
        match ConfigDialog::open(&self.model, id) {
            Ok(dialog) => {
                let node = dialog.render();
                self.dialog = Some(dialog);
                vec![Action::DialogOpened { id: id.to_owned(), node }]
            }
            Err(err) => vec![Action::rejected(&err)],
        }
    }

    /// An input of the open dialog changed.
    pub fn on_dialog_input(&mut self, field: &str, value: &str) -> Vec<Action> {
        let result = match self.dialog.as_mut() {
            Some(dialog) => dialog.set_input(field, value),
            None => Err(BuilderError::NoDialog),
        };
        match result {
            Ok(()) => Vec::new(),
            Err(err) => vec![Action::rejected(&err)],
        }
    }

    /// The dialog's Save button was pressed.
    pub fn on_dialog_confirm(&mut self) -> Vec<Action> {
        let Some(dialog) = self.dialog.take() else {
            return vec![Action::rejected(&BuilderError::NoDialog)];
        };
        match dialog.confirm(&mut self.model) {
            Ok(id) => {
                let mut actions = vec![Action::DialogClosed];
                if let Some(instance) = self.model.get(&id) {
                    let node = view::render_content(instance, self.registry.describe_kind(instance.kind));
                    actions.push(Action::ContentUpdated { id, node });
                }
                actions.push(self.persist());
                actions
            }
            Err(err) => vec![Action::DialogClosed, Action::rejected(&err)],
        }
    }

    /// The dialog's Cancel button was pressed. The model is not touched.
    pub fn on_dialog_cancel(&mut self) -> Vec<Action> {
        match self.dialog.take() {
            Some(dialog) => {
                dialog.cancel();
                vec![Action::DialogClosed]
            }
            None => Vec::new(),
        }
    }

    // --- Mode ---

    /// Flip between build and preview.
    pub fn toggle_mode(&mut self) -> Vec<Action> {
        self.mode = self.mode.toggled();
        tracing::info!(mode = ?self.mode, "mode changed");
        vec![Action::ModeChanged {
            mode: self.mode,
            label: self.mode.toggle_label(),
            draggable: self.mode.allows_instance_drag(),
        }]
    }

    // --- Chat ---

    /// The opening assistant line.
    pub fn welcome(&mut self) -> Vec<Action> {
        self.transcript.push(ChatMessage::assistant(assistant::WELCOME));
        vec![Action::Chat { sender: assistant::ASSISTANT, text: assistant::WELCOME.to_owned(), delay_ms: 0 }]
    }

    /// The user sent `message`. Blank input is ignored.
    pub fn on_chat(&mut self, message: &str) -> Vec<Action> {
        let message = message.trim();
        if message.is_empty() {
            return Vec::new();
        }
        let answer = assistant::reply(message);
        self.transcript.push(ChatMessage::user(message));
        self.transcript.push(ChatMessage::assistant(answer));
        vec![
            Action::Chat { sender: assistant::USER, text: message.to_owned(), delay_ms: 0 },
            Action::Chat { sender: assistant::ASSISTANT, text: answer.to_owned(), delay_ms: self.config.reply_delay_ms },
        ]
    }

    // --- Queries ---

    #[must_use]
    pub fn model(&self) -> &ProjectModel {
        &self.model
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn dialog(&self) -> Option<&ConfigDialog> {
        self.dialog.as_ref()
    }

    #[must_use]
    pub fn drag(&self) -> &DragDrop {
        &self.drag
    }

    #[must_use]
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    #[must_use]
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    // --- Internals ---

    fn render_instance(&self, id: &str) -> Option<ViewNode> {
        let instance = self.model.get(id)?;
        let descriptor = self.registry.describe_kind(instance.kind);
        Some(view::render_component(instance, descriptor, self.mode.allows_instance_drag()))
    }

    fn persist(&mut self) -> Action {
        match self.persistence.save(&self.model) {
            Ok(()) => Action::Saved,
            Err(err) => {
                tracing::warn!(error = %err, "project snapshot failed");
                Action::SaveFailed { message: err.to_string() }
            }
        }
    }
}
