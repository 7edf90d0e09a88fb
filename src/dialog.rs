//! Configuration dialog: a form over one instance's fields.
//!
//! The form is built from the type descriptor, one input per field in
//! display order, pre-filled from the instance. Confirming writes every
//! input back (not only the edited ones), so clearing an input stores an
//! empty string rather than unsetting the field. Cancelling drops the form
//! without touching the model.

#[cfg(test)]
#[path = "dialog_test.rs"]
mod dialog_test;

use crate::error::BuilderError;
use crate::model::{InstanceId, ProjectModel};
use crate::registry::{ComponentTypeDescriptor, FieldDescriptor};
use crate::view::{Element, ViewNode};

/// One form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogInput {
    pub field: &'static FieldDescriptor,
    pub value: String,
}

/// An open configuration form for a single instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDialog {
    id: InstanceId,
    descriptor: &'static ComponentTypeDescriptor,
    inputs: Vec<DialogInput>,
}

impl ConfigDialog {
    /// Build the form for `id`, pre-filled with its stored values.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `id` is not in the model.
    pub fn open(model: &ProjectModel, id: &str) -> Result<Self, BuilderError> {
        let (_, instance) = model.find(id)?;
        let descriptor = model.registry().describe_kind(instance.kind);
        let inputs = descriptor
            .fields
            .iter()
            .map(|field| DialogInput { field, value: instance.field(field.key).unwrap_or_default().to_owned() })
            .collect();
        Ok(Self { id: id.to_owned(), descriptor, inputs })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn descriptor(&self) -> &'static ComponentTypeDescriptor {
        self.descriptor
    }

    #[must_use]
    pub fn inputs(&self) -> &[DialogInput] {
        &self.inputs
    }

    /// Heading shown above the form.
    #[must_use]
    pub fn title(&self) -> String {
        format!("Configure {}", self.descriptor.name)
    }

    /// Current text of the input for `name` (label or key, any case).
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.inputs
            .iter()
            .find(|input| input.field.matches(name))
            .map(|input| input.value.as_str())
    }

    /// Replace the text of the input for `name`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownField` if the form has no such input.
    pub fn set_input(&mut self, name: &str, value: impl Into<String>) -> Result<(), BuilderError> {
        let kind = self.descriptor.tag();
        let input = self
            .inputs
            .iter_mut()
            .find(|input| input.field.matches(name))
            .ok_or_else(|| BuilderError::UnknownField { kind: kind.to_owned(), field: name.to_owned() })?;
        input.value = value.into();
        Ok(())
    }

    /// Commit every input to the model. The instance is located afresh, so
    /// the commit lands even if it moved while the form was open.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the instance has been removed meanwhile.
    pub fn confirm(self, model: &mut ProjectModel) -> Result<InstanceId, BuilderError> {
        let container = model.find(&self.id)?.0.to_owned();
        model.set_fields(&self.id, &container, self.inputs.iter().map(|input| (input.field.key, input.value.as_str())))?;
        Ok(self.id)
    }

    /// Discard the form. The model is not touched.
    pub fn cancel(self) -> InstanceId {
        tracing::debug!(id = %self.id, "configuration cancelled");
        self.id
    }

    /// The modal's node tree.
    #[must_use]
    pub fn render(&self) -> ViewNode {
        let form = self.inputs.iter().fold(Element::new("form").attr("id", "config-form"), |form, input| {
            form.child(
                Element::new("div")
                    .class("form-group")
                    .child(Element::new("label").attr("for", input.field.key).text(format!("{}:", input.field.label)))
                    .child(
                        Element::new("input")
                            .attr("type", "text")
                            .attr("id", input.field.key)
                            .attr("name", input.field.key)
                            .attr("value", input.value.clone()),
                    ),
            )
        });
        let form = form.child(
            Element::new("div")
                .class("button-group")
                .child(Element::new("button").attr("type", "submit").text("Save"))
                .child(Element::new("button").class("cancel-btn").attr("type", "button").text("Cancel")),
        );

        Element::new("div")
            .class("config-modal")
            .child(Element::new("div").class("config-content").child(Element::new("h3").text(self.title())).child(form))
            .into()
    }
}
