//! Error taxonomy for model, dialog, and storage operations.
//!
//! DESIGN
//! ======
//! Model operations (`place`, `move_to`, `set_fields`) surface these as hard
//! failures to the caller, which aborts the in-flight gesture. Every check
//! runs before the first mutation, so an `Err` always means "nothing
//! changed". `remove` is tolerant and never produces one.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Stable machine-readable code for an error, for display by the host.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuilderError {
    #[error("unknown component type: {0}")]
    UnknownType(String),
    #[error("unknown container: {0}")]
    UnknownContainer(String),
    #[error("component not found: {0}")]
    NotFound(String),
    #[error("unknown field {field:?} for component type {kind}")]
    UnknownField { kind: String, field: String },
    #[error("a configuration dialog is already open")]
    DialogOpen,
    #[error("no configuration dialog is open")]
    NoDialog,
    #[error("a drag gesture is in progress")]
    Dragging,
    #[error("storage error: {0}")]
    Storage(String),
}

impl ErrorCode for BuilderError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownType(_) => "E_UNKNOWN_TYPE",
            Self::UnknownContainer(_) => "E_UNKNOWN_CONTAINER",
            Self::NotFound(_) => "E_NOT_FOUND",
            Self::UnknownField { .. } => "E_UNKNOWN_FIELD",
            Self::DialogOpen => "E_DIALOG_OPEN",
            Self::NoDialog => "E_NO_DIALOG",
            Self::Dragging => "E_DRAGGING",
            Self::Storage(_) => "E_STORAGE",
        }
    }
}
