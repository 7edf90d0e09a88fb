//! Drag-and-drop editor core for assembling learning modules.
//!
//! An author drags component types (video, quiz, text, code, diagram) from a
//! palette into named containers, fills in each component's fields through a
//! modal form, rearranges components between containers, and has the whole
//! project saved to a string-keyed blob store after every change. The host
//! page is responsible only for wiring DOM events to the engine and applying
//! the resulting [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level [`engine::EditorCore`] and the actions it emits |
//! | [`registry`] | Static catalog of component types and their fields |
//! | [`model`] | Containers, placed instances, and the id index |
//! | [`persist`] | Snapshot/restore through a [`persist::BlobStore`] |
//! | [`dragdrop`] | Mode and the drag gesture state machine |
//! | [`dialog`] | Per-instance configuration form |
//! | [`view`] | Node trees for palette, containers, and components |
//! | [`assistant`] | Keyword-matched chat replies |
//! | [`config`] | Editor configuration and validation |
//! | [`error`] | Error type and stable error codes |
//! | [`logging`] | Tracing subscriber setup |
//! | `web` | `localStorage` store and the wasm-bindgen facade (`browser` feature) |

pub mod assistant;
pub mod clock;
pub mod config;
pub mod dialog;
pub mod dragdrop;
pub mod engine;
pub mod error;
pub mod logging;
pub mod model;
pub mod persist;
pub mod registry;
pub mod view;

#[cfg(feature = "browser")]
pub mod web;

pub use config::BuilderConfig;
pub use engine::{Action, EditorCore};
pub use error::{BuilderError, ErrorCode};
pub use model::{ComponentInstance, InstanceId, ProjectModel};
pub use persist::{BlobStore, MemoryStore};
pub use registry::{ComponentKind, Registry};
