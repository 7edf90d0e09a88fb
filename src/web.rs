//! Browser bindings: `localStorage` persistence and a JS-facing editor.
//!
//! Every handler returns the engine's actions as a JSON array string; the
//! page script applies them to the DOM.

use wasm_bindgen::prelude::*;

use crate::config::BuilderConfig;
use crate::engine::{Action, EditorCore};
use crate::error::BuilderError;
use crate::persist::BlobStore;

/// `window.localStorage` as a blob store.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Open the window's local storage.
    ///
    /// # Errors
    ///
    /// Returns `Storage` outside a browser window or when storage is disabled.
    pub fn open() -> Result<Self, BuilderError> {
        let window = web_sys::window().ok_or_else(|| BuilderError::Storage("no window".into()))?;
        match window.local_storage() {
            Ok(Some(storage)) => Ok(Self { storage }),
            Ok(None) => Err(BuilderError::Storage("localStorage unavailable".into())),
            Err(err) => Err(BuilderError::Storage(js_message(&err))),
        }
    }
}

impl BlobStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, BuilderError> {
        self.storage.get_item(key).map_err(|err| BuilderError::Storage(js_message(&err)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), BuilderError> {
        self.storage.set_item(key, value).map_err(|err| BuilderError::Storage(js_message(&err)))
    }
}

fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn to_js(actions: &[Action]) -> Result<String, JsValue> {
    serde_json::to_string(actions).map_err(|err| JsValue::from_str(&err.to_string()))
}

/// The editor as seen from page script.
#[wasm_bindgen]
pub struct WebEditor {
    core: EditorCore,
}

#[wasm_bindgen]
impl WebEditor {
    /// Build an editor from an optional JSON config, backed by `localStorage`.
    ///
    /// # Errors
    ///
    /// Rejects an invalid config or unavailable storage.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<WebEditor, JsValue> {
        if let Err(err) = crate::logging::init() {
            web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
        }
        let config = match config {
            Some(raw) => BuilderConfig::from_json(&raw),
            None => Ok(BuilderConfig::default()),
        }
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
        let store = LocalStorage::open().map_err(|err| JsValue::from_str(&err.to_string()))?;
        let core = EditorCore::new(config, Box::new(store)).map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(Self { core })
    }

    pub fn load(&mut self) -> Result<String, JsValue> {
        to_js(&self.core.load())
    }

    /// Palette entries as a JSON array of view nodes.
    pub fn palette(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.core.palette()).map_err(|err| JsValue::from_str(&err.to_string()))
    }

    #[wasm_bindgen(js_name = dragStartPalette)]
    pub fn drag_start_palette(&mut self, tag: &str) -> Result<String, JsValue> {
        to_js(&self.core.on_drag_start_palette(tag))
    }

    #[wasm_bindgen(js_name = dragStartInstance)]
    pub fn drag_start_instance(&mut self, id: &str) -> Result<String, JsValue> {
        to_js(&self.core.on_drag_start_instance(id))
    }

    #[wasm_bindgen(js_name = dragEnter)]
    pub fn drag_enter(&mut self, target: &str) -> Result<String, JsValue> {
        to_js(&self.core.on_drag_enter(target))
    }

    #[wasm_bindgen(js_name = dragLeave)]
    pub fn drag_leave(&mut self, target: &str) -> Result<String, JsValue> {
        to_js(&self.core.on_drag_leave(target))
    }

    #[wasm_bindgen(js_name = drop)]
    pub fn drop_on(&mut self, target: &str) -> Result<String, JsValue> {
        to_js(&self.core.on_drop(target))
    }

    #[wasm_bindgen(js_name = dragEnd)]
    pub fn drag_end(&mut self) -> Result<String, JsValue> {
        to_js(&self.core.on_drag_end())
    }

    pub fn configure(&mut self, id: &str) -> Result<String, JsValue> {
        to_js(&self.core.on_configure(id))
    }

    #[wasm_bindgen(js_name = deleteInstance)]
    pub fn delete_instance(&mut self, id: &str) -> Result<String, JsValue> {
        to_js(&self.core.on_delete(id))
    }

    #[wasm_bindgen(js_name = dialogInput)]
    pub fn dialog_input(&mut self, field: &str, value: &str) -> Result<String, JsValue> {
        to_js(&self.core.on_dialog_input(field, value))
    }

    #[wasm_bindgen(js_name = dialogConfirm)]
    pub fn dialog_confirm(&mut self) -> Result<String, JsValue> {
        to_js(&self.core.on_dialog_confirm())
    }

    #[wasm_bindgen(js_name = dialogCancel)]
    pub fn dialog_cancel(&mut self) -> Result<String, JsValue> {
        to_js(&self.core.on_dialog_cancel())
    }

    #[wasm_bindgen(js_name = toggleMode)]
    pub fn toggle_mode(&mut self) -> Result<String, JsValue> {
        to_js(&self.core.toggle_mode())
    }

    pub fn welcome(&mut self) -> Result<String, JsValue> {
        to_js(&self.core.welcome())
    }

    pub fn chat(&mut self, message: &str) -> Result<String, JsValue> {
        to_js(&self.core.on_chat(message))
    }
}
