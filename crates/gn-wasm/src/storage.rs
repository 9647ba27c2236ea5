//! `localStorage`-backed document store.

use gn_core::snapshot::{DocumentStore, Result, SnapshotError};
use wasm_bindgen::JsValue;
use web_sys::Storage;

pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// The window's `localStorage`, if the page has one and it is allowed.
    pub fn open() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| store_error("no window"))?;
        let storage = window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| store_error("localStorage unavailable"))?;
        Ok(Self { storage })
    }
}

impl DocumentStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(js_error)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(js_error)
    }
}

fn store_error(msg: &str) -> SnapshotError {
    SnapshotError::Store(msg.to_string())
}

fn js_error(err: JsValue) -> SnapshotError {
    SnapshotError::Store(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}
