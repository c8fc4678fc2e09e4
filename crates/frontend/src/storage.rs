//! Browser Web Storage backend for the persisted session

use gallery_core::{KeyValueStore, StorageError};
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// Which Web Storage area to use
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StorageArea {
    /// `localStorage`: survives reloads and browser restarts
    #[default]
    Local,
    /// `sessionStorage`: cleared when the tab closes
    Session,
}

/// [`KeyValueStore`] over `window.localStorage` or `window.sessionStorage`.
///
/// The storage object is looked up on every call, so constructing this never
/// touches the browser.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BrowserStorage {
    area: StorageArea,
}

impl BrowserStorage {
    pub const fn local() -> Self {
        Self {
            area: StorageArea::Local,
        }
    }

    pub const fn session() -> Self {
        Self {
            area: StorageArea::Session,
        }
    }

    pub const fn area(&self) -> StorageArea {
        self.area
    }

    fn backend(&self) -> Result<Storage, StorageError> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        let storage = match self.area {
            StorageArea::Local => window.local_storage(),
            StorageArea::Session => window.session_storage(),
        };
        storage
            .map_err(|e| StorageError::Unavailable(js_message(&e)))?
            .ok_or_else(|| StorageError::Unavailable(format!("{:?} storage disabled", self.area)))
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.backend()?
            .get_item(key)
            .map_err(|e| StorageError::Read {
                key: key.to_string(),
                message: js_message(&e),
            })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.backend()?
            .set_item(key, value)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                message: js_message(&e),
            })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.backend()?
            .remove_item(key)
            .map_err(|e| StorageError::Remove {
                key: key.to_string(),
                message: js_message(&e),
            })
    }
}

fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
