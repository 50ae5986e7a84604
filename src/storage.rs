//! Browser Storage
//!
//! `KeyValueStore` over `window.localStorage`.

use harness_client::{ClientError, ClientResult, KeyValueStore};
use wasm_bindgen::JsValue;

pub struct BrowserStorage {
    storage: web_sys::Storage,
}

fn storage_error(err: JsValue) -> ClientError {
    ClientError::Storage(format!("{:?}", err))
}

impl BrowserStorage {
    pub fn local() -> ClientResult<Self> {
        let window =
            web_sys::window().ok_or_else(|| ClientError::Storage("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(storage_error)?
            .ok_or_else(|| ClientError::Storage("localStorage unavailable".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        self.storage.get_item(key).map_err(storage_error)
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.storage.set_item(key, value).map_err(storage_error)
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.storage.remove_item(key).map_err(storage_error)
    }
}
