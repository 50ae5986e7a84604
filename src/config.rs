//! Host Page Configuration
//!
//! Reads the optional `window.HARNESS_CONFIG` object and resolves the API
//! origin against the page location.

use harness_client::{ClientConfig, ClientError, ClientResult};
use wasm_bindgen::JsValue;

const CONFIG_GLOBAL: &str = "HARNESS_CONFIG";

/// Config from the page, or defaults when absent or malformed
pub fn load() -> ClientConfig {
    match read_global() {
        Ok(Some(config)) => config,
        Ok(None) => ClientConfig::default(),
        Err(e) => {
            web_sys::console::warn_1(&format!("Ignoring {}: {}", CONFIG_GLOBAL, e).into());
            ClientConfig::default()
        }
    }
}

fn read_global() -> ClientResult<Option<ClientConfig>> {
    let Some(window) = web_sys::window() else {
        return Ok(None);
    };
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL))
        .map_err(|e| ClientError::validation(format!("{:?}", e)))?;
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    let raw: String = js_sys::JSON::stringify(&value)
        .map_err(|e| ClientError::validation(format!("{:?}", e)))?
        .into();
    ClientConfig::from_json(&raw).map(Some)
}

/// `scheme://host[:port]` of the current page
pub fn page_origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}
