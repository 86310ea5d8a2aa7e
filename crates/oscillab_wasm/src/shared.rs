//! Conversions shared by the exported functions.

use oscillab_core::{SimError, SweepSettings};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;

/// `"<code>: <message>"`, so hosts can branch on the code prefix.
pub(crate) fn error_message(err: &SimError) -> String {
    format!("{}: {}", err.code(), err)
}

pub(crate) fn to_js_error(err: SimError) -> JsValue {
    JsValue::from_str(&error_message(&err))
}

pub(crate) fn decode<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    from_value(value).map_err(|e| JsValue::from_str(&format!("Invalid {}: {}", what, e)))
}

/// Plain objects rather than `Map`s, so results can go straight to `JSON.stringify`.
pub(crate) fn encode<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Settings from an optional JS object. Threads are not available in a plain
/// wasm32 build, so frames default to sequential there.
pub(crate) fn sweep_settings(value: JsValue) -> Result<SweepSettings, JsValue> {
    let mut settings = default_settings();
    if !(value.is_undefined() || value.is_null()) {
        settings = decode(value, "sweep settings")?;
    }
    Ok(settings)
}

pub(crate) fn default_settings() -> SweepSettings {
    SweepSettings {
        parallel: !cfg!(target_arch = "wasm32"),
        ..SweepSettings::default()
    }
}
