use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures reported by the photo store collaborators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("no browser window available")]
    NoWindow,
    #[error("network error: {0}")]
    Network(String),
    #[error("store responded with status {0}")]
    Status(u16),
    #[error("could not decode store response: {0}")]
    Decode(String),
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<JsValue> for StoreError {
    fn from(value: JsValue) -> Self {
        let msg = value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}"));
        StoreError::Network(msg)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}
