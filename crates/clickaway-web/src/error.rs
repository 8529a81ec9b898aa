//! Common error types for clickaway-web.

use clickaway_core::ConfigError;
use thiserror::Error;
use wasm_bindgen::JsValue;

/// DOM adapter errors.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("invalid options: {0}")]
    Config(#[from] ConfigError),
    #[error("JavaScript error: {0}")]
    Js(String),
}

/// Result type for DOM operations.
pub type WebResult<T> = Result<T, WebError>;

impl From<WebError> for JsValue {
    fn from(error: WebError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}

/// Render a thrown JS value for logs and errors.
pub(crate) fn describe_js(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}
