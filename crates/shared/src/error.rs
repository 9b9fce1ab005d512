use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Body the staging endpoint returns alongside a non-success status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageErrorBody {
    #[serde(default)]
    pub error: Option<Value>,
}

impl StageErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: Some(Value::String(message.into())),
        }
    }

    /// Reads an arbitrary JSON error body; anything other than an object
    /// yields an empty body.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Human-readable detail, or `None` when the field is absent or falsy
    /// (`null`, `false`, `0`, `""`).
    pub fn detail(&self) -> Option<String> {
        match self.error.as_ref()? {
            Value::Null | Value::Bool(false) => None,
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(text.clone()),
            Value::Number(number) if number.as_f64() == Some(0.0) => None,
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("unsupported image type '{0}'; use PNG, JPEG or WebP")]
    UnsupportedMimeType(String),
}
