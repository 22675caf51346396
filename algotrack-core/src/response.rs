//! Normalized result envelope for boundary layers
//!
//! Every call across a process or language boundary answers with the same
//! shape: `{"success": bool, "message": "...", "data": ...}`. Errors are
//! folded into a failed envelope instead of propagating; a failure raised by
//! the library also carries its [`ErrorKind`] as `"kind"`.

use crate::error::{Error, ErrorKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Response {
    /// Successful envelope carrying a payload.
    ///
    /// A payload that fails to serialize turns the envelope into a failure.
    pub fn ok<T: Serialize>(message: impl Into<String>, payload: &T) -> Self {
        match serde_json::to_value(payload) {
            Ok(data) => Self {
                success: true,
                message: message.into(),
                kind: None,
                data: Some(data),
            },
            Err(e) => Self::failure(&Error::from(e)),
        }
    }

    /// Successful envelope without a payload.
    pub fn ok_empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            kind: None,
            data: None,
        }
    }

    /// Failed envelope describing `err`, classified by [`Error::kind`].
    pub fn failure(err: &Error) -> Self {
        Self {
            kind: Some(err.kind()),
            ..Self::failure_message(err.to_string())
        }
    }

    /// Failed envelope for a problem found outside the library (bad input
    /// at the boundary); it has no `kind`.
    pub fn failure_message(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            kind: None,
            data: None,
        }
    }

    /// Fold a result into an envelope.
    pub fn from_result<T: Serialize>(
        result: crate::error::Result<T>,
        message: impl Into<String>,
    ) -> Self {
        match result {
            Ok(payload) => Self::ok(message, &payload),
            Err(e) => Self::failure(&e),
        }
    }

    /// Render as compact JSON.
    pub fn to_json(&self) -> String {
        // Serializing plain bools, strings, and Values cannot fail
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"success":false,"message":"failed to encode response"}"#.to_string()
        })
    }

    /// Render as indented JSON.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}
