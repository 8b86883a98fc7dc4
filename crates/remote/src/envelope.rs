//! The `{code, message, response}` response envelope.

use panel::{PanelError, PanelResult};
use serde::Deserialize;
use serde_json::Value;

/// Envelope `code` of a successful call.
pub const CODE_OK: &str = "ok";

/// Every response body has this shape.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub response: Value,
}

impl Envelope {
    /// Returns the `response` payload, or [`PanelError::Protocol`] when
    /// `code` is not `"ok"`.
    pub fn into_response(self, method: &str) -> PanelResult<Value> {
        if self.code == CODE_OK {
            return Ok(self.response);
        }
        Err(PanelError::Protocol {
            method: method.to_string(),
            code: self.code,
            message: self.message.unwrap_or_default(),
        })
    }
}
