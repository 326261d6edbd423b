//! Structured JSON error payloads returned in response `error` fields.

use std::fmt::Display;

use serde::Serialize;

use crate::logging::get_log_file_path;
use crate::server::error_mapping::ToStructuredError;

#[derive(Serialize)]
pub struct ErrorMessage {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
    pub code: String,
}

#[derive(Serialize)]
pub struct StructuredError {
    pub logs: String,
    pub messages: Vec<ErrorMessage>,
}

impl StructuredError {
    pub fn new(code: &str, message: String) -> Self {
        Self {
            logs: get_log_file_path(),
            messages: vec![ErrorMessage {
                message,
                tip: None,
                code: code.to_string(),
            }],
        }
    }

    #[must_use]
    pub fn with_tip(mut self, tip: &str) -> Self {
        if let Some(msg) = self.messages.first_mut() {
            msg.tip = Some(tip.to_string());
        }
        self
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            // Fallback: minimal valid JSON assembled by hand.
            r#"{"logs":"","messages":[{"message":"serialization error","code":"INTERNAL_ERROR"}]}"#
                .to_string()
        })
    }
}

/// Convert a domain error into a structured JSON error string.
pub fn to_error_json<E: ToStructuredError + Display>(err: &E) -> String {
    let (code, tip) = err.error_code_and_tip();
    let mut se = StructuredError::new(code, err.to_string());
    if let Some(tip) = tip {
        se = se.with_tip(tip);
    }
    se.to_json()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replicate::ReplicateError;

    #[test]
    fn test_error_json_carries_code_and_message() {
        let json = to_error_json(&ReplicateError::DestinationNotWritable);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let message = &parsed["messages"][0];
        assert_eq!(message["code"], "DESTINATION_NOT_WRITABLE");
        assert!(message["message"]
            .as_str()
            .unwrap()
            .contains("edit permission"));
        assert!(message["tip"].is_string());
    }

    #[test]
    fn test_tip_is_omitted_when_absent() {
        let json = to_error_json(&ReplicateError::InvalidQuantity(0));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["messages"][0].get("tip").is_none());
    }
}
