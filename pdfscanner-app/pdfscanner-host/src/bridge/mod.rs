//! Method-name dispatch between the UI layer and the host.
//!
//! Two channels share one message model:
//! - the media-store channel (UI -> host commands)
//! - the intent channel (shared-PDF handoff, pull and push)

mod intents;
mod media_store;

pub use intents::{IntentChannel, PdfListener, GET_INITIAL_PDF_PATH, OPEN_PDF};
pub use media_store::{
    MediaStoreChannel, SaveToDownloadsArgs, ScanFileArgs, SAVE_TO_DOWNLOADS, SCAN_FILE,
};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const INVALID_ARGUMENTS: &str = "INVALID_ARGUMENTS";
pub const INVALID_PATH: &str = "INVALID_PATH";

/// A single UI -> host invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }

    /// Read a single named argument; absent or mistyped reads as `None`.
    pub fn argument<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.arguments
            .get(key)
            .filter(|v| !v.is_null())
            .and_then(|v| T::deserialize(v).ok())
    }
}

/// Outcome of a dispatched call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MethodResult {
    Success {
        value: Value,
    },
    Error {
        code: String,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<Value>,
    },
    NotImplemented,
}

impl MethodResult {
    pub fn success(value: impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => MethodResult::Success { value },
            Err(e) => MethodResult::error("SERIALIZATION_ERROR", e.to_string()),
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        MethodResult::Error {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MethodResult::Success { .. })
    }

    pub fn error_code(&self) -> Option<&str> {
        match self {
            MethodResult::Error { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// One side of a named channel, switching on `call.method`.
pub trait MethodCallHandler {
    fn on_method_call(&mut self, call: &MethodCall) -> MethodResult;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_argument_treats_null_and_wrong_type_as_missing() {
        let call = MethodCall::new("scanFile", json!({ "path": null, "count": "three" }));
        assert_eq!(call.argument::<String>("path"), None);
        assert_eq!(call.argument::<u32>("count"), None);
        assert_eq!(call.argument::<String>("absent"), None);
    }

    #[test]
    fn test_argument_reads_bytes_from_array() {
        let call = MethodCall::new("saveToDownloads", json!({ "bytes": [37, 80, 68, 70] }));
        assert_eq!(call.argument::<Vec<u8>>("bytes"), Some(b"%PDF".to_vec()));
    }

    #[test]
    fn test_result_serialization_is_tagged() {
        let ok = serde_json::to_value(MethodResult::success(true)).unwrap();
        assert_eq!(ok, json!({ "status": "success", "value": true }));

        let err = serde_json::to_value(MethodResult::error(INVALID_PATH, "File path is null"))
            .unwrap();
        assert_eq!(
            err,
            json!({ "status": "error", "code": "INVALID_PATH", "message": "File path is null" })
        );

        let missing = serde_json::to_value(MethodResult::NotImplemented).unwrap();
        assert_eq!(missing, json!({ "status": "notImplemented" }));
    }
}
