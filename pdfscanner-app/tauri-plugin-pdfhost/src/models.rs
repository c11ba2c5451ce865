use serde::{Deserialize, Serialize};

/// Event the UI listens on for host-pushed PDFs.
pub const OPEN_PDF_EVENT: &str = "open-pdf";

/// Payload emitted with the "open-pdf" event.
///
/// Sent when a PDF is opened or shared into the app while the UI is listening.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPdfPayload {
    /// Local path, readable with plain file APIs
    pub path: String,
    /// When the path was handed over (milliseconds since epoch)
    pub timestamp: i64,
}

impl OpenPdfPayload {
    pub fn now(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}
