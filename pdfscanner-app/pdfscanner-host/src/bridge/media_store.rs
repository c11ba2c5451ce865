use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{MethodCall, MethodCallHandler, MethodResult, INVALID_ARGUMENTS, INVALID_PATH};
use crate::downloads::{DownloadsWriter, WriteRequest};

pub const SAVE_TO_DOWNLOADS: &str = "saveToDownloads";
pub const SCAN_FILE: &str = "scanFile";

/// Arguments of `saveToDownloads`, each possibly absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveToDownloadsArgs {
    pub file_name: Option<String>,
    pub bytes: Option<Vec<u8>>,
    pub mime_type: Option<String>,
}

impl SaveToDownloadsArgs {
    fn from_call(call: &MethodCall) -> Self {
        Self {
            file_name: call.argument("fileName"),
            bytes: call.argument("bytes"),
            mime_type: call.argument("mimeType"),
        }
    }

    pub fn into_request(self) -> Option<WriteRequest> {
        Some(WriteRequest {
            file_name: self.file_name?,
            bytes: self.bytes?,
            mime_type: self.mime_type?,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanFileArgs {
    pub path: Option<String>,
}

/// Host side of the media-store channel.
pub struct MediaStoreChannel {
    writer: DownloadsWriter,
}

impl MediaStoreChannel {
    pub fn new(writer: DownloadsWriter) -> Self {
        Self { writer }
    }

    pub fn writer(&self) -> &DownloadsWriter {
        &self.writer
    }

    pub fn save_to_downloads(&self, args: SaveToDownloadsArgs) -> MethodResult {
        match args.into_request() {
            Some(request) => MethodResult::success(self.writer.save(&request)),
            None => MethodResult::error(INVALID_ARGUMENTS, "Missing required arguments"),
        }
    }

    pub fn scan_file(&self, args: ScanFileArgs) -> MethodResult {
        match args.path {
            Some(path) => {
                debug!("Scan requested for {}", path);
                self.writer.scanner().scan_file(&path, None);
                MethodResult::success(true)
            }
            None => MethodResult::error(INVALID_PATH, "File path is null"),
        }
    }
}

impl MethodCallHandler for MediaStoreChannel {
    fn on_method_call(&mut self, call: &MethodCall) -> MethodResult {
        match call.method.as_str() {
            SAVE_TO_DOWNLOADS => self.save_to_downloads(SaveToDownloadsArgs::from_call(call)),
            SCAN_FILE => self.scan_file(ScanFileArgs {
                path: call.argument("path"),
            }),
            _ => MethodResult::NotImplemented,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloads::FsStorageBroker;
    use crate::media_scan::{MediaScanner, ScanCallback};
    use serde_json::json;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingScanner {
        scanned: Mutex<Vec<String>>,
    }

    impl MediaScanner for RecordingScanner {
        fn scan_file(&self, path: &str, _on_complete: Option<ScanCallback>) {
            self.scanned.lock().unwrap().push(path.to_string());
        }
    }

    fn channel(dir: &Path, sdk_int: u32) -> (MediaStoreChannel, Arc<RecordingScanner>) {
        let scanner = Arc::new(RecordingScanner::default());
        let broker = Arc::new(FsStorageBroker::new(dir).with_sdk_int(sdk_int));
        let writer = DownloadsWriter::new(broker, scanner.clone());
        (MediaStoreChannel::new(writer), scanner)
    }

    #[test]
    fn test_save_to_downloads_success() {
        let dir = tempfile::tempdir().unwrap();
        let (mut channel, _) = channel(dir.path(), 33);

        let call = MethodCall::new(
            SAVE_TO_DOWNLOADS,
            json!({ "fileName": "scan.pdf", "bytes": [1, 2, 3], "mimeType": "application/pdf" }),
        );
        assert_eq!(channel.on_method_call(&call), MethodResult::success(true));
        assert_eq!(std::fs::read(dir.path().join("scan.pdf")).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_missing_bytes_is_invalid_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let (mut channel, _) = channel(dir.path(), 33);

        let call = MethodCall::new(
            SAVE_TO_DOWNLOADS,
            json!({ "fileName": "scan.pdf", "mimeType": "application/pdf" }),
        );
        let result = channel.on_method_call(&call);
        assert_eq!(result.error_code(), Some(INVALID_ARGUMENTS));
        assert!(!dir.path().join("scan.pdf").exists());
    }

    #[test]
    fn test_each_missing_field_is_invalid_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let (channel, _) = channel(dir.path(), 33);

        let partials = [
            SaveToDownloadsArgs {
                file_name: None,
                bytes: Some(vec![1]),
                mime_type: Some("application/pdf".into()),
            },
            SaveToDownloadsArgs {
                file_name: Some("a.pdf".into()),
                bytes: Some(vec![1]),
                mime_type: None,
            },
            SaveToDownloadsArgs::default(),
        ];
        for args in partials {
            let result = channel.save_to_downloads(args);
            assert_eq!(result.error_code(), Some(INVALID_ARGUMENTS));
        }
    }

    #[test]
    fn test_failed_write_is_false_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let (channel, _) = channel(&dir.path().join("absent"), 21);

        let result = channel.save_to_downloads(SaveToDownloadsArgs {
            file_name: Some("a.pdf".into()),
            bytes: Some(vec![0]),
            mime_type: Some("application/pdf".into()),
        });
        assert_eq!(result, MethodResult::success(false));
    }

    #[test]
    fn test_scan_file_returns_true_and_scans() {
        let dir = tempfile::tempdir().unwrap();
        let (mut channel, scanner) = channel(dir.path(), 33);

        let call = MethodCall::new(SCAN_FILE, json!({ "path": "/sdcard/Download/a.pdf" }));
        assert_eq!(channel.on_method_call(&call), MethodResult::success(true));
        assert_eq!(*scanner.scanned.lock().unwrap(), vec!["/sdcard/Download/a.pdf"]);
    }

    #[test]
    fn test_scan_file_without_path_is_invalid_path() {
        let dir = tempfile::tempdir().unwrap();
        let (mut channel, scanner) = channel(dir.path(), 33);

        let result = channel.on_method_call(&MethodCall::new(SCAN_FILE, json!({})));
        assert_eq!(result.error_code(), Some(INVALID_PATH));
        assert!(scanner.scanned.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_method_not_implemented() {
        let dir = tempfile::tempdir().unwrap();
        let (mut channel, _) = channel(dir.path(), 33);

        let result = channel.on_method_call(&MethodCall::new("deleteFile", json!({})));
        assert_eq!(result, MethodResult::NotImplemented);
    }
}
