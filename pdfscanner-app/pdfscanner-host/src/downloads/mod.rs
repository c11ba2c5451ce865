mod fs;

pub use fs::FsStorageBroker;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::MODERN_STORAGE_MIN_SDK;
use crate::media_scan::MediaScanner;

/// Bytes the UI wants persisted to the public Downloads collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteRequest {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Row a storage broker registers before any bytes land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadMetadata {
    pub display_name: String,
    pub mime_type: String,
    /// Collection-relative directory, `Download` on Android.
    pub relative_path: String,
}

/// Handle to an entry registered in the pending (hidden) state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDownload {
    pub uri: String,
}

/// OS-mediated shared storage.
pub trait StorageBroker: Send + Sync {
    /// Platform API level the policy is chosen from.
    fn sdk_int(&self) -> u32;

    /// Register an entry invisible to other apps. `None` when the broker refused it.
    fn insert_pending(&self, meta: &DownloadMetadata) -> io::Result<Option<PendingDownload>>;

    fn open_output(&self, entry: &PendingDownload) -> io::Result<Box<dyn Write + '_>>;

    /// Clear the pending flag so the entry becomes visible.
    fn publish(&self, entry: &PendingDownload) -> io::Result<()>;

    /// Tell other apps' indexes that the entry changed.
    fn notify_media_changed(&self, entry: &PendingDownload) -> io::Result<()>;

    /// Public Downloads directory for direct filesystem writes.
    fn public_downloads_dir(&self) -> io::Result<PathBuf>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoragePolicy {
    /// Broker-managed insert with a pending flag.
    Modern,
    /// Direct write into the public directory, then a media scan.
    Legacy,
}

impl StoragePolicy {
    pub fn for_sdk(sdk_int: u32, modern_min_sdk: u32) -> Self {
        if sdk_int >= modern_min_sdk {
            StoragePolicy::Modern
        } else {
            StoragePolicy::Legacy
        }
    }
}

pub const DOWNLOADS_RELATIVE_PATH: &str = "Download";

/// Persists UI-supplied bytes into the public Downloads area.
pub struct DownloadsWriter {
    broker: Arc<dyn StorageBroker>,
    scanner: Arc<dyn MediaScanner>,
    modern_min_sdk: u32,
}

impl DownloadsWriter {
    pub fn new(broker: Arc<dyn StorageBroker>, scanner: Arc<dyn MediaScanner>) -> Self {
        Self {
            broker,
            scanner,
            modern_min_sdk: MODERN_STORAGE_MIN_SDK,
        }
    }

    pub fn with_modern_min_sdk(mut self, sdk: u32) -> Self {
        self.modern_min_sdk = sdk;
        self
    }

    pub fn scanner(&self) -> &Arc<dyn MediaScanner> {
        &self.scanner
    }

    /// Policy in effect right now; re-evaluated on every call.
    pub fn policy(&self) -> StoragePolicy {
        StoragePolicy::for_sdk(self.broker.sdk_int(), self.modern_min_sdk)
    }

    /// Write the request, reporting only success or failure.
    ///
    /// No cleanup happens on failure: a legacy write can leave a partial file,
    /// which the next save under the same name overwrites.
    pub fn save(&self, request: &WriteRequest) -> bool {
        let policy = self.policy();
        let outcome = match policy {
            StoragePolicy::Modern => self.save_modern(request),
            StoragePolicy::Legacy => self.save_legacy(request),
        };

        match outcome {
            Ok(true) => {
                info!(
                    "Saved {} ({} bytes) to Downloads via {:?} policy",
                    request.file_name,
                    request.bytes.len(),
                    policy
                );
                true
            }
            Ok(false) => {
                error!("Storage broker refused {}", request.file_name);
                false
            }
            Err(e) => {
                error!("Failed to save {} to Downloads: {}", request.file_name, e);
                false
            }
        }
    }

    fn save_modern(&self, request: &WriteRequest) -> io::Result<bool> {
        let meta = DownloadMetadata {
            display_name: request.file_name.clone(),
            mime_type: request.mime_type.clone(),
            relative_path: DOWNLOADS_RELATIVE_PATH.to_string(),
        };

        let Some(entry) = self.broker.insert_pending(&meta)? else {
            return Ok(false);
        };
        debug!("Registered pending download {}", entry.uri);

        {
            let mut output = self.broker.open_output(&entry)?;
            output.write_all(&request.bytes)?;
            output.flush()?;
        }

        self.broker.publish(&entry)?;
        self.broker.notify_media_changed(&entry)?;
        Ok(true)
    }

    fn save_legacy(&self, request: &WriteRequest) -> io::Result<bool> {
        let dir = self.broker.public_downloads_dir()?;
        let path = dir.join(&request.file_name);
        std::fs::write(&path, &request.bytes)?;

        self.scanner.scan_file(&path.to_string_lossy(), None);
        Ok(true)
    }
}
