use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{DownloadMetadata, PendingDownload, StorageBroker};
use crate::config::MODERN_STORAGE_MIN_SDK;

const PENDING_PREFIX: &str = ".pending-";

/// Storage broker backed by a plain directory.
///
/// Pending entries are hidden `.pending-<name>` files renamed into place on
/// publish, which gives the same visibility semantics as the platform broker.
pub struct FsStorageBroker {
    downloads_dir: PathBuf,
    sdk_int: u32,
}

impl FsStorageBroker {
    pub fn new(downloads_dir: impl Into<PathBuf>) -> Self {
        Self {
            downloads_dir: downloads_dir.into(),
            sdk_int: MODERN_STORAGE_MIN_SDK,
        }
    }

    pub fn with_sdk_int(mut self, sdk_int: u32) -> Self {
        self.sdk_int = sdk_int;
        self
    }

    fn pending_path(&self, entry: &PendingDownload) -> io::Result<PathBuf> {
        let name = entry_name(entry)?;
        Ok(self.downloads_dir.join(format!("{}{}", PENDING_PREFIX, name)))
    }
}

fn entry_name(entry: &PendingDownload) -> io::Result<&str> {
    let name = entry
        .uri
        .strip_prefix("file-broker:")
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "foreign entry uri"))?;
    validate_name(name)?;
    Ok(name)
}

fn validate_name(name: &str) -> io::Result<()> {
    let plain = Path::new(name).file_name().is_some_and(|f| f == name);
    if name.is_empty() || !plain {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid display name: {:?}", name),
        ));
    }
    Ok(())
}

impl StorageBroker for FsStorageBroker {
    fn sdk_int(&self) -> u32 {
        self.sdk_int
    }

    fn insert_pending(&self, meta: &DownloadMetadata) -> io::Result<Option<PendingDownload>> {
        validate_name(&meta.display_name)?;
        std::fs::create_dir_all(&self.downloads_dir)?;

        let entry = PendingDownload {
            uri: format!("file-broker:{}", meta.display_name),
        };
        File::create(self.pending_path(&entry)?)?;
        debug!(
            "Inserted pending {} ({}) under {:?}",
            meta.display_name, meta.mime_type, self.downloads_dir
        );
        Ok(Some(entry))
    }

    fn open_output(&self, entry: &PendingDownload) -> io::Result<Box<dyn Write + '_>> {
        let file = File::create(self.pending_path(entry)?)?;
        Ok(Box::new(file))
    }

    fn publish(&self, entry: &PendingDownload) -> io::Result<()> {
        let name = entry_name(entry)?;
        std::fs::rename(self.pending_path(entry)?, self.downloads_dir.join(name))
    }

    fn notify_media_changed(&self, entry: &PendingDownload) -> io::Result<()> {
        info!("Media changed: {}", entry.uri);
        Ok(())
    }

    fn public_downloads_dir(&self) -> io::Result<PathBuf> {
        Ok(self.downloads_dir.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(name: &str) -> DownloadMetadata {
        DownloadMetadata {
            display_name: name.to_string(),
            mime_type: "application/pdf".to_string(),
            relative_path: "Download".to_string(),
        }
    }

    #[test]
    fn test_pending_entry_is_hidden_until_published() {
        let dir = tempfile::tempdir().unwrap();
        let broker = FsStorageBroker::new(dir.path());

        let entry = broker.insert_pending(&meta("a.pdf")).unwrap().unwrap();
        broker.open_output(&entry).unwrap().write_all(b"data").unwrap();
        assert!(!dir.path().join("a.pdf").exists());
        assert!(dir.path().join(".pending-a.pdf").exists());

        broker.publish(&entry).unwrap();
        assert_eq!(std::fs::read(dir.path().join("a.pdf")).unwrap(), b"data");
        assert!(!dir.path().join(".pending-a.pdf").exists());
    }

    #[test]
    fn test_rejects_path_like_names() {
        let dir = tempfile::tempdir().unwrap();
        let broker = FsStorageBroker::new(dir.path());

        for name in ["", "../escape.pdf", "sub/dir.pdf"] {
            let err = broker.insert_pending(&meta(name)).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput, "name {:?}", name);
        }
    }

    #[test]
    fn test_insert_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let downloads = dir.path().join("Download");
        let broker = FsStorageBroker::new(&downloads);

        broker.insert_pending(&meta("b.pdf")).unwrap();
        assert!(downloads.join(".pending-b.pdf").exists());
    }
}
