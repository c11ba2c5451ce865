use std::path::PathBuf;

use tracing::{debug, warn};

/// Completion hook for a scan. Implementations may never call it.
pub type ScanCallback = Box<dyn FnOnce(&str) + Send>;

/// Asks the platform media index to pick up a file.
///
/// Fire-and-forget: no result or error is observable by the caller.
pub trait MediaScanner: Send + Sync {
    fn scan_file(&self, path: &str, on_complete: Option<ScanCallback>);
}

/// Desktop scanner: checks the file on a detached thread and logs it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsMediaScanner;

impl MediaScanner for FsMediaScanner {
    fn scan_file(&self, path: &str, on_complete: Option<ScanCallback>) {
        let path = PathBuf::from(path);
        let spawned = std::thread::Builder::new()
            .name("media-scan".into())
            .spawn(move || {
                match std::fs::metadata(&path) {
                    Ok(meta) => debug!("Indexed {:?} ({} bytes)", path, meta.len()),
                    Err(e) => warn!("Scan of {:?} failed: {}", path, e),
                }
                if let Some(callback) = on_complete {
                    callback(&path.to_string_lossy());
                }
            });
        if let Err(e) = spawned {
            warn!("Could not start media scan: {}", e);
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopScanner;

impl MediaScanner for NoopScanner {
    fn scan_file(&self, path: &str, _on_complete: Option<ScanCallback>) {
        debug!("Media scan skipped for {}", path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_fs_scanner_runs_in_background() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("scan.pdf");
        std::fs::write(&file, b"%PDF").unwrap();

        let (tx, rx) = mpsc::channel();
        FsMediaScanner.scan_file(
            &file.to_string_lossy(),
            Some(Box::new(move |path| {
                let _ = tx.send(path.to_string());
            })),
        );

        let scanned = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(scanned, file.to_string_lossy());
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        FsMediaScanner.scan_file("/definitely/not/here.pdf", None);
        NoopScanner.scan_file("/definitely/not/here.pdf", None);
    }
}
