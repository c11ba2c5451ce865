use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

use super::{LocatorKind, ResourceLocator};

/// Broker that can open indirect (`content:`) locators for reading.
pub trait ContentSource: Send + Sync {
    fn open(&self, locator: &ResourceLocator) -> io::Result<Box<dyn Read + '_>>;
}

/// Desktop stand-in for the content broker.
///
/// `content://<authority>/<path>` resolves to `<root>/<authority>/<path>`.
pub struct FsContentSource {
    root: PathBuf,
}

impl FsContentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ContentSource for FsContentSource {
    fn open(&self, locator: &ResourceLocator) -> io::Result<Box<dyn Read + '_>> {
        if locator.kind() != LocatorKind::Content {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a content locator: {}", locator),
            ));
        }
        let authority = locator.authority().unwrap_or_default();
        let path = locator.path().unwrap_or_default();

        let mut target = self.root.join(authority);
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if segment == ".." {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "path escapes the content root",
                ));
            }
            target.push(segment);
        }

        Ok(Box::new(File::open(target)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_under_authority() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("docs.provider/shared")).unwrap();
        std::fs::write(dir.path().join("docs.provider/shared/a.pdf"), b"%PDF-1.7").unwrap();

        let source = FsContentSource::new(dir.path());
        let mut out = Vec::new();
        source
            .open(&ResourceLocator::parse("content://docs.provider/shared/a.pdf"))
            .unwrap()
            .read_to_end(&mut out)
            .unwrap();
        assert_eq!(out, b"%PDF-1.7");
    }

    #[test]
    fn test_rejects_parent_segments() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsContentSource::new(dir.path());
        let err = source
            .open(&ResourceLocator::parse("content://a/../../etc/passwd"))
            .err()
            .unwrap();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_rejects_file_locators() {
        let source = FsContentSource::new("/");
        let err = source
            .open(&ResourceLocator::parse("file:///tmp/a.pdf"))
            .err()
            .unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
