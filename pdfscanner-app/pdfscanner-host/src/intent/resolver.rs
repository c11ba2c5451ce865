use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use super::{ActivationEvent, ContentSource, IntentAction, LocatorKind, ResourceLocator};
use crate::config::HostConfig;

/// Turns activation events into local file paths.
///
/// Failures never escape: callers only see whether a path came out.
pub struct IntentResolver {
    content: Arc<dyn ContentSource>,
    cache_dir: PathBuf,
    prefix: String,
    suffix: String,
}

impl IntentResolver {
    pub fn new(content: Arc<dyn ContentSource>, cache_dir: impl Into<PathBuf>) -> Self {
        let defaults = HostConfig::default();
        Self {
            content,
            cache_dir: cache_dir.into(),
            prefix: defaults.cache_file_prefix,
            suffix: defaults.cache_file_suffix,
        }
    }

    pub fn with_config(
        content: Arc<dyn ContentSource>,
        cache_dir: impl Into<PathBuf>,
        config: &HostConfig,
    ) -> Self {
        Self {
            content,
            cache_dir: cache_dir.into(),
            prefix: config.cache_file_prefix.clone(),
            suffix: config.cache_file_suffix.clone(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn resolve(&self, event: &ActivationEvent) -> Option<String> {
        match &event.action {
            IntentAction::View => {
                let locator = event.data.as_ref()?;
                self.resolve_single(event, locator)
            }
            IntentAction::Send => {
                let locator = event.streams.first()?;
                self.resolve_single(event, locator)
            }
            IntentAction::SendMultiple => {
                // Only the first shared stream is opened; the rest are dropped.
                let first = event.streams.first()?;
                if event.streams.len() > 1 {
                    debug!(
                        "Ignoring {} additional shared streams",
                        event.streams.len() - 1
                    );
                }
                self.resolve_locator(first)
            }
            IntentAction::Other(action) => {
                debug!("Ignoring activation with action {}", action);
                None
            }
        }
    }

    fn resolve_single(&self, event: &ActivationEvent, locator: &ResourceLocator) -> Option<String> {
        if !event.looks_like_pdf(locator) {
            debug!(
                "Ignoring non-PDF activation: {} ({:?})",
                locator, event.mime_type
            );
            return None;
        }
        self.resolve_locator(locator)
    }

    fn resolve_locator(&self, locator: &ResourceLocator) -> Option<String> {
        match locator.kind() {
            LocatorKind::File => locator.path(),
            LocatorKind::Content => self.copy_to_cache(locator),
            LocatorKind::Unsupported => {
                debug!("Unsupported locator: {}", locator);
                None
            }
        }
    }

    fn copy_to_cache(&self, locator: &ResourceLocator) -> Option<String> {
        let mut input = match self.content.open(locator) {
            Ok(input) => input,
            Err(e) => {
                warn!("Failed to open {}: {}", locator, e);
                return None;
            }
        };

        let (cache_path, mut output) = match self.create_cache_file() {
            Ok(created) => created,
            Err(e) => {
                warn!("Failed to create cache file in {:?}: {}", self.cache_dir, e);
                return None;
            }
        };

        match io::copy(&mut input, &mut output).and_then(|_| output.sync_all()) {
            Ok(()) => {
                debug!("Copied {} to {:?}", locator, cache_path);
                Some(cache_path.to_string_lossy().into_owned())
            }
            Err(e) => {
                warn!("Failed to copy {} into cache: {}", locator, e);
                drop(output);
                let _ = std::fs::remove_file(&cache_path);
                None
            }
        }
    }

    fn create_cache_file(&self) -> io::Result<(PathBuf, File)> {
        std::fs::create_dir_all(&self.cache_dir)?;
        let name = format!(
            "{}{}{}",
            self.prefix,
            uuid::Uuid::new_v4().simple(),
            self.suffix
        );
        let path = self.cache_dir.join(name);
        let file = OpenOptions::new().write(true).create_new(true).open(&path)?;
        Ok((path, file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Read;

    /// In-memory content broker; `None` payloads fail mid-read.
    struct MemoryContent {
        entries: HashMap<String, Option<Vec<u8>>>,
    }

    impl MemoryContent {
        fn new(entries: &[(&str, Option<&str>)]) -> Arc<Self> {
            Arc::new(Self {
                entries: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.map(|s| s.as_bytes().to_vec())))
                    .collect(),
            })
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "provider died"))
        }
    }

    impl ContentSource for MemoryContent {
        fn open(&self, locator: &ResourceLocator) -> io::Result<Box<dyn Read + '_>> {
            match self.entries.get(locator.as_str()) {
                Some(Some(bytes)) => Ok(Box::new(io::Cursor::new(bytes.clone()))),
                Some(None) => Ok(Box::new(FailingReader)),
                None => Err(io::Error::new(io::ErrorKind::NotFound, "no such content")),
            }
        }
    }

    fn resolver(content: Arc<MemoryContent>, dir: &Path) -> IntentResolver {
        IntentResolver::new(content, dir.join("cache"))
    }

    fn cache_entries(dir: &Path) -> Vec<PathBuf> {
        match std::fs::read_dir(dir.join("cache")) {
            Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }

    #[test]
    fn test_view_file_locator_returns_path_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver(MemoryContent::new(&[]), dir.path());

        let event = ActivationEvent::view("file:///sdcard/doc.pdf", None);
        assert_eq!(resolver.resolve(&event).as_deref(), Some("/sdcard/doc.pdf"));
    }

    #[test]
    fn test_non_pdf_view_and_send_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver(
            MemoryContent::new(&[("content://a/notes.txt", Some("hi"))]),
            dir.path(),
        );

        let view = ActivationEvent::view("file:///sdcard/photo.jpg", Some("image/jpeg"));
        let send = ActivationEvent::send("content://a/notes.txt", Some("text/plain"));
        assert_eq!(resolver.resolve(&view), None);
        assert_eq!(resolver.resolve(&send), None);
        assert!(cache_entries(dir.path()).is_empty());
    }

    #[test]
    fn test_pdf_mime_type_accepts_any_name() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver(
            MemoryContent::new(&[("content://docs/document/7", Some("%PDF-1.4 body"))]),
            dir.path(),
        );

        let event = ActivationEvent::send("content://docs/document/7", Some("application/pdf"));
        let path = resolver.resolve(&event).expect("content should be copied");
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4 body");

        let name = Path::new(&path).file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("shared_"), "unexpected cache name {}", name);
        assert!(name.ends_with(".pdf"), "unexpected cache name {}", name);
    }

    #[test]
    fn test_uppercase_extension_without_mime() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver(
            MemoryContent::new(&[("content://docs/SCAN.PDF", Some("x"))]),
            dir.path(),
        );

        let event = ActivationEvent::view("content://docs/SCAN.PDF", None);
        assert!(resolver.resolve(&event).is_some());
    }

    #[test]
    fn test_each_copy_gets_a_distinct_cache_file() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver(
            MemoryContent::new(&[("content://docs/a.pdf", Some("x"))]),
            dir.path(),
        );

        let event = ActivationEvent::view("content://docs/a.pdf", None);
        let first = resolver.resolve(&event).unwrap();
        let second = resolver.resolve(&event).unwrap();
        assert_ne!(first, second);
        assert_eq!(cache_entries(dir.path()).len(), 2);
    }

    #[test]
    fn test_send_multiple_uses_only_first_stream() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver(
            MemoryContent::new(&[
                ("content://docs/A.pdf", Some("first")),
                ("content://docs/B.pdf", Some("second")),
            ]),
            dir.path(),
        );

        let event =
            ActivationEvent::send_multiple(["content://docs/A.pdf", "content://docs/B.pdf"], None);
        let path = resolver.resolve(&event).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"first");
        assert_eq!(cache_entries(dir.path()).len(), 1);
    }

    #[test]
    fn test_send_multiple_skips_mime_check() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver(MemoryContent::new(&[]), dir.path());

        let event = ActivationEvent::send_multiple(["file:///sdcard/image.png"], Some("image/*"));
        assert_eq!(resolver.resolve(&event).as_deref(), Some("/sdcard/image.png"));
    }

    #[test]
    fn test_failed_copy_yields_no_path_and_no_leftover() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver(
            MemoryContent::new(&[("content://docs/broken.pdf", None)]),
            dir.path(),
        );

        let event = ActivationEvent::view("content://docs/broken.pdf", None);
        assert_eq!(resolver.resolve(&event), None);
        assert!(cache_entries(dir.path()).is_empty());
    }

    #[test]
    fn test_unopenable_content_yields_no_path() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver(MemoryContent::new(&[]), dir.path());

        let event = ActivationEvent::view("content://docs/missing.pdf", None);
        assert_eq!(resolver.resolve(&event), None);
    }

    #[test]
    fn test_unsupported_shapes_yield_no_path() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver(MemoryContent::new(&[]), dir.path());

        let web = ActivationEvent::view("https://example.com/a.pdf", None);
        let other = ActivationEvent {
            action: IntentAction::Other("android.intent.action.MAIN".into()),
            mime_type: None,
            data: None,
            streams: Vec::new(),
        };
        let empty_send = ActivationEvent::send_multiple(Vec::<String>::new(), None);
        let view_without_data = ActivationEvent {
            action: IntentAction::View,
            mime_type: Some("application/pdf".into()),
            data: None,
            streams: Vec::new(),
        };

        assert_eq!(resolver.resolve(&web), None);
        assert_eq!(resolver.resolve(&other), None);
        assert_eq!(resolver.resolve(&empty_send), None);
        assert_eq!(resolver.resolve(&view_without_data), None);
    }
}
