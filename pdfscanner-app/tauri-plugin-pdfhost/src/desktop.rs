use std::path::{Path, PathBuf};
use std::sync::Arc;

use pdfscanner_host::activation::Activation;
use pdfscanner_host::downloads::FsStorageBroker;
use pdfscanner_host::intent::{ActivationEvent, FsContentSource, ResourceLocator, PDF_MIME_TYPE};
use pdfscanner_host::media_scan::FsMediaScanner;
use pdfscanner_host::{Backends, HostConfig, PdfHost};
use tauri::{plugin::PluginApi, AppHandle, Manager, Runtime};
use tracing::debug;

use crate::{Pdfhost, PdfhostExt};

/// Initialize the desktop plugin on top of plain directories.
///
/// Desktop has no content broker; `content://<authority>/...` locators map
/// under `<cache>/providers/<authority>/`.
pub fn init<R: Runtime>(
    app: &AppHandle<R>,
    api: PluginApi<R, Option<HostConfig>>,
) -> crate::Result<Pdfhost<R>> {
    let config = api.config().clone().unwrap_or_default();
    let cache_dir = app.path().app_cache_dir()?;
    let downloads_dir = match &config.downloads_dir {
        Some(dir) => dir.clone(),
        None => app.path().download_dir()?,
    };
    debug!("Desktop downloads directory: {:?}", downloads_dir);

    let backends = Backends {
        content: Arc::new(FsContentSource::new(cache_dir.join("providers"))),
        storage: Arc::new(FsStorageBroker::new(downloads_dir).with_sdk_int(config.desktop_sdk_int)),
        scanner: Arc::new(FsMediaScanner),
        cache_dir: cache_dir.join("shared"),
    };
    Ok(Pdfhost::new(app.clone(), PdfHost::new(config, backends)))
}

/// "Open with" on desktop: the first `.pdf` argument becomes the launch event.
pub fn deliver_launch_args<R: Runtime>(app: &AppHandle<R>) {
    let event = launch_event(std::env::args_os().skip(1).map(PathBuf::from));
    app.pdfhost().on_activation(Activation::Launch(event));
}

fn launch_event<I>(args: I) -> Option<ActivationEvent>
where
    I: IntoIterator<Item = PathBuf>,
{
    let path = args.into_iter().find(|arg| is_pdf_path(arg))?;
    let path = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(&path))
            .unwrap_or(path)
    };
    let locator = ResourceLocator::from_file_path(&path);
    Some(ActivationEvent::view(locator.as_str(), Some(PDF_MIME_TYPE)))
}

fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_pdf_argument_wins() {
        let args = ["--verbose", "/tmp/notes.txt", "/tmp/a.PDF", "/tmp/b.pdf"]
            .into_iter()
            .map(PathBuf::from);
        let event = launch_event(args).unwrap();
        assert_eq!(event.data.unwrap().path().as_deref(), Some("/tmp/a.PDF"));
        assert_eq!(event.mime_type.as_deref(), Some(PDF_MIME_TYPE));
    }

    #[test]
    fn test_no_pdf_argument() {
        let args = ["--flag", "readme.md"].into_iter().map(PathBuf::from);
        assert!(launch_event(args).is_none());
    }
}
