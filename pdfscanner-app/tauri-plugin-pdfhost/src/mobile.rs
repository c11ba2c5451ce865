use std::sync::Arc;

use pdfscanner_host::activation::{router, ActivationSink};
use pdfscanner_host::{HostConfig, PdfHost};
use tauri::{plugin::PluginApi, AppHandle, Runtime};

use crate::{Pdfhost, PdfhostExt};

/// Initialize the mobile plugin on top of the platform storage services.
pub fn init<R: Runtime>(
    app: &AppHandle<R>,
    api: PluginApi<R, Option<HostConfig>>,
) -> crate::Result<Pdfhost<R>> {
    let config = api.config().clone().unwrap_or_default();

    #[cfg(target_os = "android")]
    let backends = pdfscanner_host::android::AndroidContext::from_ndk()?.backends()?;

    // iOS has no public Downloads collection; files land in the app's Documents.
    #[cfg(target_os = "ios")]
    let backends = {
        use tauri::Manager;

        let cache_dir = app.path().app_cache_dir()?;
        let documents = app.path().document_dir()?;
        pdfscanner_host::Backends {
            content: Arc::new(pdfscanner_host::intent::FsContentSource::new(
                cache_dir.join("providers"),
            )),
            storage: Arc::new(
                pdfscanner_host::downloads::FsStorageBroker::new(documents)
                    .with_sdk_int(config.desktop_sdk_int),
            ),
            scanner: Arc::new(pdfscanner_host::media_scan::NoopScanner),
            cache_dir: cache_dir.join("shared"),
        }
    };

    Ok(Pdfhost::new(app.clone(), PdfHost::new(config, backends)))
}

/// Route activations from the platform entry point into the managed host.
///
/// Anything that arrived before this point (the launch intent, typically) is
/// replayed immediately.
pub fn listen_for_activations<R: Runtime>(app: &AppHandle<R>) {
    let handle = app.clone();
    let sink: ActivationSink = Arc::new(move |activation| {
        handle.pdfhost().on_activation(activation);
    });
    router().register(sink);
}
