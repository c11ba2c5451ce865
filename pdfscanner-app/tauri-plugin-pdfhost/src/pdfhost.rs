use std::sync::{Mutex, MutexGuard};

use pdfscanner_host::activation::Activation;
use pdfscanner_host::bridge::{
    MethodCall, MethodResult, PdfListener, SaveToDownloadsArgs, ScanFileArgs,
};
use pdfscanner_host::PdfHost;
use serde_json::Value;
use tauri::{AppHandle, Emitter, Runtime};
use tracing::{debug, error};

use crate::models::{OpenPdfPayload, OPEN_PDF_EVENT};
use crate::{Error, Result};

/// Pushes resolved paths to the webview as `open-pdf` events.
struct EmitterListener<R: Runtime>(AppHandle<R>);

impl<R: Runtime> PdfListener for EmitterListener<R> {
    fn open_pdf(&self, path: &str) {
        if let Err(e) = self.0.emit(OPEN_PDF_EVENT, OpenPdfPayload::now(path)) {
            error!("Failed to emit {}: {}", OPEN_PDF_EVENT, e);
        }
    }
}

/// Access to the pdfhost APIs.
pub struct Pdfhost<R: Runtime> {
    app: AppHandle<R>,
    host: Mutex<PdfHost>,
}

impl<R: Runtime> Pdfhost<R> {
    pub(crate) fn new(app: AppHandle<R>, host: PdfHost) -> Self {
        Self {
            app,
            host: Mutex::new(host),
        }
    }

    fn host(&self) -> Result<MutexGuard<'_, PdfHost>> {
        self.host.lock().map_err(|_| Error::StateUnavailable)
    }

    /// Feed an OS activation into the host.
    pub fn on_activation(&self, activation: Activation) {
        let mut host = match self.host() {
            Ok(host) => host,
            Err(e) => {
                error!("Dropping activation: {}", e);
                return;
            }
        };
        match activation {
            Activation::Launch(event) => host.on_launch(event.as_ref()),
            Activation::NewIntent(event) => host.on_new_intent(&event),
        }
    }

    /// Persist bytes into the public Downloads collection.
    ///
    /// `Ok(false)` means the write itself failed; missing fields are an error.
    pub fn save_to_downloads(&self, args: SaveToDownloadsArgs) -> Result<bool> {
        let reply = self.host()?.media_store().save_to_downloads(args);
        bool_reply(reply)
    }

    /// Ask the media index to pick up `path`. Always `true` once a path is given.
    pub fn scan_file(&self, args: ScanFileArgs) -> Result<bool> {
        let reply = self.host()?.media_store().scan_file(args);
        bool_reply(reply)
    }

    /// Drain the pending shared-PDF path.
    pub fn get_initial_pdf_path(&self) -> Result<Option<String>> {
        Ok(self.host()?.intents().take_initial_pdf_path())
    }

    /// Start pushing new PDFs to the webview.
    pub fn register_listener(&self) -> Result<()> {
        self.host()?
            .attach_listener(Box::new(EmitterListener(self.app.clone())));
        Ok(())
    }

    pub fn unregister_listener(&self) -> Result<()> {
        self.host()?.detach_listener();
        Ok(())
    }

    /// Raw method-name dispatch, for UIs that speak the channel protocol.
    pub fn dispatch(&self, channel: &str, call: &MethodCall) -> Result<MethodResult> {
        debug!("Dispatching {} on {}", call.method, channel);
        Ok(self.host()?.handle(channel, call))
    }
}

fn bool_reply(reply: MethodResult) -> Result<bool> {
    match reply {
        MethodResult::Success {
            value: Value::Bool(ok),
        } => Ok(ok),
        other => Err(Error::from_reply(other)),
    }
}
