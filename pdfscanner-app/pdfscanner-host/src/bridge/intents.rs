use tracing::{debug, info, warn};

use super::{MethodCall, MethodCallHandler, MethodResult};
use crate::pending::PendingSlot;

pub const GET_INITIAL_PDF_PATH: &str = "getInitialPdfPath";
pub const OPEN_PDF: &str = "openPdf";

/// Receiver of host-initiated `openPdf` pushes.
pub trait PdfListener: Send + Sync {
    fn open_pdf(&self, path: &str);
}

/// Host side of the intent channel.
///
/// A resolved path is pushed straight to the listener when one is attached,
/// otherwise it waits in a single slot until the UI pulls it.
#[derive(Default)]
pub struct IntentChannel {
    pending: PendingSlot<String>,
    listener: Option<Box<dyn PdfListener>>,
}

impl IntentChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, listener: Box<dyn PdfListener>) {
        if self.listener.replace(listener).is_some() {
            debug!("Replaced existing PDF listener");
        } else {
            info!("PDF listener attached");
        }
    }

    pub fn detach(&mut self) {
        if self.listener.take().is_some() {
            info!("PDF listener detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.listener.is_some()
    }

    /// Push to the attached listener, or park the path for a later pull.
    pub fn deliver(&mut self, path: String) {
        match &self.listener {
            Some(listener) => {
                debug!("Pushing {} to {}", path, OPEN_PDF);
                listener.open_pdf(&path);
            }
            None => {
                if let Some(dropped) = self.pending.store(path) {
                    warn!("Pending PDF path overwritten, dropped {}", dropped);
                }
            }
        }
    }

    /// Set the initial pending value as seen at launch.
    pub fn set_initial(&mut self, path: Option<String>) {
        self.pending.replace(path);
    }

    pub fn take_initial_pdf_path(&mut self) -> Option<String> {
        self.pending.take()
    }

    pub fn pending_path(&self) -> Option<&str> {
        self.pending.peek().map(String::as_str)
    }
}

impl MethodCallHandler for IntentChannel {
    fn on_method_call(&mut self, call: &MethodCall) -> MethodResult {
        match call.method.as_str() {
            GET_INITIAL_PDF_PATH => MethodResult::success(self.take_initial_pdf_path()),
            _ => MethodResult::NotImplemented,
        }
    }
}
