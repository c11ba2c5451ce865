use pdfscanner_host::bridge::{MethodCall, MethodResult, SaveToDownloadsArgs, ScanFileArgs};
use serde_json::Value;
use tauri::{command, AppHandle, Runtime};

use crate::PdfhostExt;
use crate::Result;

/// Save bytes to the public Downloads collection.
///
/// Runs on the blocking pool so large documents don't stall the IPC thread.
#[command]
pub(crate) async fn save_to_downloads<R: Runtime>(
    app: AppHandle<R>,
    file_name: Option<String>,
    bytes: Option<Vec<u8>>,
    mime_type: Option<String>,
) -> Result<bool> {
    let args = SaveToDownloadsArgs {
        file_name,
        bytes,
        mime_type,
    };
    tauri::async_runtime::spawn_blocking(move || app.pdfhost().save_to_downloads(args)).await?
}

/// Trigger a media scan of `path`. Fire-and-forget.
#[command]
pub(crate) async fn scan_file<R: Runtime>(app: AppHandle<R>, path: Option<String>) -> Result<bool> {
    app.pdfhost().scan_file(ScanFileArgs { path })
}

/// Fetch, and clear, the PDF the app was opened with.
///
/// The frontend should call this once after it has registered its
/// `open-pdf` listener.
#[command]
pub(crate) async fn get_initial_pdf_path<R: Runtime>(app: AppHandle<R>) -> Result<Option<String>> {
    app.pdfhost().get_initial_pdf_path()
}

#[command]
pub(crate) async fn register_listener<R: Runtime>(app: AppHandle<R>) -> Result<()> {
    app.pdfhost().register_listener()
}

#[command]
pub(crate) async fn unregister_listener<R: Runtime>(app: AppHandle<R>) -> Result<()> {
    app.pdfhost().unregister_listener()
}

/// Channel-style call: `{ channel, method, arguments }` in, tagged result out.
#[command]
pub(crate) async fn dispatch<R: Runtime>(
    app: AppHandle<R>,
    channel: String,
    method: String,
    arguments: Option<Value>,
) -> Result<MethodResult> {
    let call = MethodCall::new(method, arguments.unwrap_or(Value::Null));
    app.pdfhost().dispatch(&channel, &call)
}
