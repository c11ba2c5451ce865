use pdfscanner_host::HostConfig;
use tauri::{
    plugin::{Builder, TauriPlugin},
    Manager, Runtime,
};
use tracing::{debug, info};

pub use models::*;

#[cfg(desktop)]
mod desktop;
#[cfg(mobile)]
mod mobile;

mod commands;
mod error;
mod models;
mod pdfhost;

pub use error::{Error, Result};
pub use pdfhost::Pdfhost;

/// Extensions to [`tauri::App`], [`tauri::AppHandle`] and [`tauri::Window`] to access the pdfhost APIs.
pub trait PdfhostExt<R: Runtime> {
    fn pdfhost(&self) -> &Pdfhost<R>;
}

impl<R: Runtime, T: Manager<R>> crate::PdfhostExt<R> for T {
    fn pdfhost(&self) -> &Pdfhost<R> {
        self.state::<Pdfhost<R>>().inner()
    }
}

/// Initializes the pdfhost plugin.
///
/// - Resolves "open with"/"share to" activations into local PDF paths
/// - Hands them to the webview (pull via `get_initial_pdf_path`, push via `open-pdf`)
/// - Saves UI-produced files into the public Downloads collection
pub fn init<R: Runtime>() -> TauriPlugin<R, Option<HostConfig>> {
    Builder::<R, Option<HostConfig>>::new("pdfhost")
        .invoke_handler(tauri::generate_handler![
            commands::save_to_downloads,
            commands::scan_file,
            commands::get_initial_pdf_path,
            commands::register_listener,
            commands::unregister_listener,
            commands::dispatch,
        ])
        .setup(|app, api| {
            #[cfg(mobile)]
            let pdfhost = mobile::init(app, api)?;
            #[cfg(desktop)]
            let pdfhost = desktop::init(app, api)?;
            app.manage(pdfhost);

            #[cfg(mobile)]
            mobile::listen_for_activations(app);
            #[cfg(desktop)]
            desktop::deliver_launch_args(app);

            info!("pdfhost plugin ready");
            Ok(())
        })
        .on_event(|app, event| match event {
            tauri::RunEvent::Resumed => debug!("pdfhost: app resumed"),
            tauri::RunEvent::Exit => {
                #[cfg(mobile)]
                pdfscanner_host::activation::router().unregister();
                if let Err(e) = app.pdfhost().unregister_listener() {
                    debug!("pdfhost: listener cleanup skipped: {}", e);
                }
            }
            _ => {}
        })
        .build()
}
