//! PDF Scanner host CLI
//!
//! Runs the platform host layer against plain directories so share/open
//! handling and the Downloads writer can be exercised off-device.
//!
//! `content://<authority>/<path>` locators are served from
//! `<cache>/providers/<authority>/<path>`; `--sdk-int` picks which storage
//! policy the Downloads writer follows.

use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pdfscanner_host::bridge::{MethodResult, SaveToDownloadsArgs};
use pdfscanner_host::config::save_config;
use pdfscanner_host::downloads::FsStorageBroker;
use pdfscanner_host::intent::{ActivationEvent, FsContentSource, PDF_MIME_TYPE};
use pdfscanner_host::media_scan::FsMediaScanner;
use pdfscanner_host::{load_config, Backends, HostConfig, PdfHost};
use tracing::{debug, info, warn};

/// PDF Scanner host layer
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the host config file (defaults are used if it doesn't exist)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for cache copies of shared documents
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Directory standing in for the public Downloads collection
    #[arg(long)]
    downloads_dir: Option<PathBuf>,

    /// SDK level to report to the Downloads writer (29+ selects scoped storage)
    #[arg(long)]
    sdk_int: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve an activation into a local PDF path, as a launch would
    Resolve {
        #[arg(long, value_enum, default_value = "view")]
        action: ActionArg,

        /// Declared MIME type of the activation
        #[arg(long)]
        mime: Option<String>,

        /// Locators carried by the activation (`file://...` or `content://...`)
        #[arg(required = true)]
        uris: Vec<String>,
    },
    /// Copy a file into Downloads
    Save {
        input: PathBuf,

        /// Display name in Downloads (defaults to the input's file name)
        #[arg(long)]
        name: Option<String>,

        #[arg(long, default_value = PDF_MIME_TYPE)]
        mime: String,
    },
    /// Ask the media index to pick up a file
    Scan { path: String },
    /// Print the effective config
    Config {
        /// Also write it to the config path
        #[arg(long)]
        write: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ActionArg {
    View,
    Send,
    SendMultiple,
}

fn activation_event(
    action: ActionArg,
    mime: Option<&str>,
    uris: Vec<String>,
) -> Result<ActivationEvent> {
    let event = match action {
        ActionArg::View | ActionArg::Send => {
            let Some(first) = uris.into_iter().next() else {
                bail!("at least one locator is required");
            };
            if action == ActionArg::View {
                ActivationEvent::view(first, mime)
            } else {
                ActivationEvent::send(first, mime)
            }
        }
        ActionArg::SendMultiple => ActivationEvent::send_multiple(uris, mime),
    };
    Ok(event)
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pdfscanner")
        .join("host.json")
}

/// Load the config file and apply command-line overrides on top.
fn effective_config(args: &Args, path: &Path) -> Result<HostConfig> {
    let mut config =
        load_config(path).with_context(|| format!("Failed to load config from {:?}", path))?;
    if let Some(dir) = &args.cache_dir {
        config.cache_dir = Some(dir.clone());
    }
    if let Some(dir) = &args.downloads_dir {
        config.downloads_dir = Some(dir.clone());
    }
    if let Some(sdk) = args.sdk_int {
        config.desktop_sdk_int = sdk;
    }
    Ok(config)
}

fn build_host(config: HostConfig) -> Result<PdfHost> {
    let cache_root = dirs::cache_dir()
        .context("No cache directory on this platform")?
        .join("pdfscanner");
    let downloads_dir = match &config.downloads_dir {
        Some(dir) => dir.clone(),
        None => dirs::download_dir().context("No Downloads directory; pass --downloads-dir")?,
    };
    let providers = config
        .cache_dir
        .clone()
        .unwrap_or_else(|| cache_root.clone())
        .join("providers");
    debug!("Downloads: {:?}, providers: {:?}", downloads_dir, providers);

    let backends = Backends {
        content: Arc::new(FsContentSource::new(providers)),
        storage: Arc::new(FsStorageBroker::new(downloads_dir).with_sdk_int(config.desktop_sdk_int)),
        scanner: Arc::new(FsMediaScanner),
        cache_dir: cache_root.join("shared"),
    };
    Ok(PdfHost::new(config, backends))
}

fn print_reply(reply: &MethodResult) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(reply)?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pdfscanner_host=debug".parse()?)
                .add_directive("pdfscanner_cli=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let config = effective_config(&args, &config_path)?;

    match args.command {
        Command::Config { write } => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            if write {
                if let Some(parent) = config_path.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create {:?}", parent))?;
                }
                save_config(&config_path, &config)
                    .with_context(|| format!("Failed to write config to {:?}", config_path))?;
                info!("Config written to {:?}", config_path);
            }
        }
        Command::Resolve { action, mime, uris } => {
            let event = activation_event(action, mime.as_deref(), uris)?;
            let mut host = build_host(config)?;
            host.on_launch(Some(&event));
            match host.intents().take_initial_pdf_path() {
                Some(path) => println!("{}", path),
                None => {
                    warn!("Activation did not resolve to a PDF");
                    std::process::exit(1);
                }
            }
        }
        Command::Save { input, name, mime } => {
            let bytes =
                std::fs::read(&input).with_context(|| format!("Failed to read {:?}", input))?;
            let file_name = match name {
                Some(name) => name,
                None => input
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .context("Input has no file name; pass --name")?,
            };
            let host = build_host(config)?;
            info!(
                "Saving {} ({} bytes) under {:?}",
                file_name,
                bytes.len(),
                host.media_store().writer().policy()
            );
            let reply = host.media_store().save_to_downloads(SaveToDownloadsArgs {
                file_name: Some(file_name),
                bytes: Some(bytes),
                mime_type: Some(mime),
            });
            print_reply(&reply)?;
        }
        Command::Scan { path } => {
            let host = build_host(config)?;
            let (tx, rx) = mpsc::channel();
            host.media_store().writer().scanner().scan_file(
                &path,
                Some(Box::new(move |scanned: &str| {
                    let _ = tx.send(scanned.to_string());
                })),
            );
            match rx.recv_timeout(Duration::from_secs(5)) {
                Ok(scanned) => info!("Scan finished for {}", scanned),
                Err(_) => warn!("Scan did not report back for {}", path),
            }
            print_reply(&MethodResult::success(true))?;
        }
    }

    Ok(())
}
