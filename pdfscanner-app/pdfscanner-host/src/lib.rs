//! Platform host layer of PDF Scanner.
//!
//! Receives "open"/"share" activations, turns them into local file paths and
//! hands them to the UI; writes UI-supplied bytes into the public Downloads
//! collection and gets them indexed.

pub mod activation;
pub mod bridge;
pub mod config;
pub mod downloads;
pub mod error;
mod host;
pub mod intent;
pub mod media_scan;
pub mod pending;

#[cfg(target_os = "android")]
pub mod android;

pub use config::{load_config, HostConfig};
pub use error::{HostError, Result};
pub use host::{Backends, PdfHost};
