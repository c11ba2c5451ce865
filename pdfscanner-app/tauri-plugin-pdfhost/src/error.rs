//! Error types for the pdfhost plugin.

use pdfscanner_host::bridge::{MethodResult, INVALID_ARGUMENTS, INVALID_PATH};
use pdfscanner_host::HostError;
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Result type alias for plugin operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required command argument was absent.
    #[error("Missing required arguments")]
    InvalidArguments,

    #[error("File path is null")]
    InvalidPath,

    /// Host state lock was poisoned by an earlier panic.
    #[error("Host state is unavailable")]
    StateUnavailable,

    #[error("Unexpected channel reply: {0}")]
    UnexpectedReply(String),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error("I/O error: {0}")]
    Io(String),

    #[error(transparent)]
    Tauri(#[from] tauri::Error),
}

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidArguments => INVALID_ARGUMENTS,
            Error::InvalidPath => INVALID_PATH,
            Error::StateUnavailable => "STATE_UNAVAILABLE",
            Error::UnexpectedReply(_) => "UNEXPECTED_REPLY",
            Error::Host(e) => e.code(),
            Error::Io(_) => "IO_ERROR",
            Error::Tauri(_) => "TAURI_ERROR",
        }
    }

    /// Lift a channel error reply into the matching command error.
    pub(crate) fn from_reply(result: MethodResult) -> Self {
        match result {
            MethodResult::Error { code, .. } if code == INVALID_ARGUMENTS => {
                Error::InvalidArguments
            }
            MethodResult::Error { code, .. } if code == INVALID_PATH => Error::InvalidPath,
            other => Error::UnexpectedReply(format!("{:?}", other)),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Error", 2)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}
