use serde::ser::SerializeStruct;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HostError {
    /// Stable machine-readable code, mirrored to the UI layer.
    pub fn code(&self) -> &'static str {
        match self {
            HostError::Platform(_) => "PLATFORM_ERROR",
            HostError::Serialization(_) => "SERIALIZATION_ERROR",
            HostError::Io(_) => "IO_ERROR",
        }
    }
}

impl serde::Serialize for HostError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("HostError", 2)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

pub type Result<T> = std::result::Result<T, HostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_error_serialization() {
        let err = HostError::Platform("no activity".into());
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("PLATFORM_ERROR"));
        assert!(json.contains("Platform error: no activity"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: HostError = io.into();
        assert_eq!(err.code(), "IO_ERROR");
    }
}
