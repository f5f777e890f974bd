//! Service error types.

use crate::persist::PersistError;
use std::fmt;
use std::io;

/// Errors that can occur while assembling or running the service.
#[derive(Debug)]
pub enum ServiceError {
    /// Invalid configuration
    ConfigError(String),
    /// Failed to save or load a state snapshot
    PersistError(PersistError),
    /// I/O error (log files, state directory, etc.)
    IoError(io::Error),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Self::PersistError(e) => write!(f, "Persistence error: {}", e),
            Self::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PersistError(e) => Some(e),
            Self::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PersistError> for ServiceError {
    fn from(e: PersistError) -> Self {
        Self::PersistError(e)
    }
}

impl From<io::Error> for ServiceError {
    fn from(e: io::Error) -> Self {
        Self::IoError(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_config_error() {
        let err = ServiceError::ConfigError("intervals must be non-zero".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("intervals must be non-zero"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let service_err: ServiceError = io_err.into();
        assert!(matches!(service_err, ServiceError::IoError(_)));
    }

    #[test]
    fn test_from_persist_error() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let persist_err = PersistError::Io(io_err);
        let service_err: ServiceError = persist_err.into();
        assert!(matches!(service_err, ServiceError::PersistError(_)));
        assert!(service_err.to_string().contains("Persistence error"));
    }

    #[test]
    fn test_error_trait() {
        let err = ServiceError::ConfigError("test".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
