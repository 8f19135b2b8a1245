//! Domain error types
//!
//! This module defines the error hierarchy for the ingestion bridge.
//! All errors are domain-specific and don't expose third-party types.
//!
//! The taxonomy mirrors the failure scopes of the pipeline:
//! - [`HieError::Connection`] aborts the whole partner run
//! - [`HieError::FileProcessing`] skips one file, the run continues
//! - [`HieError::RowValidation`] is captured as a diagnostic, the row is
//!   still converted with fallback values
//! - [`HieError::Dispatch`] surfaces after the bounded retry policy is
//!   exhausted

use thiserror::Error;

/// Main bridge error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum HieError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Remote session errors (auth, connect, missing remote directory).
    /// Fatal for the run.
    #[error("Connection error: {0}")]
    Connection(#[from] RemoteError),

    /// Replica storage errors
    #[error("Replica error: {0}")]
    Replica(#[from] ReplicaError),

    /// Download/decrypt/read failure scoped to one file
    #[error("File processing error for '{file}': {message}")]
    FileProcessing { file: String, message: String },

    /// One field failed normalization
    #[error("Row validation error at '{field}': received '{received}' ({rule})")]
    RowValidation {
        field: String,
        received: String,
        rule: String,
    },

    /// Notification channel send failure after retries exhausted
    #[error("Dispatch error after {attempts} attempt(s): {message}")]
    Dispatch { attempts: usize, message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Malformed clinical message content
    #[error("Message error: {0}")]
    Message(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl HieError {
    /// Builds a file-scoped processing error
    pub fn file_processing(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileProcessing {
            file: file.into(),
            message: message.into(),
        }
    }
}

/// Remote-session-specific errors
///
/// Errors that occur when talking to the partner's remote file server.
/// These errors don't expose the underlying transfer client types.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Failed to connect to the remote server
    #[error("Failed to connect to remote server: {0}")]
    ConnectionFailed(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Remote directory does not exist
    #[error("Remote directory not found: {0}")]
    DirectoryNotFound(String),

    /// Remote file does not exist
    #[error("Remote file not found: {0}")]
    FileNotFound(String),

    /// Listing a remote directory failed
    #[error("Failed to list remote directory '{path}': {message}")]
    ListFailed { path: String, message: String },

    /// Reading a remote file failed
    #[error("Failed to read remote file '{path}': {message}")]
    ReadFailed { path: String, message: String },

    /// Writing a remote file failed
    #[error("Failed to write remote file '{path}': {message}")]
    WriteFailed { path: String, message: String },

    /// The session was used before `connect()`
    #[error("Remote session is not connected")]
    NotConnected,
}

/// Replica-storage-specific errors
///
/// Raised by both the local-disk and the object-storage backends.
#[derive(Debug, Error)]
pub enum ReplicaError {
    /// Listing replica entries failed
    #[error("Failed to list replica entries under '{path}': {message}")]
    ListFailed { path: String, message: String },

    /// Reading a replica entry failed
    #[error("Failed to read replica entry '{path}': {message}")]
    ReadFailed { path: String, message: String },

    /// Writing a replica entry failed
    #[error("Failed to write replica entry '{path}': {message}")]
    WriteFailed { path: String, message: String },

    /// Replica entry does not exist
    #[error("Replica entry not found: {0}")]
    NotFound(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for HieError {
    fn from(err: std::io::Error) -> Self {
        HieError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for HieError {
    fn from(err: serde_json::Error) -> Self {
        HieError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for HieError {
    fn from(err: toml::de::Error) -> Self {
        HieError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let err = HieError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_remote_error_conversion() {
        let remote_err = RemoteError::AuthenticationFailed("bad credentials".to_string());
        let err: HieError = remote_err.into();
        assert!(matches!(err, HieError::Connection(_)));
    }

    #[test]
    fn test_replica_error_conversion() {
        let replica_err = ReplicaError::NotFound("feeds/a.psv".to_string());
        let err: HieError = replica_err.into();
        assert!(matches!(err, HieError::Replica(_)));
    }

    #[test]
    fn test_file_processing_error_display() {
        let err = HieError::file_processing("feeds/a.psv.gpg", "decryption failed");
        assert_eq!(
            err.to_string(),
            "File processing error for 'feeds/a.psv.gpg': decryption failed"
        );
    }

    #[test]
    fn test_row_validation_error_display() {
        let err = HieError::RowValidation {
            field: "PatClass".to_string(),
            received: "XYZ".to_string(),
            rule: "unknown patient class".to_string(),
        };
        assert!(err.to_string().contains("PatClass"));
        assert!(err.to_string().contains("XYZ"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: HieError = io_err.into();
        assert!(matches!(err, HieError::Io(_)));
    }

    #[test]
    fn test_error_implements_std_error() {
        let err = HieError::Other("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
