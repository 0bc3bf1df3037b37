//! Error types module
//!
//! All failures in the upload pipeline are unified under [`UploadError`].
//! Each variant self-describes whether a retry can help, how it should be
//! logged, and what message ends up in the `error` output.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for failures a retry may recover from
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be handled and reported.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "TRANSPORT_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether a new attempt may succeed where this one failed
    fn is_recoverable(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid private key: {0}")]
    KeyDecode(String),

    #[error("Failed to sign auth event: {0}")]
    Signing(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server returned HTTP {status}: {body}")]
    Server { status: u16, body: String },

    #[error("Upload response has no url: {body}")]
    Semantic { body: String },

    #[error("Failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<UploadError>,
    },
}

/// Result type for upload operations
pub type Result<T> = std::result::Result<T, UploadError>;

impl UploadError {
    /// Message written to the `error` output.
    ///
    /// A semantic failure reports the raw response body so the caller sees
    /// exactly what the server answered.
    pub fn report_message(&self) -> String {
        match self {
            UploadError::Semantic { body } => body.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.is_recoverable()
    }

    /// HTTP status of the underlying server failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            UploadError::Server { status, .. } => Some(*status),
            UploadError::RetriesExhausted { last, .. } => last.status(),
            _ => None,
        }
    }
}

impl ErrorMetadata for UploadError {
    fn error_code(&self) -> &'static str {
        match self {
            UploadError::Validation(_) => "VALIDATION_ERROR",
            UploadError::NotFound(_) => "NOT_FOUND",
            UploadError::KeyDecode(_) => "KEY_DECODE_ERROR",
            UploadError::Signing(_) => "SIGNING_ERROR",
            UploadError::Transport(_) => "TRANSPORT_ERROR",
            UploadError::Server { .. } => "SERVER_ERROR",
            UploadError::Semantic { .. } => "SEMANTIC_ERROR",
            UploadError::RetriesExhausted { .. } => "RETRIES_EXHAUSTED",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            UploadError::Signing(_) | UploadError::Transport(_) | UploadError::Server { .. }
        )
    }

    fn log_level(&self) -> LogLevel {
        match self {
            UploadError::Validation(_) | UploadError::NotFound(_) | UploadError::KeyDecode(_) => {
                LogLevel::Debug
            }
            UploadError::Signing(_) | UploadError::Transport(_) | UploadError::Server { .. } => {
                LogLevel::Warn
            }
            UploadError::Semantic { .. } | UploadError::RetriesExhausted { .. } => LogLevel::Error,
        }
    }
}

impl From<io::Error> for UploadError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => UploadError::NotFound(err.to_string()),
            _ => UploadError::Validation(format!("Unreadable file: {}", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_server() {
        let err = UploadError::Server {
            status: 503,
            body: "busy".to_string(),
        };
        assert_eq!(err.error_code(), "SERVER_ERROR");
        assert!(err.is_retryable());
        assert_eq!(err.log_level(), LogLevel::Warn);
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "Server returned HTTP 503: busy");
    }

    #[test]
    fn test_error_metadata_fatal_variants() {
        assert!(!UploadError::Validation("x".into()).is_retryable());
        assert!(!UploadError::NotFound("x".into()).is_retryable());
        assert!(!UploadError::KeyDecode("x".into()).is_retryable());
        assert!(!UploadError::Semantic { body: "{}".into() }.is_retryable());
    }

    #[test]
    fn test_error_metadata_transient_variants() {
        assert!(UploadError::Transport("reset".into()).is_retryable());
        assert!(UploadError::Signing("rng".into()).is_retryable());
    }

    #[test]
    fn test_semantic_report_message_is_raw_body() {
        let err = UploadError::Semantic {
            body: r#"{"status":"ok"}"#.to_string(),
        };
        assert_eq!(err.report_message(), r#"{"status":"ok"}"#);
    }

    #[test]
    fn test_retries_exhausted_carries_last_status() {
        let err = UploadError::RetriesExhausted {
            attempts: 3,
            last: Box::new(UploadError::Server {
                status: 500,
                body: "boom".to_string(),
            }),
        };
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_retryable());
        let msg = err.report_message();
        assert!(msg.starts_with("Failed after 3 attempts"));
        assert!(msg.contains("500"));
    }

    #[test]
    fn test_io_error_mapping() {
        let err: UploadError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, UploadError::NotFound(_)));

        let err: UploadError = io::Error::new(io::ErrorKind::PermissionDenied, "nope").into();
        assert!(matches!(err, UploadError::Validation(_)));
    }
}
