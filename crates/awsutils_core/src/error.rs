use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the object-storage and queue helpers.
#[derive(Debug, Error)]
pub enum AwsError {
    /// The service answered and rejected the call.
    #[error("{operation} failed: {message}")]
    Client {
        operation: &'static str,
        status: Option<u16>,
        code: Option<String>,
        message: String,
    },

    /// The call never produced a usable response (credentials, network, timeout).
    #[error("{operation} could not reach the service: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },

    #[error("local file error on {}: {source}", path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{key} download possible but not saved locally at {}", path.display())]
    NotSavedLocally { key: String, path: PathBuf },

    #[error("{operation}: HTTPStatus {status} != 200")]
    HttpStatus { operation: &'static str, status: u16 },

    #[error("{operation}: no {field} in response")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },

    #[error("bucket {bucket} is inaccessible")]
    BucketInaccessible {
        bucket: String,
        #[source]
        cause: Box<AwsError>,
    },

    #[error("key {key} does not exist or is inaccessible in {bucket}")]
    KeyInaccessible {
        bucket: String,
        key: String,
        #[source]
        cause: Box<AwsError>,
    },

    #[error("move {target_key} from {source_bucket} to {target_bucket} FAILED (source key {source_key})")]
    MoveFailed {
        source_key: String,
        target_key: String,
        source_bucket: String,
        target_bucket: String,
        #[source]
        cause: Box<AwsError>,
    },

    #[error("sqs: {url} - no message returned")]
    NoMessages { url: String },

    #[error("invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("{operation} gave up after {attempts} attempts")]
    RetriesExhausted {
        operation: &'static str,
        attempts: u32,
        #[source]
        last: Box<AwsError>,
    },
}

impl AwsError {
    pub fn client(operation: &'static str, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Client {
            operation,
            status,
            code: None,
            message: message.into(),
        }
    }

    pub fn local_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::LocalIo {
            path: path.into(),
            source,
        }
    }

    /// HTTP status attached to the error, looking through wrapping variants.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Client { status, .. } => *status,
            Self::HttpStatus { status, .. } => Some(*status),
            Self::BucketInaccessible { cause, .. }
            | Self::KeyInaccessible { cause, .. }
            | Self::MoveFailed { cause, .. } => cause.http_status(),
            Self::RetriesExhausted { last, .. } => last.http_status(),
            _ => None,
        }
    }

    /// Service error code of a [`AwsError::Client`] error.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Client { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.http_status() == Some(404)
    }

    pub fn is_client(&self) -> bool {
        matches!(self, Self::Client { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Local filesystem failures, including a download that left no file behind.
    pub fn is_local_io(&self) -> bool {
        matches!(self, Self::LocalIo { .. } | Self::NotSavedLocally { .. })
    }

    pub fn is_move_failure(&self) -> bool {
        matches!(self, Self::MoveFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_is_found_through_wrappers() {
        let error = AwsError::RetriesExhausted {
            operation: "s3_move",
            attempts: 3,
            last: Box::new(AwsError::MoveFailed {
                source_key: "a.pdf".to_string(),
                target_key: "a.pdf".to_string(),
                source_bucket: "in".to_string(),
                target_bucket: "out".to_string(),
                cause: Box::new(AwsError::client("delete_object", Some(404), "NoSuchKey")),
            }),
        };

        assert_eq!(error.http_status(), Some(404));
        assert!(error.is_not_found());
    }

    #[test]
    fn not_saved_locally_counts_as_local_io() {
        let error = AwsError::NotSavedLocally {
            key: "a.pdf".to_string(),
            path: PathBuf::from("/tmp/a.pdf"),
        };
        assert!(error.is_local_io());
        assert!(!error.is_client());
    }

    #[test]
    fn http_status_error_message_names_operation() {
        let error = AwsError::HttpStatus {
            operation: "delete_message",
            status: 500,
        };
        assert_eq!(error.to_string(), "delete_message: HTTPStatus 500 != 200");
    }
}
