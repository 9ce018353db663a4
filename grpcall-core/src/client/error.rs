use crate::json::{BuildError, ValidationError};
use crate::schema::ResolveError;
use std::time::Duration;
use tonic::Code;

/// The transport failure categories callers are expected to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    InvalidArgument,
    Unauthenticated,
    PermissionDenied,
    Unavailable,
    DeadlineExceeded,
    /// Any other status code, kept in [`ClassifiedError::code`].
    Other,
}

impl ErrorCategory {
    fn from_code(code: Code) -> Self {
        match code {
            Code::NotFound => ErrorCategory::NotFound,
            Code::InvalidArgument => ErrorCategory::InvalidArgument,
            Code::Unauthenticated => ErrorCategory::Unauthenticated,
            Code::PermissionDenied => ErrorCategory::PermissionDenied,
            Code::Unavailable => ErrorCategory::Unavailable,
            Code::DeadlineExceeded => ErrorCategory::DeadlineExceeded,
            _ => ErrorCategory::Other,
        }
    }
}

/// A failed gRPC call, classified from the status returned by the transport.
///
/// The status message is kept verbatim and the original `tonic::Status` is available as
/// the error source.
#[derive(Debug, thiserror::Error)]
#[error("{}: {message}", describe(.category, .code))]
pub struct ClassifiedError {
    category: ErrorCategory,
    code: Code,
    message: String,
    #[source]
    status: Option<tonic::Status>,
}

impl ClassifiedError {
    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    pub fn code(&self) -> Code {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Option<&tonic::Status> {
        self.status.as_ref()
    }

    /// A deadline that expired on the client side, before the transport produced a status.
    pub(crate) fn timed_out(timeout: Duration) -> Self {
        ClassifiedError {
            category: ErrorCategory::DeadlineExceeded,
            code: Code::DeadlineExceeded,
            message: format!("no response within {}ms", timeout.as_millis()),
            status: None,
        }
    }

    /// Only unavailable and deadline exceeded failures may succeed when sent again unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category,
            ErrorCategory::Unavailable | ErrorCategory::DeadlineExceeded
        )
    }
}

impl From<tonic::Status> for ClassifiedError {
    fn from(status: tonic::Status) -> Self {
        classify(status)
    }
}

/// Classifies a transport status into one of the [`ErrorCategory`]s.
pub fn classify(status: tonic::Status) -> ClassifiedError {
    ClassifiedError {
        category: ErrorCategory::from_code(status.code()),
        code: status.code(),
        message: status.message().to_string(),
        status: Some(status),
    }
}

fn describe(category: &ErrorCategory, code: &Code) -> String {
    match category {
        ErrorCategory::NotFound => "service or method not found".to_string(),
        ErrorCategory::InvalidArgument => "invalid request".to_string(),
        ErrorCategory::Unauthenticated => "authentication required".to_string(),
        ErrorCategory::PermissionDenied => "permission denied".to_string(),
        ErrorCategory::Unavailable => "service unavailable".to_string(),
        ErrorCategory::DeadlineExceeded => "request timeout".to_string(),
        ErrorCategory::Other => format!("gRPC error ({code:?})"),
    }
}

/// Errors that can occur while invoking a method through an [`super::Invoker`].
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("request encoding failed: {0}")]
    Encode(#[source] BuildError),
    #[error("Request message is a '{actual}' but method expects a '{expected}'")]
    RequestTypeMismatch { expected: String, actual: String },
    #[error("Invalid gRPC path '{path}': '{source}'")]
    InvalidPath {
        path: String,
        source: http::uri::InvalidUri,
    },
    #[error("Invalid metadata (header) key '{key}': '{source}'")]
    InvalidMetadataKey {
        key: String,
        source: tonic::metadata::errors::InvalidMetadataKey,
    },
    #[error("Invalid metadata (header) value for key '{key}': '{source}'")]
    InvalidMetadataValue {
        key: String,
        source: tonic::metadata::errors::InvalidMetadataValue,
    },
    #[error(transparent)]
    Transport(#[from] ClassifiedError),
    #[error("Failed to map response to JSON: '{0}'")]
    Serialize(#[source] serde_json::Error),
}

impl CallError {
    /// The field level errors of a request that did not match its schema.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            CallError::Encode(err) => err.validation(),
            _ => None,
        }
    }

    /// The classified transport failure, if the call reached the transport.
    pub fn transport(&self) -> Option<&ClassifiedError> {
        match self {
            CallError::Transport(err) => Some(err),
            _ => None,
        }
    }
}
