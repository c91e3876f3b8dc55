//! The single error shape exposed to callers

use http::StatusCode;
use thiserror::Error;

use super::transport::TransportError;

/// Where a failure originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClassification {
    /// Network failure, timeout, or malformed response
    Transport,
    /// Non-2xx response (or an envelope with `success: false`)
    Server,
    Unknown,
}

impl ErrorClassification {
    /// Stable label for logs and metrics.
    pub fn label(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Server => "server",
            Self::Unknown => "unknown",
        }
    }
}

/// The original failure a [`NormalizedError`] was built from.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FailureCause {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("server responded with status {status}")]
    Status { status: StatusCode, body: String },

    #[error("server rejected the request: {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("{0}")]
    Other(String),
}

impl FailureCause {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } | Self::Rejected { status, .. } => Some(*status),
            Self::Transport(_) | Self::Other(_) => None,
        }
    }
}

/// A request failure with a human-readable message.
///
/// Immutable once built; this is the only error type request callers see.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct NormalizedError {
    message: String,
    classification: ErrorClassification,
    #[source]
    cause: FailureCause,
}

impl NormalizedError {
    pub fn new(
        message: impl Into<String>,
        classification: ErrorClassification,
        cause: FailureCause,
    ) -> Self {
        Self { message: message.into(), classification, cause }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn classification(&self) -> ErrorClassification {
        self.classification
    }

    pub fn cause(&self) -> &FailureCause {
        &self.cause
    }

    /// HTTP status of the failed response, when there was one.
    pub fn status(&self) -> Option<StatusCode> {
        self.cause.status()
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    pub fn label(&self) -> &'static str {
        self.classification.label()
    }
}
