//! Failure → [`NormalizedError`]

use shopwire_domain::constants::GENERIC_ERROR_MESSAGE;
use shopwire_domain::types::envelope::server_message;
use shopwire_domain::{ErrorClassification, FailureCause, NormalizedError};

/// Builds the single error shape callers see.
///
/// Message precedence: the server envelope's `message`, verbatim; otherwise
/// the transport-level description; otherwise a generic fallback.
#[derive(Debug, Clone)]
pub struct ErrorNormalizer {
    fallback: String,
}

impl Default for ErrorNormalizer {
    fn default() -> Self {
        Self { fallback: GENERIC_ERROR_MESSAGE.to_string() }
    }
}

impl ErrorNormalizer {
    /// Normalizer with a custom fallback message.
    pub fn with_fallback(fallback: impl Into<String>) -> Self {
        Self { fallback: fallback.into() }
    }

    /// Turn any pipeline failure into the caller-facing error. Never panics.
    pub fn normalize(&self, cause: FailureCause) -> NormalizedError {
        let (message, classification) = match &cause {
            FailureCause::Status { status, body } => {
                let message = server_message(body.as_bytes()).unwrap_or_else(|| {
                    format!("Request failed with status code {}", status.as_u16())
                });
                (message, ErrorClassification::Server)
            }
            FailureCause::Rejected { body, .. } => {
                let message =
                    server_message(body.as_bytes()).unwrap_or_else(|| self.fallback.clone());
                (message, ErrorClassification::Server)
            }
            FailureCause::Transport(e) => {
                (self.non_empty(e.to_string()), ErrorClassification::Transport)
            }
            FailureCause::Other(message) => {
                (self.non_empty(message.clone()), ErrorClassification::Unknown)
            }
        };

        NormalizedError::new(message, classification, cause)
    }

    fn non_empty(&self, message: String) -> String {
        if message.trim().is_empty() {
            self.fallback.clone()
        } else {
            message
        }
    }
}
