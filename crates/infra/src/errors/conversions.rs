//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use shopwire_domain::{ShopwireError, TransportError};

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain transport error.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct InfraError(#[from] pub TransportError);

impl From<InfraError> for TransportError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoTransportError {
    fn into_transport(self) -> TransportError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TransportError */
/* -------------------------------------------------------------------------- */

impl IntoTransportError for HttpError {
    fn into_transport(self) -> TransportError {
        if self.is_timeout() {
            return TransportError::Timeout;
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return TransportError::Connect(describe(&self));
        }

        if self.is_builder() {
            return TransportError::InvalidRequest(describe(&self));
        }

        if self.is_body() || self.is_decode() {
            return TransportError::Body(describe(&self));
        }

        TransportError::Request(describe(&self))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_transport())
    }
}

/// reqwest's top-level message is generic; the useful part is the source chain.
fn describe(err: &HttpError) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/* -------------------------------------------------------------------------- */
/* url::ParseError → TransportError */
/* -------------------------------------------------------------------------- */

impl From<url::ParseError> for InfraError {
    fn from(value: url::ParseError) -> Self {
        InfraError(TransportError::InvalidRequest(format!("invalid URL: {value}")))
    }
}

/// Configuration-time failures of the HTTP stack.
pub(crate) fn config_error(context: &str, err: impl std::fmt::Display) -> ShopwireError {
    ShopwireError::Config(format!("{context}: {err}"))
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
