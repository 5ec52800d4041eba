//! Error types for the ProxyPay client.
//!
//! Failures fall into distinct classes that callers must be able to tell
//! apart:
//!
//! - [`ProxyPayError::Transport`]: the request never produced an HTTP response
//!   (DNS, connect, TLS, timeout, broken body).
//! - [`ProxyPayError::Processing`]: the server answered outside `2xx`.
//! - [`ProxyPayError::InvalidArgument`]: a payment reference could not be
//!   built, detected before any write request is sent.

use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

use http::StatusCode;

/// Broad classification of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// Connection could not be established (DNS, refused, TLS handshake).
    Connect,
    /// Connect or overall request timeout elapsed.
    Timeout,
    /// The request could not be built or sent.
    Request,
    /// The response body could not be read.
    Body,
    /// Any other transport failure.
    Other,
}

impl TransportErrorKind {
    /// Returns a stable machine-readable code for this kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Timeout => "timeout",
            Self::Request => "request",
            Self::Body => "body",
            Self::Other => "other",
        }
    }

    fn classify(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect
        } else if err.is_body() || err.is_decode() {
            Self::Body
        } else if err.is_request() || err.is_builder() {
            Self::Request
        } else {
            Self::Other
        }
    }
}

impl Display for TransportErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A request that failed before an HTTP response was obtained.
///
/// Displays as `Error: <code>: <message>`.
#[derive(Debug, thiserror::Error)]
#[error("Error: {kind}: {message}")]
pub struct TransportError {
    /// Failure classification.
    kind: TransportErrorKind,
    /// Human-readable context (e.g. `"PUT /references"`).
    context: &'static str,
    /// Full message, including the chain of underlying causes.
    message: String,
    /// The underlying reqwest error.
    #[source]
    source: reqwest::Error,
}

impl TransportError {
    pub(crate) fn new(context: &'static str, source: reqwest::Error) -> Self {
        let mut message = format!("{context}: {source}");
        let mut cause = source.source();
        while let Some(err) = cause {
            message.push_str(": ");
            message.push_str(&err.to_string());
            cause = err.source();
        }
        Self {
            kind: TransportErrorKind::classify(&source),
            context,
            message,
            source,
        }
    }

    /// Returns the failure classification.
    #[must_use]
    pub const fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    /// Returns the stable error code of the failure classification.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Returns the request context the failure happened in.
    #[must_use]
    pub const fn context(&self) -> &'static str {
        self.context
    }

    /// Returns the descriptive error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors returned by [`ProxyPayClient`](crate::ProxyPayClient) operations.
#[derive(Debug, thiserror::Error)]
pub enum ProxyPayError {
    /// The request did not reach the server or no response was received.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered with a status outside `200..=299`.
    #[error("Error processing request: {context}: HTTP {status}")]
    Processing {
        /// Human-readable context.
        context: &'static str,
        /// The HTTP status code.
        status: StatusCode,
        /// The response body, empty if it could not be read.
        body: String,
    },

    /// A payment reference could not be built from the given input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The client configuration is unusable.
    #[error("invalid configuration: {context}: {message}")]
    Config {
        /// Human-readable context.
        context: &'static str,
        /// What was wrong.
        message: String,
    },

    /// A JSON response body could not be decoded.
    #[error("Failed to deserialize JSON: {context}: {source}")]
    JsonDeserialization {
        /// Human-readable context.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
}

impl ProxyPayError {
    /// Returns `true` for failures that happened before any HTTP response.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` when the server answered with a non-`2xx` status.
    #[must_use]
    pub const fn is_processing(&self) -> bool {
        matches!(self, Self::Processing { .. })
    }

    /// Returns `true` when input validation failed before any write.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Returns the HTTP status for [`ProxyPayError::Processing`] errors.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Processing { status, .. } => Some(*status),
            _ => None,
        }
    }
}
