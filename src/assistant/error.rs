//! Assistant client error types

use thiserror::Error;

/// Failure of a single exchange with the assistant service
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct AssistantError {
    pub kind: AssistantErrorKind,
    pub message: String,
}

impl AssistantError {
    #[must_use]
    pub fn new(kind: AssistantErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::Network, message)
    }

    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::Protocol, message)
    }

    /// A reqwest failure while sending or reading bytes. Timeouts land here
    /// too, including ones that fire halfway through the body.
    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        Self::network(format!("Request failed: {err}"))
    }

    /// Classify a non-success HTTP status
    #[must_use]
    pub(crate) fn from_status(status: reqwest::StatusCode) -> Self {
        if status.is_server_error() {
            Self::network(format!("Assistant service unavailable (HTTP {status})"))
        } else {
            Self::protocol(format!("Unexpected HTTP status {status}"))
        }
    }
}

/// Error classification surfaced to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistantErrorKind {
    /// Transport or connectivity failure, including 5xx from the service
    Network,
    /// Response arrived but did not have the expected shape
    Protocol,
}

impl AssistantErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Protocol => "protocol",
        }
    }
}
