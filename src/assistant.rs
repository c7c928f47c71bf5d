//! Remote assistant service client
//!
//! Three single request/response operations against the assistant service.
//! Clients never retry or cache; the session decides what happens next.

mod config;
mod error;
mod http;

pub use config::{AssistantConfig, ConfigError, DEFAULT_BASE_URL};
pub use error::{AssistantError, AssistantErrorKind};
pub use http::HttpAssistantClient;

use crate::transcript::MessageText;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Common interface for assistant backends
#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Open a conversation and return the assistant's greeting
    async fn start(&self) -> Result<MessageText, AssistantError>;

    /// Send one user message and return the assistant's reply
    async fn send(&self, text: &MessageText) -> Result<MessageText, AssistantError>;

    /// Ask the service to forget the conversation so far
    async fn clear(&self) -> Result<(), AssistantError>;
}

#[async_trait]
impl<T: AssistantClient + ?Sized> AssistantClient for Arc<T> {
    async fn start(&self) -> Result<MessageText, AssistantError> {
        (**self).start().await
    }

    async fn send(&self, text: &MessageText) -> Result<MessageText, AssistantError> {
        (**self).send(text).await
    }

    async fn clear(&self) -> Result<(), AssistantError> {
        (**self).clear().await
    }
}

/// Logging wrapper for assistant clients
pub struct LoggingClient<C> {
    inner: C,
}

impl<C: AssistantClient> LoggingClient<C> {
    #[must_use]
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    #[must_use]
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

fn log_outcome<T>(operation: &'static str, started: Instant, result: &Result<T, AssistantError>) {
    let duration_ms = started.elapsed().as_millis();
    match result {
        Ok(_) => {
            tracing::info!(operation, duration_ms = %duration_ms, "Assistant request completed");
        }
        Err(e) => {
            tracing::error!(
                operation,
                duration_ms = %duration_ms,
                kind = e.kind.as_str(),
                error = %e.message,
                "Assistant request failed"
            );
        }
    }
}

#[async_trait]
impl<C: AssistantClient> AssistantClient for LoggingClient<C> {
    async fn start(&self) -> Result<MessageText, AssistantError> {
        let started = Instant::now();
        let result = self.inner.start().await;
        log_outcome("start", started, &result);
        result
    }

    async fn send(&self, text: &MessageText) -> Result<MessageText, AssistantError> {
        let started = Instant::now();
        let result = self.inner.send(text).await;
        log_outcome("send", started, &result);
        result
    }

    async fn clear(&self) -> Result<(), AssistantError> {
        let started = Instant::now();
        let result = self.inner.clear().await;
        log_outcome("clear", started, &result);
        result
    }
}
