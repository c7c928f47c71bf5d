//! HTTP implementation of the assistant client

use super::{AssistantClient, AssistantConfig, AssistantError};
use crate::transcript::MessageText;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct StartConversationResponse {
    message: String,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    response: String,
}

/// Talks to the assistant service over JSON/HTTP
pub struct HttpAssistantClient {
    client: Client,
    config: AssistantConfig,
}

impl HttpAssistantClient {
    /// # Errors
    ///
    /// Fails when the underlying HTTP client cannot be built, for example
    /// when no TLS backend is available.
    pub fn new(config: AssistantConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn post(
        &self,
        path: &str,
        body: Option<&SendMessageRequest<'_>>,
    ) -> Result<reqwest::Response, AssistantError> {
        let mut request = self.client.post(self.config.endpoint(path));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AssistantError::from_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssistantError::from_status(status));
        }
        Ok(response)
    }

    /// Read the whole body, then decode it. A body that stops arriving is a
    /// network failure; one that arrives but does not parse is a protocol one.
    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&SendMessageRequest<'_>>,
    ) -> Result<T, AssistantError> {
        let bytes = self
            .post(path, body)
            .await?
            .bytes()
            .await
            .map_err(|e| AssistantError::from_transport(&e))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| AssistantError::protocol(format!("Malformed response body: {e}")))
    }
}

fn require_text(text: String, field: &str) -> Result<MessageText, AssistantError> {
    MessageText::new(text)
        .ok_or_else(|| AssistantError::protocol(format!("Response field `{field}` is empty")))
}

#[async_trait]
impl AssistantClient for HttpAssistantClient {
    async fn start(&self) -> Result<MessageText, AssistantError> {
        let body: StartConversationResponse = self.post_json("start-conversation", None).await?;
        require_text(body.message, "message")
    }

    async fn send(&self, text: &MessageText) -> Result<MessageText, AssistantError> {
        let request = SendMessageRequest {
            message: text.as_str(),
        };
        let body: SendMessageResponse = self.post_json("send-message", Some(&request)).await?;
        require_text(body.response, "response")
    }

    async fn clear(&self) -> Result<(), AssistantError> {
        self.post("clear-memory", None).await?;
        Ok(())
    }
}
