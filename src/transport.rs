//! Request/response transport to the chat backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::protocol::{ChatReply, ChatRequest};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid server url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("reply was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("reply carried neither 'response' nor 'error'")]
    EmptyReply,
}

/// Posts a chat message and hands back the parsed reply.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, endpoint: &str, body: &ChatRequest) -> Result<ChatReply, TransportError>;
}

/// reqwest-backed transport rooted at the configured server URL.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: reqwest::Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let base_url = reqwest::Url::parse(base_url).map_err(|e| TransportError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        Self::new(&config.server_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &reqwest::Url {
        &self.base_url
    }

    /// `{server_url}{chat_path}`: the endpoint is appended to the base path,
    /// never resolved against it, so a prefixed base keeps its prefix.
    fn endpoint_url(&self, endpoint: &str) -> Result<reqwest::Url, TransportError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = endpoint.trim_start_matches('/');
        let url = format!("{base}/{path}");
        reqwest::Url::parse(&url).map_err(|e| TransportError::InvalidUrl {
            url,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, endpoint: &str, body: &ChatRequest) -> Result<ChatReply, TransportError> {
        let url = self.endpoint_url(endpoint)?;
        debug!(%url, chars = body.message.chars().count(), "posting chat message");

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        // Application errors arrive as JSON under a 4xx/5xx status; decode
        // the body regardless.
        let status = response.status();
        let text = response.text().await?;
        info!(status = status.as_u16(), bytes = text.len(), "chat reply received");

        let reply: ChatReply = serde_json::from_str(&text)?;
        if reply.error.is_none() && reply.response.is_none() {
            return Err(TransportError::EmptyReply);
        }
        Ok(reply)
    }
}
