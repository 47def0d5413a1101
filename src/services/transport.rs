// src/services/transport.rs
use async_trait::async_trait;
use reqwest::{Client, header::CONTENT_TYPE};
use url::Url;

use crate::{
    error::ChatError,
    message::{ChatRequest, ChatResponse},
};

/// One request/response exchange with the remote chat service.
#[async_trait]
pub trait ChatTransport: Send + Sync + 'static {
    async fn send(&self, request: ChatRequest) -> Result<ChatResponse, ChatError>;
}

/// POSTs the request as JSON to a fixed endpoint. No retries and no timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Status(status));
        }

        let body = response.bytes().await?;
        ChatResponse::from_slice(&body)
    }
}
