//! Client side of `POST /api/generate`.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::models::generation::{GenerateRequest, FIT_SCORE_HEADER};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response stream failed: {0}")]
    Stream(String),
}

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// Response head plus the still-open body.
pub struct GenerationResponse {
    /// Raw `x-fit-score` header value, if the server sent one.
    pub fit_score_header: Option<String>,
    pub body: ByteStream,
}

#[async_trait]
pub trait GenerationTransport: Send + Sync {
    /// Sends the request and returns once response headers are available.
    async fn submit(&self, request: &GenerateRequest) -> Result<GenerationResponse, TransportError>;
}

/// Talks to a covergen server over HTTP.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    url: String,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>) -> Result<Self, TransportError> {
        Ok(Self {
            client: Client::builder().build()?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl GenerationTransport for HttpTransport {
    async fn submit(&self, request: &GenerateRequest) -> Result<GenerationResponse, TransportError> {
        let response = self.client.post(&self.url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let fit_score_header = response
            .headers()
            .get(FIT_SCORE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        debug!("Generation response headers received (fit score: {fit_score_header:?})");

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(TransportError::from));

        Ok(GenerationResponse {
            fit_score_header,
            body: Box::pin(body),
        })
    }
}
