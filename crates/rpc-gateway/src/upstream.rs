//! Upstream Dispatcher
//!
//! Issues the translated call against the REST upstream and hands back the
//! raw status and body. One pooled `reqwest` client is shared by every
//! request. No retry is attempted and, unless configured, no deadline is
//! applied, so a hung upstream holds its request open.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Method, Url};
use std::time::Duration;

/// Fully resolved upstream target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamCall {
    pub verb: String,
    pub uri: String,
}

/// Upstream reply, passed back to the client untouched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResult {
    pub status: u16,
    pub body: Bytes,
}

/// Something that can carry out an upstream call
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn dispatch(&self, call: &UpstreamCall) -> Result<UpstreamResult, DispatchError>;
}

/// Upstream client settings
#[derive(Debug, Clone, Default)]
pub struct UpstreamConfig {
    /// TCP + TLS handshake deadline
    pub connect_timeout: Option<Duration>,
    /// Whole request deadline, body included
    pub request_timeout: Option<Duration>,
}

/// HTTP upstream backed by a shared connection pool
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
}

impl HttpUpstream {
    /// Build the pooled client
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn dispatch(&self, call: &UpstreamCall) -> Result<UpstreamResult, DispatchError> {
        let method = Method::from_bytes(call.verb.as_bytes())
            .map_err(|e| DispatchError::Build(format!("invalid verb {:?}: {}", call.verb, e)))?;
        let url = Url::parse(&call.uri)
            .map_err(|e| DispatchError::Build(format!("invalid uri {:?}: {}", call.uri, e)))?;

        let response = self
            .client
            .request(method, url)
            .send()
            .await
            .map_err(DispatchError::from_send)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(DispatchError::from_body)?;

        Ok(UpstreamResult { status, body })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("cannot build upstream request: {0}")]
    Build(String),
    #[error("upstream request failed: {0}")]
    Network(#[source] reqwest::Error),
    #[error("upstream timed out: {0}")]
    Timeout(#[source] reqwest::Error),
    #[error("failed to read upstream body: {0}")]
    Body(#[source] reqwest::Error),
}

impl DispatchError {
    fn from_send(e: reqwest::Error) -> Self {
        if e.is_builder() {
            Self::Build(e.to_string())
        } else if e.is_timeout() {
            Self::Timeout(e)
        } else {
            Self::Network(e)
        }
    }

    fn from_body(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e)
        } else {
            Self::Body(e)
        }
    }
}
