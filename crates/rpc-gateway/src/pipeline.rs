//! Translation Pipeline
//!
//! decode -> encode method -> extract params -> dispatch -> pass through.

use crate::{
    encoder::MethodEncoder,
    error::GatewayError,
    params::ParsedParams,
    upstream::{Upstream, UpstreamCall, UpstreamResult},
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Verb used when params carry no override
pub const DEFAULT_VERB: &str = "GET";

/// Inbound JSON-RPC request
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub params: Option<Value>,
}

/// Translates JSON-RPC requests into REST calls
#[derive(Clone)]
pub struct TranslationPipeline {
    encoder: MethodEncoder,
    upstream: Arc<dyn Upstream>,
}

impl TranslationPipeline {
    pub fn new(encoder: MethodEncoder, upstream: Arc<dyn Upstream>) -> Self {
        Self { encoder, upstream }
    }

    /// Upstream base URL requests are routed to
    pub fn base_url(&self) -> &str {
        self.encoder.base_url()
    }

    /// Decode a raw request body into a JSON-RPC request.
    ///
    /// The body must be a JSON object; arrays are not read positionally.
    pub fn decode(&self, body: &[u8]) -> Result<JsonRpcRequest, GatewayError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| GatewayError::Parse(e.to_string()))?;
        if !value.is_object() {
            return Err(GatewayError::InvalidRequest(
                "request must be a JSON object".to_string(),
            ));
        }

        let request: JsonRpcRequest = serde_json::from_value(value)
            .map_err(|e| GatewayError::InvalidRequest(e.to_string()))?;

        if request.method.is_empty() {
            return Err(GatewayError::InvalidRequest("method must not be empty".to_string()));
        }

        Ok(request)
    }

    /// Resolve the upstream verb and URI for a request
    pub fn translate(&self, request: &JsonRpcRequest) -> Result<UpstreamCall, GatewayError> {
        let params = ParsedParams::extract(request.params.as_ref())?;

        let mut uri = self.encoder.encode(&request.method);
        if let Some(suffix) = &params.path_suffix {
            uri.push('/');
            uri.push_str(suffix);
        }
        if let Some(query) = params.query_string() {
            uri.push('?');
            uri.push_str(&query);
        }

        let verb = params
            .verb_override
            .unwrap_or_else(|| DEFAULT_VERB.to_string());

        Ok(UpstreamCall { verb, uri })
    }

    /// Translate a decoded request and dispatch it upstream
    pub async fn forward(&self, request: &JsonRpcRequest) -> Result<UpstreamResult, GatewayError> {
        tracing::debug!("Translating RPC method: {}", request.method);
        let call = self.translate(request)?;

        let result = self.upstream.dispatch(&call).await?;
        tracing::info!("{} {} -> {}", call.verb, call.uri, result.status);

        Ok(result)
    }

    /// Run the whole pipeline on a raw request body
    pub async fn handle(&self, body: &[u8]) -> Result<UpstreamResult, GatewayError> {
        let request = self.decode(body)?;
        self.forward(&request).await
    }
}
