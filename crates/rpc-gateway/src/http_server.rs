//! HTTP Gateway Server
//!
//! Accepts JSON-RPC POSTs on any path and writes back the upstream reply
//! verbatim. Failures become JSON-RPC error responses.

use crate::{error::GatewayError, pipeline::TranslationPipeline, upstream::UpstreamResult};
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::{future::Future, sync::Arc};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// JSON-RPC error response
#[derive(Debug, Serialize)]
pub struct JsonRpcErrorResponse {
    pub jsonrpc: String,
    pub id: Value,
    pub error: JsonRpcError,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

/// HTTP Gateway Server
pub struct HttpGatewayServer {
    pipeline: Arc<TranslationPipeline>,
}

impl HttpGatewayServer {
    pub fn new(pipeline: Arc<TranslationPipeline>) -> Self {
        Self { pipeline }
    }

    /// Create the Axum router
    pub fn router(self) -> Router {
        // CORS layer to allow browser clients
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

        Router::new()
            .route("/", post(handle_rpc))
            .route("/*path", post(handle_rpc))
            .layer(cors)
            .with_state(self.pipeline)
    }

    /// Bind `addr` and serve until `shutdown` resolves
    pub async fn run<F>(self, addr: &str, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!(
            "Listening on {} - routing to: {}",
            listener.local_addr()?,
            self.pipeline.base_url()
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

/// Handle a JSON-RPC request
async fn handle_rpc(State(pipeline): State<Arc<TranslationPipeline>>, body: Bytes) -> Response {
    let request = match pipeline.decode(&body) {
        Ok(request) => request,
        Err(e) => return error_response(Value::Null, e),
    };

    match pipeline.forward(&request).await {
        Ok(result) => passthrough(result),
        Err(e) => error_response(request.id, e),
    }
}

/// Upstream status and body, no headers added
fn passthrough(result: UpstreamResult) -> Response {
    let mut response = Response::new(Body::from(result.body));
    *response.status_mut() = StatusCode::from_u16(result.status).unwrap_or(StatusCode::BAD_GATEWAY);
    response
}

fn error_response(id: Value, error: GatewayError) -> Response {
    tracing::warn!("Request failed: {}", error);

    let body = JsonRpcErrorResponse {
        jsonrpc: "2.0".to_string(),
        id,
        error: JsonRpcError {
            code: error.code(),
            message: error.to_string(),
        },
    };

    (error.status(), Json(body)).into_response()
}
