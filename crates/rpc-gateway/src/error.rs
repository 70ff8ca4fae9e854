//! Gateway Errors
//!
//! Every failure is scoped to the request that caused it and maps to an HTTP
//! status plus a JSON-RPC error code.

use crate::{params::ParamsError, upstream::DispatchError};
use axum::http::StatusCode;

/// JSON-RPC parse error
pub const PARSE_ERROR: i32 = -32700;
/// JSON-RPC invalid request
pub const INVALID_REQUEST: i32 = -32600;
/// JSON-RPC invalid params
pub const INVALID_PARAMS: i32 = -32602;
/// Upstream could not be reached or answered badly
pub const UPSTREAM_ERROR: i32 = -32000;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Invalid params: {0}")]
    Params(#[from] ParamsError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl GatewayError {
    /// HTTP status written back to the client
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Parse(_) | Self::InvalidRequest(_) | Self::Params(_) => StatusCode::BAD_REQUEST,
            Self::Dispatch(DispatchError::Build(_)) => StatusCode::BAD_REQUEST,
            Self::Dispatch(DispatchError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            Self::Dispatch(DispatchError::Network(_) | DispatchError::Body(_)) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    /// JSON-RPC error code
    pub fn code(&self) -> i32 {
        match self {
            Self::Parse(_) => PARSE_ERROR,
            Self::InvalidRequest(_) => INVALID_REQUEST,
            Self::Params(_) | Self::Dispatch(DispatchError::Build(_)) => INVALID_PARAMS,
            Self::Dispatch(_) => UPSTREAM_ERROR,
        }
    }
}
