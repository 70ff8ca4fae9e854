//! Gateway Configuration
//!
//! Read once from a TOML file at startup and never changed afterwards.
//!
//! ```toml
//! upstream = "https://api.example.com/"
//! listen_addr = "0.0.0.0:8080"
//! ```

use rpc_gateway::UpstreamConfig;
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};
use url::Url;

/// Gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL every translated path is appended to
    pub upstream: String,
    /// HTTP bind address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Upstream connect timeout in seconds (unset = client default)
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    /// Upstream request timeout in seconds (unset = no deadline)
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl GatewayConfig {
    /// Config with defaults for everything but the upstream
    pub fn with_upstream(upstream: impl Into<String>) -> Self {
        Self {
            upstream: upstream.into(),
            listen_addr: default_listen_addr(),
            connect_timeout_secs: None,
            request_timeout_secs: None,
        }
    }

    /// Read and parse a config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Check the upstream is an absolute http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.upstream)
            .map_err(|e| ConfigError::InvalidUpstream(format!("{:?}: {}", self.upstream, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUpstream(format!(
                "{:?}: unsupported scheme {}",
                self.upstream,
                url.scheme()
            )));
        }

        if !self.upstream.ends_with('/') {
            tracing::warn!(
                "Upstream {} has no trailing '/', method paths are appended directly",
                self.upstream
            );
        }

        Ok(())
    }

    /// Settings for the upstream HTTP client
    pub fn upstream_config(&self) -> UpstreamConfig {
        UpstreamConfig {
            connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unable to open {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to decode config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid upstream {0}")]
    InvalidUpstream(String),
}
