//! RPC Gateway
//!
//! Serves a JSON-RPC endpoint and routes every call to a REST upstream.
//! The upstream base URL comes from `config.toml`.

use anyhow::{Context, Result};
use clap::Parser;
use rpc_gateway::{HttpGatewayServer, HttpUpstream, MethodEncoder, TranslationPipeline};
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;

use config::GatewayConfig;

/// JSON-RPC to REST gateway
#[derive(Parser, Debug)]
#[command(name = "rpc-gateway")]
#[command(about = "Route JSON-RPC requests to a REST-only upstream", long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Upstream base URL (overrides the config file)
    #[arg(long)]
    upstream: Option<String>,

    /// HTTP bind address (overrides the config file)
    #[arg(long)]
    listen: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config(&args)?;

    let upstream = HttpUpstream::new(&config.upstream_config())
        .context("unable to build upstream HTTP client")?;
    let pipeline = TranslationPipeline::new(
        MethodEncoder::new(config.upstream.as_str()),
        Arc::new(upstream),
    );

    HttpGatewayServer::new(Arc::new(pipeline))
        .run(&config.listen_addr, shutdown_signal())
        .await?;

    tracing::info!("Gateway stopped");
    Ok(())
}

/// Config file with command-line overrides applied
fn load_config(args: &Args) -> Result<GatewayConfig> {
    let mut config = match &args.upstream {
        // A full override needs no config file
        Some(upstream) if !args.config.exists() => {
            GatewayConfig::with_upstream(upstream.as_str())
        }
        _ => GatewayConfig::load(&args.config)?,
    };

    if let Some(upstream) = &args.upstream {
        config.upstream = upstream.clone();
    }
    if let Some(listen) = &args.listen {
        config.listen_addr = listen.clone();
    }

    config.validate()?;
    Ok(config)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down...");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_flag_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config.toml");
        let args = Args::try_parse_from([
            "rpc-gateway",
            "--config",
            missing.to_str().unwrap(),
            "--upstream",
            "http://localhost:3000/",
            "--listen",
            "127.0.0.1:9999",
        ])
        .unwrap();

        let config = load_config(&args).unwrap();
        assert_eq!(config.upstream, "http://localhost:3000/");
        assert_eq!(config.listen_addr, "127.0.0.1:9999");
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config.toml");
        let args =
            Args::try_parse_from(["rpc-gateway", "--config", missing.to_str().unwrap()]).unwrap();

        assert!(load_config(&args).is_err());
    }

    #[test]
    fn test_invalid_upstream_override_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "upstream = \"https://api.example.com/\"\n").unwrap();

        let args = Args::try_parse_from([
            "rpc-gateway",
            "--config",
            path.to_str().unwrap(),
            "--upstream",
            "not-a-url",
        ])
        .unwrap();

        assert!(load_config(&args).is_err());
    }
}
