//! RPC Gateway - JSON-RPC front for REST upstreams
//!
//! Translates JSON-RPC requests into REST calls:
//! - `ns_getBlock` becomes `GET <upstream>get_block`
//! - `params: [{"path": .., "method": .., ..}]` adds a path segment, overrides
//!   the verb and supplies query parameters
//! - the upstream status and body are returned verbatim

pub mod encoder;
pub mod error;
pub mod http_server;
pub mod params;
pub mod pipeline;
pub mod upstream;

pub use encoder::MethodEncoder;
pub use error::GatewayError;
pub use http_server::HttpGatewayServer;
pub use params::ParsedParams;
pub use pipeline::TranslationPipeline;
pub use upstream::{HttpUpstream, Upstream, UpstreamConfig};
