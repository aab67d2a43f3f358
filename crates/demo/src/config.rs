//! Command line and environment configuration shared by the demo binaries.
//!
//! ```bash
//! httpserver --port 8080
//! RAW_HTTP_HOST=0.0.0.0 RAW_HTTP_PORT=8080 httpserver
//! ```

use clap::Parser;
use raw_http::codec::DEFAULT_MAX_HEADER_BYTES;
use raw_http::connection::DEFAULT_READ_BUFFER_SIZE;
use raw_http::server::{ServerConfig, ServerError};

#[derive(Debug, Clone, Parser)]
#[command(version, about = "HTTP/1.1 over raw TCP")]
pub struct Config {
    /// Host/IP to listen on
    #[arg(long, default_value = "127.0.0.1", env = "RAW_HTTP_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 42069, env = "RAW_HTTP_PORT")]
    pub port: u16,

    /// Limit for the request line plus headers, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_HEADER_BYTES, env = "RAW_HTTP_MAX_HEADER_BYTES")]
    pub max_header_bytes: usize,

    /// Initial read buffer size, in bytes
    #[arg(long, default_value_t = DEFAULT_READ_BUFFER_SIZE, env = "RAW_HTTP_READ_BUFFER_SIZE")]
    pub read_buffer_size: usize,
}

impl Config {
    pub fn address(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }

    pub fn server_config(&self) -> Result<ServerConfig, ServerError> {
        ServerConfig::builder()
            .address(self.address())
            .max_header_bytes(self.max_header_bytes)
            .read_buffer_size(self.read_buffer_size)
            .build()
    }
}
