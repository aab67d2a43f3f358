//! TCP listener that serves every accepted connection with a [`Handler`](crate::handler::Handler).
//!
//! # Example
//!
//! ```no_run
//! use raw_http::server::{Server, ServerConfig};
//! # use raw_http::connection::ResponseWriter;
//! # use raw_http::handler::{Handler, HandlerError};
//! # use raw_http::protocol::Request;
//! # use tokio::io::AsyncWrite;
//! # struct NotFound;
//! # #[async_trait::async_trait]
//! # impl Handler for NotFound {
//! #     async fn call<W>(&self, _: &mut ResponseWriter<W>, _: &Request) -> Result<(), HandlerError>
//! #     where
//! #         W: AsyncWrite + Unpin + Send,
//! #     {
//! #         Err(HandlerError::new(http::StatusCode::NOT_FOUND, "nothing here"))
//! #     }
//! # }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::builder().address("127.0.0.1:42069").build()?;
//! let server = Server::serve(config, NotFound).await?;
//!
//! tokio::signal::ctrl_c().await?;
//! server.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! Connections are not capped and have no idle timeout.

mod config;
mod error;
mod tcp_server;

pub use config::{ServerConfig, ServerConfigBuilder};
pub use error::ServerError;
pub use tcp_server::Server;
