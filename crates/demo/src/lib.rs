//! Demo programs for `raw-http`.
//!
//! - `httpserver`: serves [`routes::DemoHandler`] until SIGINT/SIGTERM
//! - `tcplistener`: parses one request per connection and prints it

pub mod config;
pub mod listener;
pub mod routes;

pub use config::Config;
pub use listener::RequestSummary;
pub use routes::DemoHandler;
