use std::io;
use std::net::{SocketAddr, ToSocketAddrs};

use crate::codec::DEFAULT_MAX_HEADER_BYTES;
use crate::connection::{ConnectionConfig, DEFAULT_READ_BUFFER_SIZE};
use crate::server::ServerError;

/// Where to listen and which limits every accepted connection gets.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    address: Vec<SocketAddr>,
    connection: ConnectionConfig,
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::new()
    }

    pub fn address(&self) -> &[SocketAddr] {
        &self.address
    }

    pub fn connection(&self) -> ConnectionConfig {
        self.connection
    }
}

#[derive(Debug)]
pub struct ServerConfigBuilder {
    address: Option<io::Result<Vec<SocketAddr>>>,
    max_header_bytes: usize,
    read_buffer_size: usize,
}

impl ServerConfigBuilder {
    fn new() -> Self {
        Self { address: None, max_header_bytes: DEFAULT_MAX_HEADER_BYTES, read_buffer_size: DEFAULT_READ_BUFFER_SIZE }
    }

    /// Sets the listening address. Resolution happens here, a failure is
    /// reported by [`build`](Self::build).
    pub fn address<A: ToSocketAddrs>(mut self, address: A) -> Self {
        self.address = Some(address.to_socket_addrs().map(Iterator::collect));
        self
    }

    pub fn max_header_bytes(mut self, max_header_bytes: usize) -> Self {
        self.max_header_bytes = max_header_bytes;
        self
    }

    pub fn read_buffer_size(mut self, read_buffer_size: usize) -> Self {
        self.read_buffer_size = read_buffer_size;
        self
    }

    pub fn build(self) -> Result<ServerConfig, ServerError> {
        let address = self
            .address
            .ok_or(ServerError::MissingAddress)?
            .map_err(|source| ServerError::InvalidAddress { source })?;

        if address.is_empty() {
            return Err(ServerError::InvalidAddress {
                source: io::Error::new(io::ErrorKind::AddrNotAvailable, "address resolved to nothing"),
            });
        }

        Ok(ServerConfig { address, connection: ConnectionConfig::new(self.max_header_bytes, self.read_buffer_size) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServerConfig::builder().address("127.0.0.1:42069").build().unwrap();

        assert_eq!(config.address(), &["127.0.0.1:42069".parse::<SocketAddr>().unwrap()]);
        assert_eq!(config.connection(), ConnectionConfig::default());
        assert_eq!(config.connection().max_header_bytes(), 8 * 1024);
        assert_eq!(config.connection().read_buffer_size(), 1024);
    }

    #[test]
    fn custom_limits() {
        let config = ServerConfig::builder()
            .address(("127.0.0.1", 0))
            .max_header_bytes(512)
            .read_buffer_size(64)
            .build()
            .unwrap();

        assert_eq!(config.connection(), ConnectionConfig::new(512, 64));
    }

    #[test]
    fn missing_address() {
        let result = ServerConfig::builder().build();
        assert!(matches!(result, Err(ServerError::MissingAddress)));
    }

    #[test]
    fn invalid_address() {
        let result = ServerConfig::builder().address("not an address").build();
        assert!(matches!(result, Err(ServerError::InvalidAddress { .. })));
    }
}
