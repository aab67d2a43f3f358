use crate::codec::DEFAULT_MAX_HEADER_BYTES;
use crate::connection::DEFAULT_READ_BUFFER_SIZE;

/// Per-connection limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionConfig {
    max_header_bytes: usize,
    read_buffer_size: usize,
}

impl ConnectionConfig {
    pub fn new(max_header_bytes: usize, read_buffer_size: usize) -> Self {
        Self { max_header_bytes, read_buffer_size }
    }

    /// Limit for the request line plus the header section.
    pub fn max_header_bytes(&self) -> usize {
        self.max_header_bytes
    }

    /// Initial capacity of the read buffer.
    pub fn read_buffer_size(&self) -> usize {
        self.read_buffer_size
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HEADER_BYTES, DEFAULT_READ_BUFFER_SIZE)
    }
}
