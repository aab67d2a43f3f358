use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::connection::{ConnectionConfig, HttpConnection};
use crate::handler::Handler;
use crate::server::{ServerConfig, ServerError};

/// A running listener.
///
/// [`Server::serve`] binds the socket and spawns the accept loop; every
/// accepted connection is processed in its own task. Dropping the handle
/// leaves the loop running, call [`Server::close`] to stop it.
#[derive(Debug)]
pub struct Server {
    local_addr: SocketAddr,
    closed: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    accept_task: JoinHandle<()>,
}

impl Server {
    /// Binds to the configured address and starts accepting connections.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if no configured address can be bound.
    pub async fn serve<H>(config: ServerConfig, handler: H) -> Result<Self, ServerError>
    where
        H: Handler + Send + Sync + 'static,
    {
        let tcp_listener = match TcpListener::bind(config.address()).await {
            Ok(tcp_listener) => tcp_listener,
            Err(e) => {
                error!(cause = %e, "bind server error");
                return Err(ServerError::Bind { source: e });
            }
        };

        let local_addr = tcp_listener.local_addr()?;
        info!(%local_addr, "start listening");

        let closed = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(Notify::new());
        let accept_task = tokio::spawn(accept_loop(
            tcp_listener,
            Arc::new(handler),
            config.connection(),
            Arc::clone(&closed),
            Arc::clone(&shutdown),
        ));

        Ok(Self { local_addr, closed, shutdown, accept_task })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Stops accepting and waits for the accept loop to exit. Connections
    /// already accepted run to completion.
    pub async fn close(self) -> Result<(), ServerError> {
        self.closed.store(true, Ordering::Release);
        self.shutdown.notify_one();
        self.accept_task.await?;
        info!(local_addr = %self.local_addr, "server closed");
        Ok(())
    }
}

async fn accept_loop<H>(
    tcp_listener: TcpListener,
    handler: Arc<H>,
    config: ConnectionConfig,
    closed: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
) where
    H: Handler + Send + Sync + 'static,
{
    loop {
        let accepted = tokio::select! {
            biased;
            _ = shutdown.notified() => break,
            accepted = tcp_listener.accept() => accepted,
        };

        let (tcp_stream, remote_addr) = match accepted {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                if closed.load(Ordering::Acquire) {
                    break;
                }
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };

        let handler = Arc::clone(&handler);

        tokio::spawn(async move {
            let (reader, writer) = tcp_stream.into_split();
            let connection = HttpConnection::with_config(reader, writer, config);
            match connection.process(handler).await {
                Ok(()) => {
                    info!(%remote_addr, "finished process, connection shutdown");
                }
                Err(e) => {
                    error!(%remote_addr, cause = %e, "service has error, connection shutdown");
                }
            }
        });
    }
}
