use clap::Parser;
use raw_http::connection::read_request;
use raw_http_demo::{Config, RequestSummary};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = Config::parse();
    let tcp_listener = match TcpListener::bind(config.address()).await {
        Ok(tcp_listener) => tcp_listener,
        Err(e) => {
            error!(cause = %e, "bind listener error");
            return;
        }
    };
    info!(address = ?config.address(), "start listening");

    loop {
        let (mut tcp_stream, remote_addr) = match tcp_listener.accept().await {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };
        info!(%remote_addr, "connection accepted");

        match read_request(&mut tcp_stream).await {
            Ok(request) => print!("{}", RequestSummary(&request)),
            Err(e) => warn!(%remote_addr, cause = %e, "error parsing request"),
        }

        if let Err(e) = tcp_stream.shutdown().await {
            warn!(%remote_addr, cause = %e, "failed to close connection");
        }
    }
}
