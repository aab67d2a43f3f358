use clap::Parser;
use raw_http::server::Server;
use raw_http_demo::{Config, DemoHandler};
use tokio::signal;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = Config::parse();
    let server_config = match config.server_config() {
        Ok(server_config) => server_config,
        Err(e) => {
            error!(cause = %e, host = %config.host, port = config.port, "invalid server config");
            return;
        }
    };

    let server = match Server::serve(server_config, DemoHandler).await {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "error starting server");
            return;
        }
    };
    info!(local_addr = %server.local_addr(), "server started");

    shutdown_signal().await;

    match server.close().await {
        Ok(()) => info!("server gracefully stopped"),
        Err(e) => error!(cause = %e, "failed to stop server"),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(cause = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(cause = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
