//! Web server

use crate::app::Service;
use crate::cli;

use std::io;
use std::path::PathBuf;
use std::{net::SocketAddr, time::Duration};

use axum::ServiceExt;
use axum_server::{tls_rustls::RustlsConfig, Handle};
use expanduser::expanduser;
use tokio::signal;
use tracing::{event, Level};

/// Resolve a TLS file path, expanding `~` and checking that it exists.
fn resolve_tls_file(path: &str, kind: &str) -> io::Result<PathBuf> {
    expanduser(path)?.canonicalize().map_err(|error| {
        io::Error::new(
            error.kind(),
            format!("TLS {} file expected at '{}': {}", kind, path, error),
        )
    })
}

/// Serve the scan report service
///
/// Returns when the server has shut down.
///
/// # Arguments
///
/// * `args`: Command line arguments
/// * `service`: The [crate::app::Service] to serve
pub async fn serve(args: &cli::CommandLineArgs, service: Service) -> io::Result<()> {
    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;

    // Catch ctrl+c and try to shutdown gracefully
    let handle = Handle::new();
    tokio::spawn(shutdown_signal(
        handle.clone(),
        args.graceful_shutdown_timeout,
    ));

    if args.https {
        let cert_file = resolve_tls_file(&args.cert_file, "certificate")?;
        let key_file = resolve_tls_file(&args.key_file, "key")?;
        let tls_config = RustlsConfig::from_pem_file(cert_file, key_file).await?;
        event!(Level::INFO, "listening on https://{}", addr);
        axum_server::bind_rustls(addr, tls_config)
            .handle(handle)
            .serve(service.into_make_service())
            .await
    } else {
        event!(Level::INFO, "listening on http://{}", addr);
        axum_server::bind(addr)
            .handle(handle)
            .serve(service.into_make_service())
            .await
    }
}

/// Graceful shutdown handler
///
/// Installs signal handlers to catch Ctrl-C or SIGTERM and trigger a graceful shutdown.
async fn shutdown_signal(handle: Handle, timeout: u64) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            event!(Level::ERROR, "failed to install Ctrl+C handler: {}", error);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                event!(Level::ERROR, "failed to install SIGTERM handler: {}", error);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    event!(Level::INFO, "signal received, starting graceful shutdown");
    // Force shutdown if graceful shutdown takes longer than the timeout
    handle.graceful_shutdown(Some(Duration::from_secs(timeout)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tls_file() {
        let error = resolve_tls_file("/nonexistent/cert.pem", "certificate").unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::NotFound);
        assert!(error
            .to_string()
            .contains("TLS certificate file expected at '/nonexistent/cert.pem'"));
    }
}
