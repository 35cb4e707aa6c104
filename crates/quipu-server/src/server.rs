//! HTTP server lifecycle.
//!
//! Binds the listener, serves each connection on its own task, and
//! drains on shutdown. The accept loop stops on Ctrl-C (or whatever
//! future [`Server::run_until`] is given) and waits up to the
//! configured shutdown timeout for in-flight connections.

use crate::config::ServerConfig;
use crate::service::handle;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use quipu_service::Dispatcher;
use quipu_store::StoreBackend;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Errors raised by the server lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not bind its address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The address that could not be bound.
        addr: String,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// Accepting a connection failed.
    #[error("accept failed: {0}")]
    Accept(#[from] std::io::Error),
}

/// The HTTP server.
pub struct Server<B> {
    config: ServerConfig,
    dispatcher: Arc<Dispatcher<B>>,
}

impl<B> Server<B>
where
    B: StoreBackend + 'static,
{
    /// Creates a server over the given dispatcher.
    #[must_use]
    pub fn new(config: ServerConfig, dispatcher: Arc<Dispatcher<B>>) -> Self {
        Self { config, dispatcher }
    }

    /// Runs the server until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] if the listener cannot bind or accepting
    /// connections fails.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!(error = %err, "failed to listen for shutdown signal");
            }
        })
        .await
    }

    /// Runs the server until the given future completes.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] if the listener cannot bind or accepting
    /// connections fails.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        let addr = self.config.http_addr().to_string();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        info!(addr, "server listening");

        let mut connections = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("shutdown requested");
                    break;
                }
                accepted = listener.accept() => {
                    let (stream, peer) = accepted?;
                    debug!(%peer, "connection accepted");
                    let dispatcher = Arc::clone(&self.dispatcher);
                    connections.spawn(async move {
                        let io = TokioIo::new(stream);
                        let service = service_fn(move |req| handle(Arc::clone(&dispatcher), req));
                        if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                            debug!(%peer, error = %err, "connection error");
                        }
                    });
                }
            }
        }

        // Stop accepting, then give in-flight connections a bounded
        // window to finish.
        drop(listener);
        let drain = async {
            while connections.join_next().await.is_some() {}
        };
        if tokio::time::timeout(self.config.shutdown_timeout(), drain)
            .await
            .is_err()
        {
            warn!(
                timeout_secs = self.config.shutdown_timeout().as_secs(),
                "shutdown timeout reached, aborting remaining connections"
            );
            connections.abort_all();
        }
        info!("server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quipu_service::AuthConfig;
    use quipu_store::{MemoryBackend, RetryPolicy, Store};
    use std::time::Duration;

    fn server(addr: &str) -> Server<MemoryBackend> {
        let store = Arc::new(Store::new(
            MemoryBackend::new(),
            RetryPolicy {
                attempts: 1,
                delay: Duration::ZERO,
            },
        ));
        let dispatcher = Arc::new(Dispatcher::new(store, AuthConfig::default()));
        let config = ServerConfig::builder()
            .http_addr(addr)
            .shutdown_timeout(Duration::from_millis(100))
            .build();
        Server::new(config, dispatcher)
    }

    #[tokio::test]
    async fn test_run_until_stops_on_shutdown() {
        // Port 0 lets the OS pick a free port; the server should come
        // up and wind down cleanly.
        let result = server("127.0.0.1:0")
            .run_until(tokio::time::sleep(Duration::from_millis(20)))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unbindable_address_is_reported() {
        let result = server("256.0.0.1:0").run_until(std::future::pending()).await;
        assert!(matches!(result, Err(ServerError::Bind { .. })));
    }
}
