//! Quipu scoring service binary.
//!
//! Wires configuration, logging, the store client, and the dispatcher
//! together and runs the HTTP server until Ctrl-C.

use quipu_server::{init_logging, AppConfig, Server};
use quipu_service::Dispatcher;
use quipu_store::{RedisBackend, RetryPolicy, Store};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    init_logging(&config.log)?;

    info!(
        addr = config.server.http_addr(),
        store = config.store.addr(),
        "starting quipu-server"
    );

    let backend = RedisBackend::new(&config.store);
    let store = Arc::new(Store::new(backend, RetryPolicy::from_config(&config.store)));
    let dispatcher = Arc::new(Dispatcher::new(store, config.auth.clone()));

    Server::new(config.server.clone(), dispatcher).run().await?;
    Ok(())
}
