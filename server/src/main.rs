#![cfg_attr(test, allow(clippy::disallowed_methods))]
// Forbid unwrap() in production code to prevent panics from bad input.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
use mailer::{EmailStore, config::ServerConfig, rest, rpc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailer=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment variables
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!("using db '{}'", config.database_path.display());

    let store = match EmailStore::open(&config.database_path, config.max_connections).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open database: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = store.create_schema().await {
        tracing::error!("Failed to create schema: {e}");
        std::process::exit(1);
    }

    // Both front-ends share the one pool. A front-end that cannot bind
    // cannot serve, so either failing ends the process.
    let rest_server = tokio::spawn({
        let store = store.clone();
        let addr = config.json_bind_addr;
        async move {
            tracing::info!("starting REST server ...");
            if let Err(e) = rest::serve(store, addr).await {
                tracing::error!("REST server error: {e}");
                std::process::exit(1);
            }
        }
    });

    let rpc_server = tokio::spawn({
        let addr = config.rpc_bind_addr;
        async move {
            tracing::info!("starting RPC server ...");
            if let Err(e) = rpc::serve(store, addr).await {
                tracing::error!("RPC server error: {e}");
                std::process::exit(1);
            }
        }
    });

    let (rest_result, rpc_result) = futures::future::join(rest_server, rpc_server).await;
    for result in [rest_result, rpc_result] {
        if let Err(e) = result {
            tracing::error!("server task failed: {e}");
            std::process::exit(1);
        }
    }
}
