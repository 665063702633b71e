//! `tweetd` binary: parse config, install logging, open the store, serve,
//! then close the store once the server has drained.
//!
//! ```text
//! RUST_LOG=info tweetd --listen 127.0.0.1:5000
//! TWEETD_DATABASE_URL=postgres://postgres@localhost/tweet tweetd --store postgres
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tweetd::api::{self, AppState};
use tweetd::config::{Config, StoreKind};
use tweetd::store::{MemoryStore, PostgresStore, SharedStore};
use tweetd::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(config.log_json);
    config.validate()?;

    let store = open_store(&config).await.context("failed to open store")?;
    let app = api::routes(AppState::new(Arc::clone(&store)));

    let served = async {
        Server::bind(config.listen).await?.serve(app).await
    }
    .await;

    store.close().await;
    served.context("server failed")?;
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn open_store(config: &Config) -> Result<SharedStore, tweetd::Error> {
    let store: SharedStore = match config.store {
        StoreKind::Memory => Arc::new(MemoryStore::new()),
        StoreKind::Postgres => {
            let url = config.database_url.as_deref()
                .ok_or_else(|| tweetd::Error::Config("database url not set".to_owned()))?;
            Arc::new(PostgresStore::connect(url, config.max_connections).await?)
        }
    };
    info!(store = ?config.store, "store opened");
    Ok(store)
}
