use std::sync::Arc;

use anyhow::Result;
use eventflow_shared::{SharedImageHost, State};
use sqlx::SqlitePool;

use crate::{config::Config, image::LocalImageHost};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub account_command: eventflow_account::Command,
    pub account_query: eventflow_account::Query,
    pub event_command: eventflow_event::Command,
    pub event_query: eventflow_event::Query,
    /// Read pool, used by the readiness probe.
    pub pool: SqlitePool,
}

impl AppState {
    pub fn new(config: Config, state: State, images: SharedImageHost) -> Self {
        Self {
            account_command: eventflow_account::Command::new(state.clone(), images.clone()),
            account_query: eventflow_account::Query(state.read_db.clone()),
            event_command: eventflow_event::Command::new(state.clone(), images),
            event_query: eventflow_event::Query(state.read_db.clone()),
            pool: state.read_db,
            config,
        }
    }

    /// Opens both pools, applies pending migrations and wires the commands
    /// with the local image host.
    pub async fn build(config: Config) -> Result<Self> {
        // Write pool: 1 connection for all write operations
        let write_pool = crate::db::create_write_pool(&config.database.url).await?;
        crate::db::migrate(&write_pool).await?;

        // Read pool: Multiple connections for read-only queries
        let read_pool =
            crate::db::create_read_pool(&config.database.url, config.database.max_connections)
                .await?;

        let images: SharedImageHost = Arc::new(LocalImageHost::new(&config.images));

        Ok(Self::new(config, State::new(read_pool, write_pool), images))
    }

    pub async fn close(&self) {
        self.event_command.read_db.close().await;
        self.event_command.write_db.close().await;
    }
}
