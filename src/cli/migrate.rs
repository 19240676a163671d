use anyhow::Result;

use crate::config::Config;

pub async fn migrate(config: Config) -> Result<()> {
    tracing::info!(url = %config.database.url, "Running migrations...");

    let write_pool = crate::db::create_write_pool(&config.database.url).await?;
    crate::db::migrate(&write_pool).await?;
    write_pool.close().await;

    tracing::info!("Migrations applied");

    Ok(())
}
