//! Persistence layer: document tables, migrations and single-document
//! repositories for accounts and events.

use sqlx::SqliteConnection;
use sqlx_migrator::{Info, Migrate, Migrator, Plan};

pub mod account;
pub mod event;
mod m0001;
pub mod table;

pub fn migrator() -> Result<Migrator<sqlx::Sqlite>, sqlx_migrator::Error> {
    let mut migrator = Migrator::default();
    migrator.add_migrations(vec![Box::new(m0001::Migration)])?;

    Ok(migrator)
}

/// Applies every pending migration on the given connection.
pub async fn migrate(connection: &mut SqliteConnection) -> Result<(), sqlx_migrator::Error> {
    migrator()?.run(connection, &Plan::apply_all()).await?;

    Ok(())
}

/// Encodes an ordered id set for a JSON column.
pub(crate) fn encode_ids(ids: &[String]) -> eventflow_shared::Result<String> {
    Ok(serde_json::to_string(ids)?)
}
