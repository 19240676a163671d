use std::{
    path::PathBuf,
    str::FromStr,
    sync::{Arc, Mutex},
};

use eventflow_account::RegisterInput;
use eventflow_shared::{ImageHost, State};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};

#[derive(Default)]
pub struct FakeImageHost {
    pub uploaded: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl ImageHost for FakeImageHost {
    async fn upload(&self, payload: &str) -> eventflow_shared::Result<String> {
        let url = format!("https://cdn.eventflow.localhost/{payload}.png");
        self.uploaded.lock().unwrap().push(url.to_owned());

        Ok(url)
    }
}

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<State> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);
    let write_db = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts.clone())
        .await?;
    let mut conn = write_db.acquire().await?;
    eventflow_db::migrate(&mut conn).await?;
    drop(conn);

    let read_db = SqlitePool::connect_with(opts).await?;

    Ok(State::new(read_db, write_db))
}

pub fn command(state: &State) -> eventflow_account::Command {
    command_with_host(state, Arc::default())
}

#[allow(dead_code)]
pub fn command_with_host(state: &State, host: Arc<FakeImageHost>) -> eventflow_account::Command {
    eventflow_account::Command::new(state.clone(), host)
}

#[allow(dead_code)]
pub fn register_input(name: &str, mobile_number: &str) -> RegisterInput {
    RegisterInput {
        full_name: name.to_uppercase(),
        email: format!("{name}@eventflow.localhost"),
        password: "my_password".to_owned(),
        mobile_number: mobile_number.to_owned(),
    }
}

#[allow(dead_code)]
pub async fn create_account(
    cmd: &eventflow_account::Command,
    name: &str,
    mobile_number: &str,
) -> anyhow::Result<String> {
    let account = cmd.register(register_input(name, mobile_number)).await?;

    Ok(account.id)
}
