use std::{
    path::PathBuf,
    str::FromStr,
    sync::{Arc, Mutex},
};

use eventflow_db::account;
use eventflow_event::CreateInput;
use eventflow_shared::{Error, ImageHost, State};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};

#[derive(Default)]
pub struct FakeImageHost {
    pub uploaded: Mutex<Vec<String>>,
    pub discarded: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl ImageHost for FakeImageHost {
    async fn upload(&self, payload: &str) -> eventflow_shared::Result<String> {
        if payload == "broken" {
            return Err(Error::UploadFailed("cdn unavailable".to_owned()));
        }

        let url = format!("https://cdn.eventflow.localhost/{payload}.png");
        self.uploaded.lock().unwrap().push(url.to_owned());

        Ok(url)
    }

    async fn discard(&self, url: &str) -> eventflow_shared::Result<()> {
        self.discarded.lock().unwrap().push(url.to_owned());

        Ok(())
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

pub fn command(state: &State) -> eventflow_event::Command {
    command_with_host(state, Arc::default())
}

#[allow(dead_code)]
pub fn command_with_host(state: &State, host: Arc<FakeImageHost>) -> eventflow_event::Command {
    eventflow_event::Command::new(state.clone(), host)
}

#[allow(dead_code)]
pub async fn create_account(state: &State, name: &str, mobile_number: &str) -> anyhow::Result<String> {
    let mut conn = state.write_db.acquire().await?;
    account::create(
        &mut conn,
        account::CreateInput {
            id: name.to_owned(),
            full_name: name.to_uppercase(),
            email: format!("{name}@eventflow.localhost"),
            password_hash: "hash".to_owned(),
            mobile_number: mobile_number.to_owned(),
            profile_picture_url: "https://cdn.eventflow.localhost/blank.png".to_owned(),
        },
    )
    .await?;

    Ok(name.to_owned())
}

#[allow(dead_code)]
pub fn create_input(title: &str) -> CreateInput {
    CreateInput {
        title: title.to_owned(),
        description: "Monthly meetup".to_owned(),
        location: "Pune".to_owned(),
        date: "2100-01-01".to_owned(),
        time: "10:00 AM".to_owned(),
        image: "image".to_owned(),
        banner1: "banner1".to_owned(),
        banner2: "banner2".to_owned(),
        max_attendees: None,
    }
}

#[allow(dead_code)]
pub async fn find_account(state: &State, id: &str) -> anyhow::Result<Option<account::AccountDoc>> {
    let mut conn = state.read_db.acquire().await?;

    Ok(account::find(&mut conn, account::FindType::Id(id.to_owned())).await?)
}

#[allow(dead_code)]
pub async fn move_event_to(state: &State, id: &str, starts_at: i64) -> anyhow::Result<()> {
    let mut conn = state.write_db.acquire().await?;
    eventflow_db::event::update(
        &mut conn,
        eventflow_db::event::UpdateInput {
            id: id.to_owned(),
            starts_at: Some(starts_at),
            ..Default::default()
        },
    )
    .await?;

    Ok(())
}
