use std::{path::PathBuf, str::FromStr};

use eventflow_db::{account, event};
use eventflow_shared::State;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};

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
pub async fn create_event(
    state: &State,
    id: &str,
    creator_id: &str,
    max_attendees: i64,
) -> anyhow::Result<String> {
    let mut tx = state.write_db.begin().await?;
    event::create(
        &mut tx,
        event::CreateInput {
            id: id.to_owned(),
            title: "Meetup".to_owned(),
            description: "Monthly meetup".to_owned(),
            location: "Pune".to_owned(),
            starts_at: 4_102_444_800,
            time: "10:00 AM".to_owned(),
            image: "https://cdn.eventflow.localhost/i.png".to_owned(),
            banner_primary: "https://cdn.eventflow.localhost/b1.png".to_owned(),
            banner_secondary: "https://cdn.eventflow.localhost/b2.png".to_owned(),
            creator_id: creator_id.to_owned(),
            max_attendees,
        },
    )
    .await?;
    account::push_event_id(&mut tx, creator_id, account::EventList::Created, id).await?;
    tx.commit().await?;

    Ok(id.to_owned())
}

#[allow(dead_code)]
pub async fn find_account(state: &State, id: &str) -> anyhow::Result<account::AccountDoc> {
    let mut conn = state.read_db.acquire().await?;

    Ok(account::find(&mut conn, account::FindType::Id(id.to_owned()))
        .await?
        .unwrap())
}

#[allow(dead_code)]
pub async fn find_event(state: &State, id: &str) -> anyhow::Result<Option<event::EventDoc>> {
    let mut conn = state.read_db.acquire().await?;

    Ok(event::find(&mut conn, id).await?)
}
