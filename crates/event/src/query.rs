//! Read side: events with their creator and attendees resolved to
//! display-friendly summaries.

use std::collections::HashMap;

use eventflow_db::{
    account::{self, AccountDoc},
    event::{self, EventDoc},
};
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub mobile_number: String,
    pub profile_picture_url: String,
}

impl From<AccountDoc> for AccountSummary {
    fn from(value: AccountDoc) -> Self {
        Self {
            id: value.id,
            full_name: value.full_name,
            email: value.email,
            mobile_number: value.mobile_number,
            profile_picture_url: value.profile_picture_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub image: String,
    pub banner1: String,
    pub banner2: String,
    pub creator: Option<AccountSummary>,
    pub attendees: Vec<AccountSummary>,
    pub max_attendees: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Clone)]
pub struct Query(pub SqlitePool);

impl Query {
    pub async fn find(&self, event_id: &str) -> eventflow_shared::Result<Option<EventView>> {
        let mut conn = self.0.acquire().await?;
        let Some(event) = event::find(&mut conn, event_id).await? else {
            return Ok(None);
        };

        let mut views = resolve(&mut conn, vec![event]).await?;

        Ok(views.pop())
    }

    pub async fn view(&self, event: EventDoc) -> eventflow_shared::Result<EventView> {
        let mut conn = self.0.acquire().await?;
        let mut views = resolve(&mut conn, vec![event]).await?;

        let Some(view) = views.pop() else {
            eventflow_shared::server!("event view not resolved");
        };

        Ok(view)
    }

    /// Events created by the account, ordered by date.
    pub async fn my_events(&self, account_id: &str) -> eventflow_shared::Result<Vec<EventView>> {
        let mut conn = self.0.acquire().await?;
        let events = event::list_by_creator(&mut conn, account_id).await?;

        resolve(&mut conn, events).await
    }

    /// Events the account attends, ordered by date.
    pub async fn attending_events(
        &self,
        account_id: &str,
    ) -> eventflow_shared::Result<Vec<EventView>> {
        let mut conn = self.0.acquire().await?;
        let events = event::list_by_attendee(&mut conn, account_id).await?;

        resolve(&mut conn, events).await
    }
}

async fn resolve(
    conn: &mut SqliteConnection,
    events: Vec<EventDoc>,
) -> eventflow_shared::Result<Vec<EventView>> {
    let mut ids = vec![];
    for event in events.iter() {
        ids.push(event.creator_id.to_owned());
        ids.extend(event.attendee_ids.iter().cloned());
    }
    ids.sort();
    ids.dedup();

    let accounts = account::find_many(conn, &ids)
        .await?
        .into_iter()
        .map(|account| (account.id.to_owned(), AccountSummary::from(account)))
        .collect::<HashMap<_, _>>();

    Ok(events
        .into_iter()
        .map(|event| EventView {
            creator: accounts.get(&event.creator_id).cloned(),
            attendees: event
                .attendee_ids
                .iter()
                .filter_map(|id| accounts.get(id).cloned())
                .collect(),
            date: crate::format_date(event.starts_at),
            id: event.id,
            title: event.title,
            description: event.description,
            location: event.location,
            time: event.time,
            image: event.image,
            banner1: event.banner_primary,
            banner2: event.banner_secondary,
            max_attendees: event.max_attendees,
            created_at: event.created_at,
            updated_at: event.updated_at,
        })
        .collect())
}
