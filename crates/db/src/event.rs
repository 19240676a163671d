use eventflow_shared::Result;
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, prelude::FromRow, types::Json};

use crate::{encode_ids, table::Event};

const COLUMNS: [Event; 14] = [
    Event::Id,
    Event::Title,
    Event::Description,
    Event::Location,
    Event::StartsAt,
    Event::Time,
    Event::Image,
    Event::BannerPrimary,
    Event::BannerSecondary,
    Event::CreatorId,
    Event::AttendeeIds,
    Event::MaxAttendees,
    Event::CreatedAt,
    Event::UpdatedAt,
];

#[derive(FromRow, Debug, Clone)]
pub struct EventDoc {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub starts_at: i64,
    pub time: String,
    pub image: String,
    pub banner_primary: String,
    pub banner_secondary: String,
    pub creator_id: String,
    pub attendee_ids: Json<Vec<String>>,
    pub max_attendees: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl EventDoc {
    /// `None` means unlimited.
    pub fn capacity(&self) -> Option<usize> {
        (self.max_attendees > 0).then_some(self.max_attendees as usize)
    }

    pub fn is_full(&self) -> bool {
        self.capacity()
            .is_some_and(|max| self.attendee_ids.len() >= max)
    }

    pub fn has_attendee(&self, account_id: &str) -> bool {
        self.attendee_ids.iter().any(|id| id == account_id)
    }
}

pub async fn find(conn: &mut SqliteConnection, id: &str) -> Result<Option<EventDoc>> {
    let statement = Query::select()
        .columns(COLUMNS)
        .from(Event::Table)
        .and_where(Expr::col(Event::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, EventDoc, _>(&sql, values)
        .fetch_optional(conn)
        .await?)
}

pub async fn list_by_creator(
    conn: &mut SqliteConnection,
    creator_id: &str,
) -> Result<Vec<EventDoc>> {
    let statement = Query::select()
        .columns(COLUMNS)
        .from(Event::Table)
        .and_where(Expr::col(Event::CreatorId).eq(creator_id))
        .order_by(Event::StartsAt, Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, EventDoc, _>(&sql, values)
        .fetch_all(conn)
        .await?)
}

pub async fn list_by_attendee(
    conn: &mut SqliteConnection,
    account_id: &str,
) -> Result<Vec<EventDoc>> {
    let statement = Query::select()
        .columns(COLUMNS)
        .from(Event::Table)
        .and_where(Expr::cust_with_values(
            r#"EXISTS (SELECT 1 FROM json_each("event"."attendee_ids") WHERE value = ?)"#,
            [account_id],
        ))
        .order_by(Event::StartsAt, Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, EventDoc, _>(&sql, values)
        .fetch_all(conn)
        .await?)
}

/// Events whose date is strictly before `timestamp`.
pub async fn list_started_before(
    conn: &mut SqliteConnection,
    timestamp: i64,
) -> Result<Vec<EventDoc>> {
    let statement = Query::select()
        .columns(COLUMNS)
        .from(Event::Table)
        .and_where(Expr::col(Event::StartsAt).lt(timestamp))
        .order_by(Event::StartsAt, Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, EventDoc, _>(&sql, values)
        .fetch_all(conn)
        .await?)
}

pub async fn list_ids(conn: &mut SqliteConnection) -> Result<Vec<String>> {
    let statement = Query::select()
        .column(Event::Id)
        .from(Event::Table)
        .order_by(Event::CreatedAt, Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, (String,), _>(&sql, values)
        .fetch_all(conn)
        .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

pub async fn find_many(conn: &mut SqliteConnection, ids: &[String]) -> Result<Vec<EventDoc>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let statement = Query::select()
        .columns(COLUMNS)
        .from(Event::Table)
        .and_where(Expr::col(Event::Id).is_in(ids.iter().cloned()))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, EventDoc, _>(&sql, values)
        .fetch_all(conn)
        .await?)
}

pub struct CreateInput {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub starts_at: i64,
    pub time: String,
    pub image: String,
    pub banner_primary: String,
    pub banner_secondary: String,
    pub creator_id: String,
    pub max_attendees: i64,
}

pub async fn create(conn: &mut SqliteConnection, input: CreateInput) -> Result<()> {
    let now = eventflow_shared::now();
    let statement = Query::insert()
        .into_table(Event::Table)
        .columns(COLUMNS)
        .values_panic([
            input.id.into(),
            input.title.into(),
            input.description.into(),
            input.location.into(),
            input.starts_at.into(),
            input.time.into(),
            input.image.into(),
            input.banner_primary.into(),
            input.banner_secondary.into(),
            input.creator_id.into(),
            "[]".into(),
            input.max_attendees.into(),
            now.into(),
            now.into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}

#[derive(Default)]
pub struct UpdateInput {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<i64>,
    pub time: Option<String>,
    pub image: Option<String>,
    pub banner_primary: Option<String>,
    pub banner_secondary: Option<String>,
    pub max_attendees: Option<i64>,
    pub attendee_ids: Option<Vec<String>>,
}

pub async fn update(conn: &mut SqliteConnection, input: UpdateInput) -> Result<u64> {
    let mut statement = Query::update()
        .table(Event::Table)
        .value(Event::UpdatedAt, eventflow_shared::now())
        .and_where(Expr::col(Event::Id).eq(input.id))
        .to_owned();

    if let Some(title) = input.title {
        statement.value(Event::Title, title);
    }

    if let Some(description) = input.description {
        statement.value(Event::Description, description);
    }

    if let Some(location) = input.location {
        statement.value(Event::Location, location);
    }

    if let Some(starts_at) = input.starts_at {
        statement.value(Event::StartsAt, starts_at);
    }

    if let Some(time) = input.time {
        statement.value(Event::Time, time);
    }

    if let Some(image) = input.image {
        statement.value(Event::Image, image);
    }

    if let Some(banner) = input.banner_primary {
        statement.value(Event::BannerPrimary, banner);
    }

    if let Some(banner) = input.banner_secondary {
        statement.value(Event::BannerSecondary, banner);
    }

    if let Some(max_attendees) = input.max_attendees {
        statement.value(Event::MaxAttendees, max_attendees);
    }

    if let Some(ids) = input.attendee_ids {
        statement.value(Event::AttendeeIds, encode_ids(&ids)?);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(result.rows_affected())
}

pub async fn delete(conn: &mut SqliteConnection, id: &str) -> Result<u64> {
    let statement = Query::delete()
        .from_table(Event::Table)
        .and_where(Expr::col(Event::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(result.rows_affected())
}

/// Conditional append: adds `account_id` to the attendee list only if it is
/// not already listed and the event is below its capacity (a non-positive
/// capacity means unlimited). Returns false when no row was changed.
pub async fn push_attendee(
    conn: &mut SqliteConnection,
    event_id: &str,
    account_id: &str,
) -> Result<bool> {
    let result = sqlx::query(
        r#"UPDATE "event"
        SET "attendee_ids" = json_insert("attendee_ids", '$[#]', ?1), "updated_at" = ?2
        WHERE "id" = ?3
        AND "creator_id" <> ?1
        AND NOT EXISTS (SELECT 1 FROM json_each("event"."attendee_ids") WHERE value = ?1)
        AND ("max_attendees" <= 0 OR json_array_length("attendee_ids") < "max_attendees")"#,
    )
    .bind(account_id)
    .bind(eventflow_shared::now())
    .bind(event_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Removes `account_id` from the attendee list. Returns false when it was
/// not listed.
pub async fn pull_attendee(
    conn: &mut SqliteConnection,
    event_id: &str,
    account_id: &str,
) -> Result<bool> {
    let result = sqlx::query(
        r#"UPDATE "event"
        SET "attendee_ids" = (SELECT json_group_array(value) FROM json_each("event"."attendee_ids") WHERE value <> ?1),
            "updated_at" = ?2
        WHERE "id" = ?3
        AND EXISTS (SELECT 1 FROM json_each("event"."attendee_ids") WHERE value = ?1)"#,
    )
    .bind(account_id)
    .bind(eventflow_shared::now())
    .bind(event_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Bulk update-by-filter: strips `account_id` from the attendee list of
/// every event that lists it. Returns the number of events touched.
pub async fn pull_attendee_everywhere(
    conn: &mut SqliteConnection,
    account_id: &str,
) -> Result<u64> {
    let result = sqlx::query(
        r#"UPDATE "event"
        SET "attendee_ids" = (SELECT json_group_array(value) FROM json_each("event"."attendee_ids") WHERE value <> ?1),
            "updated_at" = ?2
        WHERE EXISTS (SELECT 1 FROM json_each("event"."attendee_ids") WHERE value = ?1)"#,
    )
    .bind(account_id)
    .bind(eventflow_shared::now())
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}
