use eventflow_shared::Result;
use sea_query::{Cond, Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, prelude::FromRow, types::Json};
use strum::AsRefStr;

use crate::{encode_ids, table::Account};

const COLUMNS: [Account; 10] = [
    Account::Id,
    Account::FullName,
    Account::Email,
    Account::PasswordHash,
    Account::MobileNumber,
    Account::ProfilePictureUrl,
    Account::CreatedEventIds,
    Account::AttendingEventIds,
    Account::CreatedAt,
    Account::UpdatedAt,
];

#[derive(FromRow, Debug, Clone)]
pub struct AccountDoc {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub mobile_number: String,
    pub profile_picture_url: String,
    pub created_event_ids: Json<Vec<String>>,
    pub attending_event_ids: Json<Vec<String>>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl AccountDoc {
    pub fn has_created(&self, event_id: &str) -> bool {
        self.created_event_ids.iter().any(|id| id == event_id)
    }

    pub fn is_attending(&self, event_id: &str) -> bool {
        self.attending_event_ids.iter().any(|id| id == event_id)
    }
}

/// The two reverse-index lists an account carries.
#[derive(AsRefStr, Clone, Copy, Debug, PartialEq)]
pub enum EventList {
    #[strum(serialize = "created_event_ids")]
    Created,
    #[strum(serialize = "attending_event_ids")]
    Attending,
}

pub enum FindType {
    Id(String),
    Email(String),
    MobileNumber(String),
    /// Email or mobile number.
    Identifier(String),
}

pub async fn find(conn: &mut SqliteConnection, find_type: FindType) -> Result<Option<AccountDoc>> {
    let mut statement = Query::select()
        .columns(COLUMNS)
        .from(Account::Table)
        .limit(1)
        .to_owned();

    match find_type {
        FindType::Id(id) => statement.and_where(Expr::col(Account::Id).eq(id)),
        FindType::Email(email) => {
            statement.and_where(Expr::col(Account::Email).eq(normalize_email(&email)))
        }
        FindType::MobileNumber(mobile) => {
            statement.and_where(Expr::col(Account::MobileNumber).eq(mobile.trim()))
        }
        FindType::Identifier(identifier) => statement.cond_where(
            Cond::any()
                .add(Expr::col(Account::Email).eq(normalize_email(&identifier)))
                .add(Expr::col(Account::MobileNumber).eq(identifier.trim())),
        ),
    };

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, AccountDoc, _>(&sql, values)
        .fetch_optional(conn)
        .await?)
}

pub async fn find_many(conn: &mut SqliteConnection, ids: &[String]) -> Result<Vec<AccountDoc>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let statement = Query::select()
        .columns(COLUMNS)
        .from(Account::Table)
        .and_where(Expr::col(Account::Id).is_in(ids.iter().cloned()))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, AccountDoc, _>(&sql, values)
        .fetch_all(conn)
        .await?)
}

pub async fn list_all(conn: &mut SqliteConnection) -> Result<Vec<AccountDoc>> {
    let statement = Query::select()
        .columns(COLUMNS)
        .from(Account::Table)
        .order_by(Account::CreatedAt, Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, AccountDoc, _>(&sql, values)
        .fetch_all(conn)
        .await?)
}

pub async fn list_ids(conn: &mut SqliteConnection) -> Result<Vec<String>> {
    let statement = Query::select()
        .column(Account::Id)
        .from(Account::Table)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, (String,), _>(&sql, values)
        .fetch_all(conn)
        .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

pub async fn is_email_exists(conn: &mut SqliteConnection, email: &str) -> Result<bool> {
    let statement = Query::select()
        .column(Account::Id)
        .from(Account::Table)
        .and_where(Expr::col(Account::Email).eq(normalize_email(email)))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
        .fetch_optional(conn)
        .await?;

    Ok(row.is_some())
}

/// Whether another account already uses this mobile number.
pub async fn is_mobile_number_exists(
    conn: &mut SqliteConnection,
    mobile_number: &str,
    except_id: Option<&str>,
) -> Result<bool> {
    let mut statement = Query::select()
        .column(Account::Id)
        .from(Account::Table)
        .and_where(Expr::col(Account::MobileNumber).eq(mobile_number.trim()))
        .to_owned();

    if let Some(id) = except_id {
        statement.and_where(Expr::col(Account::Id).ne(id));
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
        .fetch_optional(conn)
        .await?;

    Ok(row.is_some())
}

pub struct CreateInput {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub mobile_number: String,
    pub profile_picture_url: String,
}

pub async fn create(conn: &mut SqliteConnection, input: CreateInput) -> Result<()> {
    let now = eventflow_shared::now();
    let statement = Query::insert()
        .into_table(Account::Table)
        .columns(COLUMNS)
        .values_panic([
            input.id.into(),
            input.full_name.into(),
            normalize_email(&input.email).into(),
            input.password_hash.into(),
            input.mobile_number.trim().into(),
            input.profile_picture_url.into(),
            "[]".into(),
            "[]".into(),
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
    pub full_name: Option<String>,
    pub password_hash: Option<String>,
    pub mobile_number: Option<String>,
    pub profile_picture_url: Option<String>,
    pub created_event_ids: Option<Vec<String>>,
    pub attending_event_ids: Option<Vec<String>>,
}

pub async fn update(conn: &mut SqliteConnection, input: UpdateInput) -> Result<u64> {
    let mut statement = Query::update()
        .table(Account::Table)
        .value(Account::UpdatedAt, eventflow_shared::now())
        .and_where(Expr::col(Account::Id).eq(input.id))
        .to_owned();

    if let Some(full_name) = input.full_name {
        statement.value(Account::FullName, full_name);
    }

    if let Some(password_hash) = input.password_hash {
        statement.value(Account::PasswordHash, password_hash);
    }

    if let Some(mobile_number) = input.mobile_number {
        statement.value(Account::MobileNumber, mobile_number.trim());
    }

    if let Some(url) = input.profile_picture_url {
        statement.value(Account::ProfilePictureUrl, url);
    }

    if let Some(ids) = input.created_event_ids {
        statement.value(Account::CreatedEventIds, encode_ids(&ids)?);
    }

    if let Some(ids) = input.attending_event_ids {
        statement.value(Account::AttendingEventIds, encode_ids(&ids)?);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(result.rows_affected())
}

pub async fn delete(conn: &mut SqliteConnection, id: &str) -> Result<u64> {
    let statement = Query::delete()
        .from_table(Account::Table)
        .and_where(Expr::col(Account::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(result.rows_affected())
}

/// Appends `event_id` to one of the account's lists unless already present.
/// Returns false when nothing changed.
pub async fn push_event_id(
    conn: &mut SqliteConnection,
    account_id: &str,
    list: EventList,
    event_id: &str,
) -> Result<bool> {
    let column = list.as_ref();
    let sql = format!(
        r#"UPDATE "account" SET "{column}" = json_insert("{column}", '$[#]', ?1), "updated_at" = ?2
        WHERE "id" = ?3
        AND NOT EXISTS (SELECT 1 FROM json_each("account"."{column}") WHERE value = ?1)"#
    );

    let result = sqlx::query(&sql)
        .bind(event_id)
        .bind(eventflow_shared::now())
        .bind(account_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Removes `event_id` from one of the account's lists. Returns false when
/// the id was not listed.
pub async fn pull_event_id(
    conn: &mut SqliteConnection,
    account_id: &str,
    list: EventList,
    event_id: &str,
) -> Result<bool> {
    let column = list.as_ref();
    let sql = format!(
        r#"UPDATE "account"
        SET "{column}" = (SELECT json_group_array(value) FROM json_each("account"."{column}") WHERE value <> ?1),
            "updated_at" = ?2
        WHERE "id" = ?3
        AND EXISTS (SELECT 1 FROM json_each("account"."{column}") WHERE value = ?1)"#
    );

    let result = sqlx::query(&sql)
        .bind(event_id)
        .bind(eventflow_shared::now())
        .bind(account_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Bulk update-by-filter: strips every given event id from the created and
/// attending lists of all accounts. Returns the number of accounts touched.
pub async fn pull_event_ids_everywhere(
    conn: &mut SqliteConnection,
    event_ids: &[String],
) -> Result<u64> {
    if event_ids.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query(
        r#"UPDATE "account"
        SET "created_event_ids" = (
                SELECT json_group_array(value) FROM json_each("account"."created_event_ids")
                WHERE value NOT IN (SELECT value FROM json_each(?1))
            ),
            "attending_event_ids" = (
                SELECT json_group_array(value) FROM json_each("account"."attending_event_ids")
                WHERE value NOT IN (SELECT value FROM json_each(?1))
            ),
            "updated_at" = ?2
        WHERE EXISTS (
                SELECT 1 FROM json_each("account"."created_event_ids")
                WHERE value IN (SELECT value FROM json_each(?1))
            )
            OR EXISTS (
                SELECT 1 FROM json_each("account"."attending_event_ids")
                WHERE value IN (SELECT value FROM json_each(?1))
            )"#,
    )
    .bind(encode_ids(event_ids)?)
    .bind(eventflow_shared::now())
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
