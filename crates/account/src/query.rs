use eventflow_db::account::{self, AccountDoc};
use serde::Serialize;
use sqlx::SqlitePool;

/// Public view of an account, never carries the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub mobile_number: String,
    pub profile_picture_url: String,
    pub created_event_ids: Vec<String>,
    pub attending_event_ids: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<AccountDoc> for AccountView {
    fn from(value: AccountDoc) -> Self {
        Self {
            id: value.id,
            full_name: value.full_name,
            email: value.email,
            mobile_number: value.mobile_number,
            profile_picture_url: value.profile_picture_url,
            created_event_ids: value.created_event_ids.0,
            attending_event_ids: value.attending_event_ids.0,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct Query(pub SqlitePool);

impl Query {
    pub async fn find(&self, account_id: &str) -> eventflow_shared::Result<Option<AccountView>> {
        let mut conn = self.0.acquire().await?;
        let account = account::find(&mut conn, account::FindType::Id(account_id.to_owned())).await?;

        Ok(account.map(AccountView::from))
    }
}
