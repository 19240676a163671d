use eventflow_db::{account, event};
use sqlx::SqliteConnection;

/// Strips `event_id` from the created and attending lists of every account.
/// The caller deletes the event record in the same transaction.
pub async fn detach_event(
    conn: &mut SqliteConnection,
    event_id: &str,
) -> eventflow_shared::Result<u64> {
    let touched = account::pull_event_ids_everywhere(conn, &[event_id.to_owned()]).await?;

    tracing::debug!(event_id, accounts = touched, "event detached");

    Ok(touched)
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AccountDetached {
    pub deleted_event_ids: Vec<String>,
    pub left_events: u64,
}

/// Deletes every event the account created, removing those events from all
/// other accounts, then removes the account from every attendee list. The
/// caller deletes the account record in the same transaction.
pub async fn detach_account(
    conn: &mut SqliteConnection,
    account_id: &str,
) -> eventflow_shared::Result<AccountDetached> {
    let deleted_event_ids = event::list_by_creator(conn, account_id)
        .await?
        .into_iter()
        .map(|event| event.id)
        .collect::<Vec<_>>();

    account::pull_event_ids_everywhere(conn, &deleted_event_ids).await?;

    for event_id in deleted_event_ids.iter() {
        event::delete(conn, event_id).await?;
    }

    let left_events = event::pull_attendee_everywhere(conn, account_id).await?;

    tracing::debug!(
        account_id,
        deleted_events = deleted_event_ids.len(),
        left_events,
        "account detached"
    );

    Ok(AccountDetached {
        deleted_event_ids,
        left_events,
    })
}
