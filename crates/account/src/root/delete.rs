use eventflow_db::account;

impl super::Command {
    /// Self-deletion. Events created by the account are deleted with it and
    /// the account leaves every event it attends.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, account_id: &str, requester_id: &str) -> eventflow_shared::Result<()> {
        if account_id != requester_id {
            eventflow_shared::forbidden!("Not authorized to delete this account");
        }

        let mut tx = self.write_db.begin().await?;

        if account::find(&mut tx, account::FindType::Id(account_id.to_owned()))
            .await?
            .is_none()
        {
            eventflow_shared::not_found!("User");
        }

        let detached = eventflow_membership::detach_account(&mut tx, account_id).await?;
        account::delete(&mut tx, account_id).await?;

        tx.commit().await?;

        tracing::info!(
            account_id,
            deleted_events = detached.deleted_event_ids.len(),
            left_events = detached.left_events,
            "account deleted"
        );

        Ok(())
    }
}
