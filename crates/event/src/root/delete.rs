use eventflow_db::event;

impl super::Command {
    /// Deletes the event and every account reference to it.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, event_id: &str, requester_id: &str) -> eventflow_shared::Result<()> {
        let mut tx = self.write_db.begin().await?;

        let Some(event) = event::find(&mut tx, event_id).await? else {
            eventflow_shared::not_found!("Event");
        };

        if event.creator_id != requester_id {
            eventflow_shared::forbidden!("Only the event creator can delete this event");
        }

        let accounts = eventflow_membership::detach_event(&mut tx, &event.id).await?;
        event::delete(&mut tx, &event.id).await?;

        tx.commit().await?;

        tracing::info!(event_id = %event.id, accounts, "event deleted");

        Ok(())
    }
}
