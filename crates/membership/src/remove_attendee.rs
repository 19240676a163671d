use eventflow_db::{
    account::{self, EventList},
    event::{self, EventDoc},
};

impl super::Membership {
    #[tracing::instrument(skip(self))]
    pub async fn remove_attendee(
        &self,
        event_id: &str,
        requester_id: &str,
        target_id: &str,
    ) -> eventflow_shared::Result<EventDoc> {
        let mut tx = self.write_db.begin().await?;

        let Some(event) = event::find(&mut tx, event_id).await? else {
            eventflow_shared::not_found!("Event");
        };

        if event.creator_id != requester_id {
            eventflow_shared::forbidden!("Only the event creator can remove attendees");
        }

        if !event::pull_attendee(&mut tx, &event.id, target_id).await? {
            eventflow_shared::invalid_operation!("User is not an attendee of this event");
        }

        account::pull_event_id(&mut tx, target_id, EventList::Attending, &event.id).await?;

        let Some(updated) = event::find(&mut tx, &event.id).await? else {
            eventflow_shared::server!("event {} vanished while removing attendee", event.id);
        };

        tx.commit().await?;

        tracing::info!(event_id = %updated.id, attendee_id = %target_id, "attendee removed");

        Ok(updated)
    }
}
