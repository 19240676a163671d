use eventflow_db::{
    account::{self, EventList},
    event::{self, EventDoc},
};

impl super::Membership {
    /// The requester removes themself from the event's attendees.
    #[tracing::instrument(skip(self))]
    pub async fn leave(
        &self,
        event_id: &str,
        requester_id: &str,
    ) -> eventflow_shared::Result<EventDoc> {
        let mut tx = self.write_db.begin().await?;

        let Some(event) = event::find(&mut tx, event_id).await? else {
            eventflow_shared::not_found!("Event");
        };

        if event.creator_id == requester_id {
            eventflow_shared::invalid_operation!("The creator cannot leave their own event");
        }

        if !event::pull_attendee(&mut tx, &event.id, requester_id).await? {
            eventflow_shared::invalid_operation!("You are not an attendee of this event");
        }

        account::pull_event_id(&mut tx, requester_id, EventList::Attending, &event.id).await?;

        let Some(updated) = event::find(&mut tx, &event.id).await? else {
            eventflow_shared::server!("event {} vanished while leaving", event.id);
        };

        tx.commit().await?;

        tracing::info!(event_id = %updated.id, attendee_id = %requester_id, "attendee left");

        Ok(updated)
    }
}
