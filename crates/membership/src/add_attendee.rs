use eventflow_db::{
    account::{self, EventList, FindType},
    event::{self, EventDoc},
};
use eventflow_shared::Error;

impl super::Membership {
    /// Adds the account identified by email or mobile number to the event.
    /// Only the creator may do this.
    #[tracing::instrument(skip(self))]
    pub async fn add_attendee(
        &self,
        event_id: &str,
        requester_id: &str,
        identifier: &str,
    ) -> eventflow_shared::Result<EventDoc> {
        let mut tx = self.write_db.begin().await?;

        let Some(event) = event::find(&mut tx, event_id).await? else {
            eventflow_shared::not_found!("Event");
        };

        if event.creator_id != requester_id {
            eventflow_shared::forbidden!("Only the event creator can add attendees");
        }

        if identifier.trim().is_empty() {
            eventflow_shared::invalid!("Email or mobile number is required");
        }

        let Some(target) =
            account::find(&mut tx, FindType::Identifier(identifier.to_owned())).await?
        else {
            eventflow_shared::not_found!("User with this email or mobile number");
        };

        if target.id == event.creator_id {
            eventflow_shared::invalid_operation!("The creator cannot be added as an attendee");
        }

        if event.has_attendee(&target.id) {
            eventflow_shared::conflict!("User is already an attendee of this event");
        }

        if event.is_full() {
            return Err(Error::CapacityExceeded);
        }

        if !event::push_attendee(&mut tx, &event.id, &target.id).await? {
            return Err(Error::CapacityExceeded);
        }

        account::push_event_id(&mut tx, &target.id, EventList::Attending, &event.id).await?;

        let Some(updated) = event::find(&mut tx, &event.id).await? else {
            eventflow_shared::server!("event {} vanished while adding attendee", event.id);
        };

        tx.commit().await?;

        tracing::info!(
            event_id = %updated.id,
            attendee_id = %target.id,
            attendees = updated.attendee_ids.len(),
            "attendee added"
        );

        Ok(updated)
    }
}
