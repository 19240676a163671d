use std::collections::{HashMap, HashSet};

use eventflow_db::{
    account::{self, AccountDoc},
    event::{self, EventDoc},
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Attendee ids pointing at missing accounts, duplicates or the creator.
    pub orphan_attendees_removed: usize,
    /// Events whose creator account no longer exists.
    pub orphan_events_removed: usize,
    /// Account list entries pointing at missing or unrelated events.
    pub stale_references_removed: usize,
    /// Account list entries re-added to match the event side.
    pub references_restored: usize,
    pub failures: usize,
}

impl super::Membership {
    /// Compensating pass bringing both sides of the relation back in sync.
    /// The event side is authoritative. Each document is repaired in its own
    /// transaction and a failure never aborts the pass.
    #[tracing::instrument(skip(self))]
    pub async fn reconcile(&self) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        let event_ids = match self.list_event_ids().await {
            Ok(ids) => ids,
            Err(err) => {
                tracing::error!(err = %err, "failed to list events for reconciliation");
                report.failures += 1;
                return report;
            }
        };

        for event_id in event_ids {
            if let Err(err) = self.repair_event(&event_id, &mut report).await {
                tracing::error!(event_id, err = %err, "failed to reconcile event");
                report.failures += 1;
            }
        }

        let account_ids = match self.list_account_ids().await {
            Ok(ids) => ids,
            Err(err) => {
                tracing::error!(err = %err, "failed to list accounts for reconciliation");
                report.failures += 1;
                return report;
            }
        };

        for account_id in account_ids {
            if let Err(err) = self.repair_account(&account_id, &mut report).await {
                tracing::error!(account_id, err = %err, "failed to reconcile account");
                report.failures += 1;
            }
        }

        tracing::info!(?report, "reconciliation finished");

        report
    }

    async fn list_event_ids(&self) -> eventflow_shared::Result<Vec<String>> {
        let mut conn = self.read_db.acquire().await?;

        event::list_ids(&mut conn).await
    }

    async fn list_account_ids(&self) -> eventflow_shared::Result<Vec<String>> {
        let mut conn = self.read_db.acquire().await?;

        account::list_ids(&mut conn).await
    }

    async fn repair_event(
        &self,
        event_id: &str,
        report: &mut ReconcileReport,
    ) -> eventflow_shared::Result<()> {
        let mut tx = self.write_db.begin().await?;

        let Some(event) = event::find(&mut tx, event_id).await? else {
            return Ok(());
        };

        let creator = account::find(&mut tx, account::FindType::Id(event.creator_id.clone())).await?;
        let Some(creator) = creator else {
            super::detach_event(&mut tx, &event.id).await?;
            event::delete(&mut tx, &event.id).await?;
            tx.commit().await?;

            tracing::warn!(event_id, creator_id = %event.creator_id, "removed event without creator");
            report.orphan_events_removed += 1;

            return Ok(());
        };

        let existing = account::find_many(&mut tx, &event.attendee_ids)
            .await?
            .into_iter()
            .map(|account| account.id)
            .collect::<HashSet<_>>();

        let attendee_ids = valid_attendees(&event, &existing);
        let removed = event.attendee_ids.len() - attendee_ids.len();

        if removed > 0 {
            event::update(
                &mut tx,
                event::UpdateInput {
                    id: event.id.clone(),
                    attendee_ids: Some(attendee_ids.clone()),
                    ..Default::default()
                },
            )
            .await?;
            report.orphan_attendees_removed += removed;
        }

        if !creator.has_created(&event.id)
            && account::push_event_id(&mut tx, &creator.id, account::EventList::Created, &event.id)
                .await?
        {
            report.references_restored += 1;
        }

        for attendee_id in attendee_ids.iter() {
            if account::push_event_id(&mut tx, attendee_id, account::EventList::Attending, &event.id)
                .await?
            {
                report.references_restored += 1;
            }
        }

        tx.commit().await?;

        Ok(())
    }

    async fn repair_account(
        &self,
        account_id: &str,
        report: &mut ReconcileReport,
    ) -> eventflow_shared::Result<()> {
        let mut tx = self.write_db.begin().await?;

        let Some(account) = account::find(&mut tx, account::FindType::Id(account_id.to_owned())).await?
        else {
            return Ok(());
        };

        let referenced = account
            .created_event_ids
            .iter()
            .chain(account.attending_event_ids.iter())
            .cloned()
            .collect::<Vec<_>>();

        let events = event::find_many(&mut tx, &referenced)
            .await?
            .into_iter()
            .map(|event| (event.id.clone(), event))
            .collect::<HashMap<_, _>>();

        let (created, attending) = valid_references(&account, &events);
        let removed = account.created_event_ids.len() - created.len()
            + account.attending_event_ids.len()
            - attending.len();

        if removed > 0 {
            account::update(
                &mut tx,
                account::UpdateInput {
                    id: account.id.clone(),
                    created_event_ids: Some(created),
                    attending_event_ids: Some(attending),
                    ..Default::default()
                },
            )
            .await?;
            report.stale_references_removed += removed;
        }

        tx.commit().await?;

        Ok(())
    }
}

/// Attendees that exist, are not the creator, first occurrence only.
fn valid_attendees(event: &EventDoc, existing: &HashSet<String>) -> Vec<String> {
    let mut seen = HashSet::new();

    event
        .attendee_ids
        .iter()
        .filter(|id| existing.contains(*id) && **id != event.creator_id)
        .filter(|id| seen.insert((*id).clone()))
        .cloned()
        .collect()
}

/// Created and attending lists restricted to events that point back at the
/// account.
fn valid_references(
    account: &AccountDoc,
    events: &HashMap<String, EventDoc>,
) -> (Vec<String>, Vec<String>) {
    let mut seen = HashSet::new();
    let created = account
        .created_event_ids
        .iter()
        .filter(|id| {
            events
                .get(*id)
                .is_some_and(|event| event.creator_id == account.id)
        })
        .filter(|id| seen.insert((*id).clone()))
        .cloned()
        .collect();

    let mut seen = HashSet::new();
    let attending = account
        .attending_event_ids
        .iter()
        .filter(|id| {
            events
                .get(*id)
                .is_some_and(|event| event.has_attendee(&account.id))
        })
        .filter(|id| seen.insert((*id).clone()))
        .cloned()
        .collect();

    (created, attending)
}
