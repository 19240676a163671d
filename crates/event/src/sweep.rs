use eventflow_db::event;
use eventflow_membership::ReconcileReport;
use serde::Serialize;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub expired_events_purged: usize,
    pub orphan_attendees_removed: usize,
    pub orphan_events_removed: usize,
    pub stale_references_removed: usize,
    pub references_restored: usize,
    pub failures: usize,
}

impl SweepReport {
    fn merge(&mut self, reconcile: ReconcileReport) {
        self.orphan_attendees_removed += reconcile.orphan_attendees_removed;
        self.orphan_events_removed += reconcile.orphan_events_removed;
        self.stale_references_removed += reconcile.stale_references_removed;
        self.references_restored += reconcile.references_restored;
        self.failures += reconcile.failures;
    }
}

impl super::Command {
    /// Purges every event dated strictly before `now`, then runs the
    /// reconciliation pass. Never fails; problems are logged and counted.
    #[tracing::instrument(skip(self))]
    pub async fn sweep_expired(&self, now: i64) -> SweepReport {
        let mut report = SweepReport::default();

        let expired = match self.list_expired(now).await {
            Ok(ids) => ids,
            Err(err) => {
                tracing::error!(err = %err, "failed to list expired events");
                report.failures += 1;
                vec![]
            }
        };

        for event_id in expired {
            match self.purge_expired(&event_id, now).await {
                Ok(true) => report.expired_events_purged += 1,
                Ok(false) => {}
                Err(err) => {
                    tracing::error!(event_id, err = %err, "failed to purge expired event");
                    report.failures += 1;
                }
            }
        }

        report.merge(self.membership.reconcile().await);

        tracing::info!(?report, "sweep finished");

        report
    }

    async fn list_expired(&self, now: i64) -> eventflow_shared::Result<Vec<String>> {
        let mut conn = self.read_db.acquire().await?;
        let events = event::list_started_before(&mut conn, now).await?;

        Ok(events.into_iter().map(|event| event.id).collect())
    }

    async fn purge_expired(&self, event_id: &str, now: i64) -> eventflow_shared::Result<bool> {
        let mut tx = self.write_db.begin().await?;

        let Some(event) = event::find(&mut tx, event_id).await? else {
            return Ok(false);
        };

        if event.starts_at >= now {
            return Ok(false);
        }

        eventflow_membership::detach_event(&mut tx, &event.id).await?;
        event::delete(&mut tx, &event.id).await?;

        tx.commit().await?;

        tracing::debug!(event_id, "expired event purged");

        Ok(true)
    }
}
