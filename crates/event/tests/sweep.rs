use eventflow_db::event;
use eventflow_event::{CreateInput, Query, SweepReport};
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_sweep_purges_expired_events() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let creator = helpers::create_account(&state, "creator", "9000000001").await?;
    let jane = helpers::create_account(&state, "jane", "9000000002").await?;
    let cmd = helpers::command(&state);

    let expired = cmd.create(&creator, helpers::create_input("Expired")).await?;
    let upcoming = cmd
        .create(
            &creator,
            CreateInput {
                date: "2101-01-01".to_owned(),
                ..helpers::create_input("Upcoming")
            },
        )
        .await?;
    cmd.membership
        .add_attendee(&expired.id, &creator, "jane@eventflow.localhost")
        .await?;
    cmd.membership
        .add_attendee(&upcoming.id, &creator, "jane@eventflow.localhost")
        .await?;

    let report = cmd.sweep_expired(4_102_444_800 + 1).await;
    assert_eq!(
        report,
        SweepReport {
            expired_events_purged: 1,
            ..Default::default()
        }
    );

    let query = Query(state.read_db.clone());
    assert!(query.find(&expired.id).await?.is_none());
    assert!(query.find(&upcoming.id).await?.is_some());

    let creator_doc = helpers::find_account(&state, &creator).await?.unwrap();
    assert_eq!(creator_doc.created_event_ids.0, vec![upcoming.id.clone()]);
    let jane_doc = helpers::find_account(&state, &jane).await?.unwrap();
    assert_eq!(jane_doc.attending_event_ids.0, vec![upcoming.id.clone()]);

    Ok(())
}

#[tokio::test]
async fn test_sweep_strips_orphan_attendees() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let creator = helpers::create_account(&state, "creator", "9000000001").await?;
    let jane = helpers::create_account(&state, "jane", "9000000002").await?;
    let cmd = helpers::command(&state);

    let created = cmd.create(&creator, helpers::create_input("Launch")).await?;

    {
        let mut conn = state.write_db.acquire().await?;
        event::update(
            &mut conn,
            event::UpdateInput {
                id: created.id.clone(),
                attendee_ids: Some(vec!["deleted-account".to_owned(), jane.clone()]),
                ..Default::default()
            },
        )
        .await?;
    }

    let report = cmd.sweep_expired(0).await;
    assert_eq!(report.expired_events_purged, 0);
    assert_eq!(report.orphan_attendees_removed, 1);
    assert_eq!(report.references_restored, 1);
    assert_eq!(report.failures, 0);

    let view = Query(state.read_db.clone()).find(&created.id).await?.unwrap();
    assert_eq!(view.attendees.len(), 1);
    assert_eq!(view.attendees[0].id, jane);

    let jane_doc = helpers::find_account(&state, &jane).await?.unwrap();
    assert_eq!(jane_doc.attending_event_ids.0, vec![created.id]);

    Ok(())
}
