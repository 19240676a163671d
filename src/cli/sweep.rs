use anyhow::Result;

use crate::{AppState, config::Config};

/// Runs one retention sweep and prints its report as JSON.
pub async fn sweep(config: Config) -> Result<()> {
    let state = AppState::build(config).await?;

    let report = state
        .event_command
        .sweep_expired(eventflow_shared::now())
        .await;

    println!("{}", serde_json::to_string_pretty(&report)?);

    state.close().await;

    if report.failures > 0 {
        anyhow::bail!("retention sweep finished with {} failures", report.failures);
    }

    Ok(())
}
