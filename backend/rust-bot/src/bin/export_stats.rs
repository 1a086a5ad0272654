use anyhow::Context;

use testcheck_bot::{
    config::StorageSettings,
    services::{export_service, stats_service},
};

/// Rebuilds the results spreadsheet from the stats document.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let storage = StorageSettings::load().context("Failed to load storage settings")?;

    let stats = stats_service::read_document(&storage.stats_file)
        .await
        .with_context(|| format!("Failed to read {}", storage.stats_file.display()))?;

    export_service::write_xlsx(&storage.export_file, &stats)?;
    tracing::info!(
        "Exported {} users to {}",
        stats.len(),
        storage.export_file.display()
    );

    Ok(())
}
