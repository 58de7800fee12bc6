use notion_sync::config::{DestinationConfig, SyncConfig};
use notion_sync::source::NotionClient;
use notion_sync::store::LibSqlBackend;
use notion_sync::sync::run_sync;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Sync failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = SyncConfig::from_env()?;

    eprintln!("notion-sync v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Notion database: {}", config.source.database_id);
    match &config.destination {
        DestinationConfig::Local { path } => eprintln!("   Destination: {}", path.display()),
        DestinationConfig::Remote { url, .. } => eprintln!("   Destination: {url}"),
    }

    let client = NotionClient::new(config.source.clone());
    let store = LibSqlBackend::open(&config.destination).await?;

    let report = run_sync(&client, &store, &config.properties).await?;

    for failure in &report.failed {
        eprintln!("   Failed: {} ({})", failure.id, failure.reason);
    }
    println!(
        "Notion tasks synced: {} of {} rows written in {} ms",
        report.written,
        report.fetched,
        report.elapsed().num_milliseconds()
    );
    Ok(())
}
