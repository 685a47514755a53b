use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use htsget_resolve::{Config, Resolver, storage::LocalStorage, types::ResolvedRanges};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let storage = Arc::new(LocalStorage::new(config.data_dir.clone()));
    let resolver = Resolver::new(storage, config.block_size_limit);

    tracing::info!("Data directory: {:?}", config.data_dir);

    let chunks = resolver
        .resolve(&config.id, config.format, &config.region_query())
        .await
        .map_err(|e| {
            tracing::error!(error_type = e.error_type(), "{}", e);
            e
        })?;

    let output = ResolvedRanges::new(config.format, &chunks);
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
