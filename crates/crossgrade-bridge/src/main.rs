mod config;
mod replay;

use config::BridgeConfig;
use crossgrade_mappings::{Mapping, MappingTable};
use crossgrade_multiversion::Registry;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting Crossgrade bridge...");

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/bridge.toml".into());
    let config = BridgeConfig::load(Path::new(&config_path))?;
    info!(
        "Config loaded: mappings_dir={}, versions={}, captures={}",
        config.mappings_dir,
        config.versions.len(),
        config.captures.len()
    );

    let registry = Arc::new(load_registry(&config)?);
    for (protocol, version) in registry.versions() {
        info!("Supporting protocol {} ({})", protocol, version);
    }

    // One task per capture, as a live bridge runs one per connection.
    let mut tasks = Vec::with_capacity(config.captures.len());
    for (conn_id, capture) in config.captures.iter().cloned().enumerate() {
        let registry = registry.clone();
        let enable_limits = config.enable_limits;
        let path = capture.path.clone();
        let task = tokio::spawn(async move {
            replay::replay_capture(registry, capture, conn_id as u64 + 1, enable_limits).await
        });
        tasks.push((path, task));
    }

    let mut failed = 0;
    for (path, task) in tasks {
        match task.await? {
            Ok(_) => {}
            Err(e) => {
                error!("Replay of {} failed: {:#}", path, e);
                failed += 1;
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{} capture(s) failed", failed);
    }

    info!("Bridge shut down cleanly");
    Ok(())
}

/// Loads every configured mapping table and builds the version chain.
fn load_registry(config: &BridgeConfig) -> anyhow::Result<Registry> {
    let latest: Arc<dyn Mapping> = Arc::new(MappingTable::load(config.latest_mapping_path())?);
    let mut mappings: HashMap<i32, Arc<dyn Mapping>> = HashMap::new();
    for (protocol, path) in config.version_paths()? {
        let table = MappingTable::load(&path)?;
        info!(
            "Loaded mapping for protocol {}: {} block states, {} items",
            protocol,
            table.block_count(),
            table.item_count()
        );
        mappings.insert(protocol, Arc::new(table));
    }
    Ok(Registry::new(latest, &mappings)?)
}
