use crate::config::load_sidecar_config;
use crate::core::start_sidecar_with_config;
use replset_config::shared::SidecarConfig;
use replset_telemetry::{init_tracing, set_global_replica_set};
use tracing::error;

mod config;
mod core;

fn main() -> anyhow::Result<()> {
    // Load sidecar config
    let sidecar_config = load_sidecar_config()?;

    // Tag all structured log entries with the replica set name
    set_global_replica_set(sidecar_config.database.replica_set.clone());

    // Initialize tracing
    let _log_flusher = init_tracing(env!("CARGO_BIN_NAME"))?;

    // We start the runtime.
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main(sidecar_config))?;

    Ok(())
}

async fn async_main(sidecar_config: SidecarConfig) -> anyhow::Result<()> {
    // We start the sidecar and catch any errors.
    if let Err(err) = start_sidecar_with_config(sidecar_config).await {
        error!("an error occurred in the sidecar: {err}");

        return Err(err);
    }

    Ok(())
}
