use replset_config::load_config;
use replset_config::shared::SidecarConfig;

/// Loads the [`SidecarConfig`] and validates it.
pub fn load_sidecar_config() -> anyhow::Result<SidecarConfig> {
    let config = load_config::<SidecarConfig>()?;
    config.validate()?;

    Ok(config)
}
