use bevy::log::{info, warn};
use bevy::prelude::Resource;
use drape::SimConfig;
use std::path::Path;

pub const CONFIG_PATH: &str = "windslide_config.toml";

#[derive(Resource, Debug, Clone, Default)]
pub struct SlideshowConfig(pub SimConfig);

/// Reads the tuning file next to the executable, falling back to defaults.
pub fn load_config() -> SlideshowConfig {
    if !Path::new(CONFIG_PATH).exists() {
        info!("No {CONFIG_PATH}, using default tuning");
        return SlideshowConfig::default();
    }
    match SimConfig::load_from_file(CONFIG_PATH) {
        Ok(config) => {
            info!("Loaded tuning from {CONFIG_PATH}");
            SlideshowConfig(config)
        }
        Err(err) => {
            warn!("Ignoring {CONFIG_PATH}: {err}");
            SlideshowConfig::default()
        }
    }
}
