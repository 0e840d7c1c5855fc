//! Engine configuration loading: optional JSON file, then CLI overrides.

use std::path::Path;

use anyhow::{Context, Result};

use wayfarer_core::config::EngineConfig;
use wayfarer_core::enums::CameraPresetKind;

/// Settings the command line may override on top of the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub preset: Option<CameraPresetKind>,
    pub zoom: Option<f64>,
    pub disable_smoothing: bool,
    pub update_interval_ms: Option<u64>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut EngineConfig) {
        if let Some(preset) = self.preset {
            config.camera.preset = preset;
        }
        if let Some(zoom) = self.zoom {
            config.coordinates.initial_zoom = zoom;
        }
        if self.disable_smoothing {
            config.coordinates.smoothing_enabled = false;
        }
        if let Some(interval) = self.update_interval_ms {
            config.location.update_interval_ms = interval;
        }
    }
}

/// Parse a config document. Missing sections and fields take their defaults.
pub fn parse_engine_config(text: &str) -> Result<EngineConfig> {
    serde_json::from_str(text).context("failed to parse engine config")
}

/// Read `path` if given, otherwise start from defaults.
pub fn load_engine_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_engine_config(&text).with_context(|| format!("in {}", path.display()))
}

/// Apply overrides and validate the result.
pub fn finalize(mut config: EngineConfig, overrides: &ConfigOverrides) -> Result<EngineConfig> {
    overrides.apply(&mut config);
    config.validate().context("invalid engine configuration")?;
    Ok(config)
}
