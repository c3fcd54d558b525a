/// Player configuration
use crate::error::{PlayerError, Result};
use cadence_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlayerConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub engine: EngineSettings,

    /// Catalog file (JSON or TOML); the `--catalog` flag takes precedence
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineSettings {
    /// Interval between simulated engine clock ticks
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Duration used for tracks without a published duration
    #[serde(default = "default_track_secs")]
    pub default_track_secs: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            default_track_secs: default_track_secs(),
        }
    }
}

impl PlayerConfig {
    /// Load configuration from file and environment
    ///
    /// Without an explicit path, `cadence.toml` in the working directory is
    /// used when present. Environment variables prefixed with `CADENCE_`
    /// override file values, with `__` between nested keys
    /// (`CADENCE_PLAYBACK__VOLUME=40`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(path, environment())
    }

    pub(crate) fn load_from(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(PlayerError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                let default_path = PathBuf::from("cadence.toml");
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(env);

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.playback.volume > 100 {
            return Err(PlayerError::Config(format!(
                "playback.volume must be 0-100, got {}",
                self.playback.volume
            )));
        }

        if self.engine.tick_ms == 0 {
            return Err(PlayerError::Config(
                "engine.tick_ms must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("CADENCE")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn default_tick_ms() -> u64 {
    250
}

fn default_track_secs() -> u64 {
    180
}
