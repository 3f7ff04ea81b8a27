use std::path::Path;

use tracing::warn;

use crate::ai::EngineConfig;
use crate::arena::ArenaConfig;
use crate::error::ConfigError;
use crate::game::Board;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub arena: ArenaConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;

        if self.arena.games == 0 {
            return Err(ConfigError::Validation(
                "arena.games must be > 0".into(),
            ));
        }
        if self.arena.opponent_depth < 0 {
            return Err(ConfigError::Validation(
                "arena.opponent_depth must be >= 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.arena.opponent_mistake_rate) {
            return Err(ConfigError::Validation(
                "arena.opponent_mistake_rate must be in [0, 1]".into(),
            ));
        }
        if let Err(e) = Board::new(self.arena.width, self.arena.height, self.arena.win_condition) {
            return Err(ConfigError::Validation(format!("arena board: {e}")));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, ConfigError> {
        toml::to_string_pretty(&AppConfig::default())
            .map_err(|e| ConfigError::Validation(format!("default config does not serialize: {e}")))
    }
}
