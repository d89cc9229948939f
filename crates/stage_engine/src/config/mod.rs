//! Configuration system

pub use serde::{Deserialize, Serialize};

/// Configuration trait
///
/// Blanket behavior for serde-derived configuration structs: load and
/// save as TOML or RON, picked by file extension.
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }

    /// Load configuration from file, falling back to defaults
    ///
    /// A missing or invalid file is logged and replaced by
    /// `Self::default()`, so a bad config never stops startup.
    fn load_or_default(path: &str) -> Self {
        match Self::load_from_file(path) {
            Ok(config) => {
                log::info!("Loaded configuration from '{}'", path);
                config
            }
            Err(e) => {
                log::warn!("Using default configuration, '{}' not usable: {}", path, e);
                Self::default()
            }
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::stage::{ScaleMode, StageConfig};

    fn temp_path(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("stage_engine_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn test_toml_round_trip() {
        let path = temp_path("engine.toml");
        let path = path.to_str().unwrap();

        let config = EngineConfig {
            stage: StageConfig {
                design_width: 800,
                scale_mode: ScaleMode::FixedWidth,
                ..Default::default()
            },
            ..Default::default()
        };
        config.save_to_file(path).unwrap();

        let loaded = EngineConfig::load_from_file(path).unwrap();
        assert_eq!(loaded.stage.design_width, 800);
        assert_eq!(loaded.stage.scale_mode, ScaleMode::FixedWidth);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_partial_files_fill_in_defaults() {
        let path = temp_path("partial.toml");
        std::fs::write(&path, "target_fps = 30\n").unwrap();

        let loaded = EngineConfig::load_from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.target_fps, 30);
        assert_eq!(loaded.stage.physical_width, 1280);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let path = temp_path("engine.yaml");
        std::fs::write(&path, "target_fps: 30\n").unwrap();

        let result = EngineConfig::load_from_file(path.to_str().unwrap());
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_or_default_survives_missing_files() {
        let config = EngineConfig::load_or_default("does/not/exist.toml");
        assert_eq!(config.target_fps, EngineConfig::default().target_fps);
    }
}
