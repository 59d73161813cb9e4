use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Application configuration
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub window: WindowConfig,
    pub ui: UiConfig,
}

/// Backend connection configuration
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ServerConfig {
    /// Base URL of the inventory backend
    pub base_url: String,
}

/// Initial window geometry
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

/// UI behavior configuration
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UiConfig {
    /// Seconds a status bar message stays visible
    pub message_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                base_url: "http://localhost:8080".to_string(),
            },
            window: WindowConfig {
                width: 1000.0,
                height: 640.0,
            },
            ui: UiConfig {
                message_timeout_secs: 5,
            },
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Option<PathBuf> {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "stowage") {
            let config_dir = proj_dirs.config_dir();
            return Some(config_dir.join("config.toml"));
        }
        None
    }

    /// Load configuration from file, or return defaults if file doesn't exist
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                match fs::read_to_string(&path) {
                    Ok(contents) => match toml::from_str::<Config>(&contents) {
                        Ok(config) => return config,
                        Err(err) => {
                            tracing::warn!(path = %path.display(), error = %err, "Failed to parse config file, using defaults");
                        }
                    },
                    Err(err) => {
                        tracing::warn!(path = %path.display(), error = %err, "Failed to read config file, using defaults");
                    }
                }
            }
        }
        Config::default()
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }

            let contents = toml::to_string_pretty(self)?;
            fs::write(&path, contents)?;
            return Ok(());
        }

        Err("Could not determine config directory".into())
    }

    /// Create a default config file if it doesn't exist
    pub fn create_default() -> Result<(), Box<dyn std::error::Error>> {
        if let Some(path) = Self::config_path() {
            if !path.exists() {
                let config = Config::default();
                config.save()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.base_url, "http://localhost:8080");
        assert_eq!(config.window.width, 1000.0);
        assert_eq!(config.ui.message_timeout_secs, 5);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).expect("Failed to serialize");
        let deserialized: Config = toml::from_str(&toml_str).expect("Failed to deserialize");
        assert_eq!(config.server.base_url, deserialized.server.base_url);
        assert_eq!(
            config.ui.message_timeout_secs,
            deserialized.ui.message_timeout_secs
        );
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.server.base_url = "https://stash.example.net".to_string();
        fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded: Config = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.server.base_url, "https://stash.example.net");
    }
}
