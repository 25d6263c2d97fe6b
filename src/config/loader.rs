//! Configuration loading utilities
//!
//! Resolves the config file location and layers environment overrides on top.

use crate::{Result, config::Settings};
use std::path::Path;
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "PLAYLIST_BRIDGE_CONFIG";

/// Configuration loader with multiple source support
#[derive(Debug)]
pub struct ConfigLoader {
    /// Default settings
    defaults: Settings,
}

impl ConfigLoader {
    /// Create new configuration loader
    pub fn new() -> Self {
        Self {
            defaults: Settings::default(),
        }
    }

    /// Get the config file path from PLAYLIST_BRIDGE_CONFIG or the default location
    ///
    /// Priority:
    /// 1. PLAYLIST_BRIDGE_CONFIG environment variable
    /// 2. ~/.config/playlist-bridge/config.toml (or platform equivalent)
    pub fn get_config_path() -> Option<std::path::PathBuf> {
        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            let path = std::path::PathBuf::from(config_path);
            if path.exists() {
                debug!("Using config file from {}: {:?}", CONFIG_ENV_VAR, path);
                return Some(path);
            } else {
                warn!("{} points to non-existent file: {:?}", CONFIG_ENV_VAR, path);
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let default_path = config_dir.join("playlist-bridge").join("config.toml");
            if default_path.exists() {
                debug!("Using default config file: {:?}", default_path);
                return Some(default_path);
            }
        }

        debug!("No config file found");
        None
    }

    /// Load configuration with precedence order:
    /// 1. Environment variables
    /// 2. Configuration file
    /// 3. Default values (lowest priority)
    ///
    /// Command line flags are applied by the caller afterwards.
    pub fn load(&self, config_file: Option<&Path>) -> Result<Settings> {
        let mut settings = self.defaults.clone();

        if let Some(path) = config_file {
            if path.exists() {
                info!("Loading configuration from file: {:?}", path);
                settings = Settings::from_file(path)?;
            } else {
                warn!("Configuration file not found: {:?}, using defaults", path);
            }
        }

        debug!("Applying environment variable overrides");
        settings = settings.merge_with_env()?;

        settings.validate()?;

        debug!("Final configuration: {:?}", settings);

        Ok(settings)
    }

    /// Load configuration from environment only
    pub fn from_env_only(&self) -> Result<Settings> {
        let settings = Settings::from_env()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Get default configuration
    pub fn defaults(&self) -> &Settings {
        &self.defaults
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Static mutex to ensure environment variable tests don't interfere with each other
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_load_defaults() {
        let loader = ConfigLoader::new();
        let defaults = loader.defaults();
        assert_eq!(defaults.spotify.batch.chunk_size, 100);
        assert_eq!(defaults.youtube.page_size, 50);
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap();

        let loader = ConfigLoader::new();
        let settings = loader
            .load(Some(Path::new("/definitely/not/here/config.toml")))
            .unwrap();
        assert_eq!(settings.spotify.retry.max_retries, 3);
    }

    #[test]
    fn test_load_rejects_invalid_file_values() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap();

        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[spotify.batch]
chunk_size = 250
        "#
        )
        .unwrap();

        let loader = ConfigLoader::new();
        let result = loader.load(Some(temp_file.path()));
        assert!(matches!(result, Err(crate::Error::Config { .. })));
    }

    #[test]
    fn test_env_var_override() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap();

        let original_id = std::env::var("SPOTIFY_CLIENT_ID").ok();
        let original_key = std::env::var("YOUTUBE_API_KEY").ok();

        unsafe {
            std::env::set_var("SPOTIFY_CLIENT_ID", "env-client-id");
            std::env::set_var("YOUTUBE_API_KEY", "env-api-key");
        }

        let loader = ConfigLoader::new();
        let settings = loader.from_env_only().unwrap();

        assert_eq!(settings.spotify.client_id.expose(), "env-client-id");
        assert_eq!(settings.youtube.api_key.expose(), "env-api-key");

        unsafe {
            std::env::remove_var("SPOTIFY_CLIENT_ID");
            std::env::remove_var("YOUTUBE_API_KEY");

            if let Some(id) = original_id {
                std::env::set_var("SPOTIFY_CLIENT_ID", id);
            }
            if let Some(key) = original_key {
                std::env::set_var("YOUTUBE_API_KEY", key);
            }
        }
    }
}
