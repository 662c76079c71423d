use std::path::PathBuf;

use config::ConfigError;
use serde::Deserialize;

use crate::utils;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub _data_dir: PathBuf,
    pub _config_dir: PathBuf,
    /// Endpoint serving the realtime payload.
    pub endpoint: String,
    pub data_refresh_secs: u64,
    pub request_timeout_secs: u64,
    pub discovery_retry_ms: u64,
    pub discovery_max_attempts: u64,
    /// Placeholder name used in the greeting until a payload carries one.
    pub user_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            _data_dir: PathBuf::new(),
            _config_dir: PathBuf::new(),
            endpoint: String::from("http://localhost:8080/api/realtime-data"),
            data_refresh_secs: 30,
            request_timeout_secs: 10,
            discovery_retry_ms: 100,
            discovery_max_attempts: 50,
            user_name: String::from("User"),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, ConfigError> {
        let data_dir = utils::get_data_dir();
        let config_dir = utils::get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("_data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("_config_dir", config_dir.to_string_lossy().to_string())?;

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.json", config::FileFormat::Json),
            ("config.yaml", config::FileFormat::Yaml),
            ("config.toml", config::FileFormat::Toml),
            ("config.ini", config::FileFormat::Ini),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            builder = builder.add_source(
                config::File::from(config_dir.join(file))
                    .format(*format)
                    .required(false),
            );
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            log::debug!("No configuration file found, using defaults");
        }

        // missing fields fall back to Default via serde
        let cfg: Self = builder.build()?.try_deserialize()?;

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.endpoint, "http://localhost:8080/api/realtime-data");
        assert_eq!(config.data_refresh_secs, 30);
        assert_eq!(config.discovery_retry_ms, 100);
        assert_eq!(config.discovery_max_attempts, 50);
        assert_eq!(config.user_name, "User");
    }

    #[test]
    fn test_new_without_config_file_is_ok() {
        // defaults are embedded, a config file is optional
        assert!(Config::new().is_ok());
    }
}
