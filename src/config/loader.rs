use super::defaults::DEFAULT_SPACECRAFT;
use super::errors::ConfigError;
use super::spacecraft::SpacecraftConfig;
use log::{info, warn};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const CONFIG_DIR: &str = "spacedock";
const CONFIG_FILE: &str = "spacecraft.json";
const FETCH_TIMEOUT_SECS: u64 = 10;

/// Where a spacecraft configuration comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    Url(String),
    Builtin,
}

impl ConfigSource {
    /// Interprets a command-line argument: `http(s)://` is fetched, anything
    /// else is a path. Without an argument the per-user config file is used
    /// when present.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            Some(s) if s.starts_with("http://") || s.starts_with("https://") => {
                ConfigSource::Url(s.to_string())
            }
            Some(s) => ConfigSource::File(PathBuf::from(s)),
            None => match default_config_path() {
                Some(path) if path.exists() => ConfigSource::File(path),
                _ => ConfigSource::Builtin,
            },
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

pub fn load(source: &ConfigSource) -> Result<SpacecraftConfig, ConfigError> {
    match source {
        ConfigSource::File(path) => {
            let contents = fs::read_to_string(path)?;
            SpacecraftConfig::from_json(&contents)
        }
        ConfigSource::Url(url) => SpacecraftConfig::from_json(&fetch(url)?),
        ConfigSource::Builtin => Ok(DEFAULT_SPACECRAFT.clone()),
    }
}

/// Loads the configuration, substituting the built-in spacecraft on any
/// failure. Returns the config and an optional status message for display.
pub fn load_or_default(source: &ConfigSource) -> (SpacecraftConfig, Option<String>) {
    match load(source) {
        Ok(config) => {
            info!(
                "Loaded spacecraft '{}' from {:?}: {} thrusters, {} reaction wheels, {} CMGs",
                config.name,
                source,
                config.thrusters.len(),
                config.reaction_wheels.len(),
                config.cmgs.len()
            );
            (config, None)
        }
        Err(e) => {
            let status = format!("Failed to load configuration from {:?}: {}", source, e);
            warn!("{}. Using built-in defaults.", status);
            (DEFAULT_SPACECRAFT.clone(), Some(status))
        }
    }
}

fn fetch(url: &str) -> Result<String, ConfigError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()?;
    let response = client.get(url).send()?;
    let status = response.status();

    if !status.is_success() {
        return Err(ConfigError::HttpStatus(status.as_u16()));
    }

    Ok(response.text()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn argument_selects_source() {
        assert_eq!(
            ConfigSource::from_arg(Some("https://example.org/craft.json")),
            ConfigSource::Url("https://example.org/craft.json".to_string())
        );
        assert_eq!(
            ConfigSource::from_arg(Some("craft.json")),
            ConfigSource::File(PathBuf::from("craft.json"))
        );
    }

    #[test]
    fn loads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut config = DEFAULT_SPACECRAFT.clone();
        config.name = "From disk".to_string();
        file.write_all(config.to_json().unwrap().as_bytes()).unwrap();

        let loaded = load(&ConfigSource::File(file.path().to_path_buf())).unwrap();
        assert_eq!(loaded.name, "From disk");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let source = ConfigSource::File(PathBuf::from("/nonexistent/spacecraft.json"));
        let (config, status) = load_or_default(&source);
        assert_eq!(config, *DEFAULT_SPACECRAFT);
        assert!(status.is_some());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ \"properties\": 42 }").unwrap();
        let (config, status) = load_or_default(&ConfigSource::File(file.path().to_path_buf()));
        assert_eq!(config, *DEFAULT_SPACECRAFT);
        assert!(status.unwrap().contains("JSON"));
    }
}
