use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub ping: PingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PingConfig {
    pub default_host: String,
    pub timeout_ms: u64,
}

impl Default for PingConfig {
    fn default() -> Self {
        PingConfig {
            default_host: "google.com".to_string(),
            timeout_ms: 5000,
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("nanograph").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.server.bind, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.ping.default_host, "google.com");
        assert_eq!(config.ping.timeout_ms, 5000);
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[server]
port = 9100
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9100);
        // Other fields should be defaults
        assert_eq!(config.server.bind, "127.0.0.1");
        assert_eq!(config.ping.timeout_ms, 5000);
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[server]
bind = "0.0.0.0"
port = 9000

[ping]
default_host = "example.org"
timeout_ms = 2500
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.ping.default_host, "example.org");
        assert_eq!(config.ping.timeout_ms, 2500);
    }

    #[test]
    fn missing_file_returns_default() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.toml"));
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn invalid_toml_returns_default() {
        let temp = std::env::temp_dir().join("nanograph_test_invalid.toml");
        std::fs::write(&temp, "this is not valid toml {{{{").unwrap();
        let config = load_config_from_path(&temp);
        assert_eq!(config.server.port, 8000);
        let _ = std::fs::remove_file(&temp);
    }
}
