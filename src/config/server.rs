use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Ten years.
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365 * 10;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// Lifetime of tokens issued at register/login.
    pub token_ttl_hours: i64,
}

impl ServerConfig {
    /// Reads a TOML file. Keys missing from the file keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&self.token_ttl_hours) {
            return Err(Error::Config(format!(
                "token_ttl_hours must be between 1 and {MAX_TOKEN_TTL_HOURS}"
            )));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> std::result::Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("markstash.db")
    }

    pub fn token_ttl(&self) -> Result<chrono::Duration> {
        self.validate()?;
        chrono::Duration::try_hours(self.token_ttl_hours)
            .ok_or_else(|| Error::Config("token_ttl_hours is out of range".to_string()))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            token_ttl_hours: 168,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("markstash.toml");
        std::fs::write(&path, "port = 9000\ndata_dir = \"/var/lib/markstash\"\n").unwrap();

        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.token_ttl_hours, 168);
        assert_eq!(config.db_path(), PathBuf::from("/var/lib/markstash/markstash.db"));
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.toml");

        std::fs::write(&path, "port = \"not a number\"").unwrap();
        assert!(matches!(ServerConfig::load(&path), Err(Error::Config(_))));

        std::fs::write(&path, "token_ttl_hours = 0").unwrap();
        assert!(matches!(ServerConfig::load(&path), Err(Error::Config(_))));

        std::fs::write(&path, "token_ttl_hours = 100000000000").unwrap();
        assert!(matches!(ServerConfig::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_token_ttl_is_bounded() {
        let mut config = ServerConfig::default();
        assert_eq!(config.token_ttl().unwrap(), chrono::Duration::hours(168));

        config.token_ttl_hours = MAX_TOKEN_TTL_HOURS;
        assert!(config.token_ttl().is_ok());

        config.token_ttl_hours = i64::MAX;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
        assert!(matches!(config.token_ttl(), Err(Error::Config(_))));
    }

    #[test]
    fn test_socket_addr() {
        let addr = ServerConfig::default().socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }
}
