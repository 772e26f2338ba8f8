use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to read admin secret file {path}: {source}")]
    SecretFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub admin: AdminConfig,
    pub identity: IdentityConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./data/quickpoll.db?mode=rwc".to_string(),
            max_connections: 8,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Shared secret for `GET /api/polls/admin`. Empty disables the listing.
    pub secret: String,
    /// File holding the secret (e.g. a mounted container secret). Wins over `secret`.
    pub secret_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Header the reverse proxy sets to the client address.
    pub client_ip_header: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            client_ip_header: quickpoll_core::identity::DEFAULT_CLIENT_IP_HEADER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub json: bool,
}

impl Config {
    /// Load `path` (defaults when it does not exist), then apply the secret
    /// file and `QUICKPOLL_*` environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            Self::parse(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            Self::default()
        };

        config.load_secret_file()?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    fn load_secret_file(&mut self) -> Result<(), ConfigError> {
        let Some(path) = &self.admin.secret_file else {
            return Ok(());
        };
        let secret = std::fs::read_to_string(path).map_err(|source| ConfigError::SecretFile {
            path: path.clone(),
            source,
        })?;
        self.admin.secret = secret.trim().to_string();
        Ok(())
    }

    /// Non-empty values returned by `lookup` replace the matching fields.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("QUICKPOLL_BIND_ADDRESS") {
            self.server.bind_address = v;
        }
        if let Some(v) = get("QUICKPOLL_DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(v) = get("QUICKPOLL_ADMIN_SECRET") {
            self.admin.secret = v.trim().to_string();
        }
        if let Some(v) = get("QUICKPOLL_CLIENT_IP_HEADER") {
            self.identity.client_ip_header = v;
        }
    }

    /// Filesystem path of the SQLite database, if the URL names a file.
    /// Accepts both `sqlite:path` and `sqlite://path`.
    pub fn sqlite_path(&self) -> Option<&Path> {
        let rest = self.database.url.strip_prefix("sqlite:")?;
        let rest = rest.strip_prefix("//").unwrap_or(rest);
        rest.split('?')
            .next()
            .filter(|s| !s.is_empty() && *s != ":memory:")
            .map(Path::new)
    }
}
