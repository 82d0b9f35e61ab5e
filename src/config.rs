use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub security: SecurityConfig,

    pub site: SiteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Overridden by `DATABASE_URL`
    pub database_url: String,

    pub log_level: String,

    /// "pretty" or "json"
    pub log_format: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:blog.db".to_string(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,

    /// Overridden by `PORT`
    pub port: u16,

    /// Whether to set the Secure flag on session cookies.
    /// Leave false for local development without HTTPS.
    pub secure_cookies: bool,

    /// Sessions expire after this much inactivity.
    pub session_expiry_minutes: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 5000,
            secure_cookies: false,
            session_expiry_minutes: 60 * 24 * 7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Key material for signing session cookies. Overridden by `SECRET_KEY`.
    /// When unset a random key is generated and sessions do not survive restarts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,

    /// Argon2 memory cost in KiB
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    pub argon2_parallelism: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,

    pub subtitle: String,

    pub contact_email: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Quill".to_string(),
            subtitle: "A collection of random musings.".to_string(),
            contact_email: "hello@example.com".to_string(),
        }
    }
}

impl Config {
    /// Reads `path` when given, else the first config file found, then
    /// applies environment overrides.
    pub fn load_with_path(path: Option<&Path>) -> Result<Self> {
        let mut config = match Self::source_path(path) {
            Some(path) => Self::load_from_path(&path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// The file [`Config::load_with_path`] reads, or `None` when defaults apply.
    /// An explicit path is returned even if it does not exist so loading fails loudly.
    #[must_use]
    pub fn source_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        Self::config_paths().into_iter().find(|path| path.exists())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.general.database_url = url;
        }

        if let Some(key) = lookup("SECRET_KEY").filter(|v| !v.is_empty()) {
            self.security.secret_key = Some(key);
        }

        if let Some(port) = lookup("PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("quill").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".quill").join("config.toml"));
        }

        paths
    }

    pub fn validate(&self) -> Result<()> {
        if !self.general.database_url.starts_with("sqlite:") {
            anyhow::bail!(
                "Unsupported database URL '{}': only sqlite: URLs are supported",
                self.general.database_url
            );
        }

        if self.server.port == 0 {
            anyhow::bail!("Server port must be > 0");
        }

        if self.server.session_expiry_minutes <= 0 {
            anyhow::bail!("Session expiry must be > 0 minutes");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.database_url, "sqlite:blog.db");
        assert_eq!(config.server.port, 5000);
        assert!(config.security.secret_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [site]
            title = "My Blog"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.site.title, "My Blog");

        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("DATABASE_URL", "sqlite:/tmp/other.db"),
            ("SECRET_KEY", "s3cr3t"),
            ("PORT", "8080"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.general.database_url, "sqlite:/tmp/other.db");
        assert_eq!(config.security.secret_key.as_deref(), Some("s3cr3t"));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            "DATABASE_URL" | "SECRET_KEY" => Some(String::new()),
            "PORT" => Some("not-a-port".to_string()),
            _ => None,
        });

        assert_eq!(config.general.database_url, "sqlite:blog.db");
        assert!(config.security.secret_key.is_none());
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_explicit_source_path_wins() {
        let path = Path::new("/nonexistent/quill.toml");
        assert_eq!(Config::source_path(Some(path)), Some(path.to_path_buf()));
        assert!(Config::load_with_path(Some(path)).is_err());
    }

    #[test]
    fn test_validate_rejects_non_sqlite() {
        let mut config = Config::default();
        config.general.database_url = "postgres://localhost/blog".to_string();
        assert!(config.validate().is_err());
    }
}
