use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

pub static CONFIG: OnceLock<BackendConfig> = OnceLock::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Space-Track credentials; empty means the authenticated source is
    /// not configured and the fetcher starts at the CelesTrak chain.
    #[serde(default)]
    pub space_track_username: String,

    #[serde(default)]
    pub space_track_password: String,

    #[serde(default = "default_space_track_timeout_secs")]
    pub space_track_timeout_secs: u64,

    /// Upper bound on how many GP records one query may return.
    #[serde(default = "default_space_track_limit")]
    pub space_track_limit: usize,

    #[serde(default = "default_celestrak_timeout_secs")]
    pub celestrak_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379/0".to_string()
}

fn default_space_track_timeout_secs() -> u64 {
    25
}

fn default_space_track_limit() -> usize {
    10000
}

fn default_celestrak_timeout_secs() -> u64 {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            redis_url: default_redis_url(),
            space_track_username: String::new(),
            space_track_password: String::new(),
            space_track_timeout_secs: default_space_track_timeout_secs(),
            space_track_limit: default_space_track_limit(),
            celestrak_timeout_secs: default_celestrak_timeout_secs(),
        }
    }
}

impl BackendConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BackendConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn has_space_track_credentials(&self) -> bool {
        !self.space_track_username.trim().is_empty()
            && !self.space_track_password.trim().is_empty()
    }

    /// Deployment secrets come from the environment, overriding the file.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("REDIS_URL") {
            if !url.trim().is_empty() {
                self.redis_url = url.trim().to_string();
            }
        }
        if let Ok(user) = std::env::var("SPACE_TRACK_USERNAME") {
            self.space_track_username = user.trim().to_string();
        }
        if let Ok(pass) = std::env::var("SPACE_TRACK_PASSWORD") {
            self.space_track_password = pass.trim().to_string();
        }
        if let Ok(timeout) = std::env::var("SPACE_TRACK_TIMEOUT") {
            if let Ok(secs) = timeout.trim().parse() {
                self.space_track_timeout_secs = secs;
            }
        }
        if let Ok(limit) = std::env::var("SPACE_TRACK_LIMIT") {
            if let Ok(n) = limit.trim().parse() {
                self.space_track_limit = n;
            }
        }
    }
}

/// Load `config.toml` if present (defaults fill any gaps), apply env
/// overrides, and publish the result into [`CONFIG`].
pub fn read_config() -> anyhow::Result<()> {
    let mut config = match BackendConfig::from_file("config.toml") {
        Ok(config) => config,
        Err(_) => BackendConfig::default(),
    };
    config.apply_env_overrides();

    CONFIG
        .set(config)
        .map_err(|_| anyhow::anyhow!("Configuration already initialized"))?;
    Ok(())
}
