use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_AI_API_URL: &str = "https://tcamp.qq.com/openai/chat/completions";
const DEFAULT_AI_MODEL: &str = "hunyuan-lite";
const DEFAULT_DATABASE_URL: &str = "sqlite://./data/cvfiller.db";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Read once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub ai_api_key: String,
    pub ai_api_url: String,
    pub ai_model: String,
    pub secret_key: String,
    pub database_url: String,
    pub token_ttl_days: i64,
    pub max_upload_bytes: usize,
    /// Where scoped extraction files are written. `None` means the OS temp dir.
    pub upload_tmp_dir: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            ai_api_key: require_env("AI_API_KEY")?,
            ai_api_url: env_or("AI_API_URL", DEFAULT_AI_API_URL),
            ai_model: env_or("AI_MODEL", DEFAULT_AI_MODEL),
            secret_key: require_env("SECRET_KEY")?,
            database_url: env_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            token_ttl_days: env_or("TOKEN_TTL_DAYS", "7")
                .parse::<i64>()
                .context("TOKEN_TTL_DAYS must be an integer")?,
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("MAX_UPLOAD_BYTES must be a byte count")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            upload_tmp_dir: std::env::var("UPLOAD_TMP_DIR").ok().map(PathBuf::from),
            port: env_or("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    /// Directory for scoped temp files, falling back to the OS default.
    pub fn scratch_dir(&self) -> PathBuf {
        self.upload_tmp_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
impl Config {
    /// Fixed configuration for router and auth tests.
    pub fn for_tests() -> Self {
        Config {
            ai_api_key: "test-key".to_string(),
            ai_api_url: "http://127.0.0.1:9/unused".to_string(),
            ai_model: DEFAULT_AI_MODEL.to_string(),
            secret_key: "test-secret".to_string(),
            database_url: "sqlite::memory:".to_string(),
            token_ttl_days: 7,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            upload_tmp_dir: None,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_dir_falls_back_to_os_temp() {
        let config = Config::for_tests();
        assert_eq!(config.scratch_dir(), std::env::temp_dir());
    }

    #[test]
    fn test_scratch_dir_uses_configured_dir() {
        let config = Config {
            upload_tmp_dir: Some(PathBuf::from("/var/tmp/cvfiller")),
            ..Config::for_tests()
        };
        assert_eq!(config.scratch_dir(), PathBuf::from("/var/tmp/cvfiller"));
    }
}
