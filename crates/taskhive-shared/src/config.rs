//! Configuration loading: `.env` via `dotenvy`, then explicit env vars, with
//! CLI flags (owned by `taskhive-cli`) layered on top as the final override.

use std::env;

use crate::error::CoreError;

/// Storage backend mode. `Local` uses the embedded in-memory heap;
/// `ExternalStore` uses a Redis-compatible sorted-set store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    Local,
    ExternalStore,
}

impl BackendMode {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "local" => Ok(BackendMode::Local),
            "redis" | "external-store" | "external_store" => Ok(BackendMode::ExternalStore),
            other => Err(CoreError::Config(format!(
                "invalid mode: {other} (expected \"local\" or \"redis\")"
            ))),
        }
    }
}

/// Redis/external-store connection settings.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
        }
    }
}

/// Side-channel credentials for the `send_email` handler's transactional
/// email provider. Opaque to the core; carried through config the way the
/// original's `RootConfig.BREVO` block is, even though the core never reads
/// these fields itself.
#[derive(Debug, Clone, Default)]
pub struct BrevoConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub email: Option<String>,
}

/// Root application configuration, assembled from `.env`, environment
/// variables, and (by the CLI layer) flags.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub redis: RedisConfig,
    pub brevo: BrevoConfig,
    pub mode: BackendMode,
    pub workers: usize,
    /// `RUN_MODE=air` enables the original's development-mode behavior:
    /// verbose logging and unbuffered subprocess output.
    pub dev_mode: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            redis: RedisConfig::default(),
            brevo: BrevoConfig::default(),
            mode: BackendMode::Local,
            workers: 4,
            dev_mode: false,
        }
    }
}

impl AppConfig {
    /// Load `.env` (if present), then read environment variables, falling
    /// back to defaults for anything unset or malformed.
    pub fn load() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!(error = %e, "no .env file loaded");
        }

        let mut config = AppConfig::default();

        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            match port.parse() {
                Ok(p) => config.port = p,
                Err(e) => tracing::warn!(error = %e, value = %port, "invalid PORT, using default"),
            }
        }
        if let Ok(host) = env::var("REDIS_HOST") {
            config.redis.host = host;
        }
        if let Ok(port) = env::var("REDIS_PORT") {
            match port.parse() {
                Ok(p) => config.redis.port = p,
                Err(e) => {
                    tracing::warn!(error = %e, value = %port, "invalid REDIS_PORT, using default")
                }
            }
        }
        config.brevo.url = env::var("BREVO_URL").ok();
        config.brevo.api_key = env::var("BREVO_API_KEY").ok();
        config.brevo.email = env::var("BREVO_EMAIL").ok();

        if let Ok(mode) = env::var("MODE") {
            match BackendMode::parse(&mode) {
                Ok(m) => config.mode = m,
                Err(e) => tracing::warn!(error = %e, "invalid MODE, using default"),
            }
        }
        if let Ok(workers) = env::var("WORKERS") {
            match workers.parse() {
                Ok(w) => config.workers = w,
                Err(e) => {
                    tracing::warn!(error = %e, value = %workers, "invalid WORKERS, using default")
                }
            }
        }
        config.dev_mode = env::var("RUN_MODE").as_deref() == Ok("air");

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn backend_mode_parses_local_and_redis() {
        assert_eq!(BackendMode::parse("local").unwrap(), BackendMode::Local);
        assert_eq!(
            BackendMode::parse("redis").unwrap(),
            BackendMode::ExternalStore
        );
    }

    #[test]
    fn backend_mode_rejects_unknown() {
        assert!(BackendMode::parse("quantum").is_err());
    }

    #[test]
    #[serial]
    fn load_falls_back_to_defaults_without_env() {
        for var in ["HOST", "PORT", "MODE", "WORKERS", "RUN_MODE"] {
            env::remove_var(var);
        }
        let config = AppConfig::load();
        assert_eq!(config.port, 8080);
        assert_eq!(config.mode, BackendMode::Local);
        assert!(!config.dev_mode);
    }

    #[test]
    #[serial]
    fn load_honors_run_mode_air() {
        env::set_var("RUN_MODE", "air");
        let config = AppConfig::load();
        assert!(config.dev_mode);
        env::remove_var("RUN_MODE");
    }
}
