//! Configuration management

use anyhow::Context;
use ingestor_common::logging::LogConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::storage::StorageConfig;

// ============================================================================
// Server Configuration Constants
// ============================================================================

/// Default server host binding.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 8000;

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default CORS allowed origin.
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "*";

/// Default service name, used in startup logs and as the log file prefix.
pub const DEFAULT_SERVICE_NAME: &str = "batch-ingestor";

/// Filter applied when `LOG_FILTER` is unset; keeps the AWS SDK and hyper quiet.
pub const DEFAULT_LOG_FILTER: &str = "aws_config=warn,aws_smithy_runtime=warn,hyper=warn";

/// Seed the process environment from a `.env` file.
///
/// With no path, a `.env` in the working directory or its parents is used if
/// present. Variables already set in the process are never overwritten.
pub fn seed_env(env_file: Option<&Path>) -> anyhow::Result<()> {
    match env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to read env file {}", path.display()))?;
        },
        None => {
            dotenvy::dotenv().ok();
        },
    }
    Ok(())
}

/// Logging configuration, read after the environment has been seeded
pub fn load_log_config(env_file: Option<&Path>) -> anyhow::Result<LogConfig> {
    seed_env(env_file)?;

    let mut log_config = LogConfig::from_env()?;
    if log_config.filter_directives.is_none() {
        log_config.filter_directives = Some(DEFAULT_LOG_FILTER.to_string());
    }
    Ok(log_config)
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub service_name: String,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub cors: CorsConfig,
}

/// Server-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        seed_env(None)?;

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from a key lookup and validate it
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Config {
            service_name: lookup("SERVICE_NAME")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),
            server: ServerConfig {
                host: lookup("INGESTOR_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
                port: lookup("INGESTOR_PORT")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_SERVER_PORT),
                shutdown_timeout_secs: lookup("INGESTOR_SHUTDOWN_TIMEOUT")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            },
            storage: StorageConfig::from_lookup(&lookup)?,
            cors: CorsConfig {
                allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|| DEFAULT_CORS_ALLOWED_ORIGIN.to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                allow_credentials: lookup("CORS_ALLOW_CREDENTIALS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(false),
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        self.storage.validate()?;

        if self.cors.allow_credentials && self.allows_any_origin() {
            anyhow::bail!("CORS_ALLOW_CREDENTIALS cannot be combined with a wildcard origin");
        }

        if self.cors.allowed_origins.is_empty() {
            tracing::warn!("No CORS origins configured - all origins will be allowed");
        }

        Ok(())
    }

    fn allows_any_origin(&self) -> bool {
        self.cors.allowed_origins.is_empty() || self.cors.allowed_origins.iter().any(|o| o == "*")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: DEFAULT_SERVER_PORT,
                shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            },
            storage: StorageConfig::default(),
            cors: CorsConfig {
                allowed_origins: vec![DEFAULT_CORS_ALLOWED_ORIGIN.to_string()],
                allow_credentials: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageBackend;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[("S3_BUCKET", "bucket")])).unwrap();

        assert_eq!(config.service_name, "batch-ingestor");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.shutdown_timeout_secs, 30);
        assert_eq!(config.storage.backend, StorageBackend::ObjectStore);
        assert_eq!(config.storage.region, "us-east-1");
        assert_eq!(config.cors.allowed_origins, vec!["*".to_string()]);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("SERVICE_NAME", "edge-ingestor"),
            ("INGESTOR_HOST", "0.0.0.0"),
            ("INGESTOR_PORT", "9090"),
            ("STORAGE_BACKEND", "dynamodb"),
            ("DDB_TABLE", "items"),
            ("AWS_REGION", "ap-southeast-2"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test"),
        ]))
        .unwrap();

        assert_eq!(config.service_name, "edge-ingestor");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.storage.backend, StorageBackend::KeyedTable);
        assert_eq!(config.storage.region, "ap-southeast-2");
        assert_eq!(
            config.cors.allowed_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn test_missing_bucket_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("S3_BUCKET"));
    }

    #[test]
    fn test_unknown_backend_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[("STORAGE_BACKEND", "postgres")])).unwrap_err();
        assert!(err.to_string().contains("Unsupported storage backend"));
    }

    #[test]
    fn test_zero_port_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("S3_BUCKET", "bucket"),
            ("INGESTOR_PORT", "0"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("port"));
    }

    #[test]
    fn test_credentials_with_wildcard_origin_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("S3_BUCKET", "bucket"),
            ("CORS_ALLOW_CREDENTIALS", "true"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("CORS_ALLOW_CREDENTIALS"));
    }
}
