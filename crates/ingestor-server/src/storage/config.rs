use serde::{Deserialize, Serialize};

use super::StorageError;

/// Default AWS region when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Which storage backend persists ingested items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StorageBackend {
    /// One JSON object per item in an S3 bucket
    #[default]
    #[serde(rename = "s3")]
    ObjectStore,
    /// One row per item in a DynamoDB table keyed by `PK`/`SK`
    #[serde(rename = "dynamodb")]
    KeyedTable,
}

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageBackend::ObjectStore => "s3",
            StorageBackend::KeyedTable => "dynamodb",
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s3" | "object_store" => Ok(StorageBackend::ObjectStore),
            "dynamodb" | "keyed_table" => Ok(StorageBackend::KeyedTable),
            other => Err(StorageError::Configuration(format!(
                "Unsupported storage backend: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub region: String,
    /// Required when `backend` is `ObjectStore`
    pub bucket: Option<String>,
    /// Required when `backend` is `KeyedTable`
    pub table: Option<String>,
    /// S3 endpoint override (MinIO, LocalStack, test doubles)
    pub s3_endpoint: Option<String>,
    /// DynamoDB endpoint override (DynamoDB Local, LocalStack, test doubles)
    pub dynamodb_endpoint: Option<String>,
    /// Static credentials; the default AWS provider chain is used when absent
    pub access_key: Option<String>,
    #[serde(skip_serializing)]
    pub secret_key: Option<String>,
    pub path_style: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            region: DEFAULT_REGION.to_string(),
            bucket: None,
            table: None,
            s3_endpoint: None,
            dynamodb_endpoint: None,
            access_key: None,
            secret_key: None,
            path_style: false,
        }
    }
}

impl StorageConfig {
    /// Build storage settings from a key lookup (normally the process environment)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StorageError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match non_empty("STORAGE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => StorageBackend::default(),
        };

        Ok(Self {
            backend,
            region: non_empty("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            bucket: non_empty("S3_BUCKET"),
            table: non_empty("DDB_TABLE"),
            s3_endpoint: non_empty("S3_ENDPOINT"),
            dynamodb_endpoint: non_empty("DDB_ENDPOINT"),
            access_key: non_empty("AWS_ACCESS_KEY_ID"),
            secret_key: non_empty("AWS_SECRET_ACCESS_KEY"),
            path_style: non_empty("S3_PATH_STYLE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        })
    }

    pub fn from_env() -> Result<Self, StorageError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Object-store settings pointing at a custom endpoint (MinIO, test doubles)
    pub fn for_object_store(endpoint: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            backend: StorageBackend::ObjectStore,
            bucket: Some(bucket.into()),
            s3_endpoint: Some(endpoint.into()),
            access_key: Some("test-access-key".to_string()),
            secret_key: Some("test-secret-key".to_string()),
            path_style: true,
            ..Self::default()
        }
    }

    /// Keyed-table settings pointing at a custom endpoint (DynamoDB Local, test doubles)
    pub fn for_keyed_table(endpoint: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            backend: StorageBackend::KeyedTable,
            table: Some(table.into()),
            dynamodb_endpoint: Some(endpoint.into()),
            access_key: Some("test-access-key".to_string()),
            secret_key: Some("test-secret-key".to_string()),
            ..Self::default()
        }
    }

    /// Bucket name, or a configuration error if the object store was chosen without one
    pub fn require_bucket(&self) -> Result<&str, StorageError> {
        self.bucket.as_deref().ok_or_else(|| {
            StorageError::Configuration(
                "S3_BUCKET environment variable is required for S3 storage".to_string(),
            )
        })
    }

    /// Table name, or a configuration error if the keyed table was chosen without one
    pub fn require_table(&self) -> Result<&str, StorageError> {
        self.table.as_deref().ok_or_else(|| {
            StorageError::Configuration(
                "DDB_TABLE environment variable is required for DynamoDB storage".to_string(),
            )
        })
    }

    /// Check that the selected backend has everything it needs
    pub fn validate(&self) -> Result<(), StorageError> {
        match self.backend {
            StorageBackend::ObjectStore => self.require_bucket().map(|_| ()),
            StorageBackend::KeyedTable => self.require_table().map(|_| ()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_select_object_store() {
        let config = StorageConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.backend, StorageBackend::ObjectStore);
        assert_eq!(config.region, "us-east-1");
        assert!(config.bucket.is_none());
        assert!(!config.path_style);
    }

    #[test]
    fn test_keyed_table_from_lookup() {
        let config = StorageConfig::from_lookup(lookup_from(&[
            ("STORAGE_BACKEND", "dynamodb"),
            ("AWS_REGION", "eu-west-1"),
            ("DDB_TABLE", "items"),
            ("DDB_ENDPOINT", "http://localhost:8001"),
        ]))
        .unwrap();

        assert_eq!(config.backend, StorageBackend::KeyedTable);
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.require_table().unwrap(), "items");
        assert_eq!(config.dynamodb_endpoint.as_deref(), Some("http://localhost:8001"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_backend_aliases() {
        assert_eq!("S3".parse::<StorageBackend>().unwrap(), StorageBackend::ObjectStore);
        assert_eq!(
            "object_store".parse::<StorageBackend>().unwrap(),
            StorageBackend::ObjectStore
        );
        assert_eq!(
            "keyed_table".parse::<StorageBackend>().unwrap(),
            StorageBackend::KeyedTable
        );
        assert!(matches!(
            "postgres".parse::<StorageBackend>(),
            Err(StorageError::Configuration(_))
        ));
    }

    #[test]
    fn test_missing_bucket_fails_validation() {
        let config = StorageConfig {
            backend: StorageBackend::ObjectStore,
            ..StorageConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("S3_BUCKET"));
    }

    #[test]
    fn test_missing_table_fails_validation() {
        let config = StorageConfig {
            backend: StorageBackend::KeyedTable,
            bucket: Some("not-used".to_string()),
            ..StorageConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("DDB_TABLE"));
    }

    #[test]
    fn test_empty_values_are_treated_as_missing() {
        let config =
            StorageConfig::from_lookup(lookup_from(&[("S3_BUCKET", "  "), ("AWS_REGION", "")]))
                .unwrap();
        assert!(config.bucket.is_none());
        assert_eq!(config.region, DEFAULT_REGION);
    }

    #[test]
    fn test_for_object_store() {
        let config = StorageConfig::for_object_store("http://localhost:9000", "test-bucket");
        assert_eq!(config.s3_endpoint.as_deref(), Some("http://localhost:9000"));
        assert_eq!(config.require_bucket().unwrap(), "test-bucket");
        assert!(config.path_style);
    }

    #[test]
    fn test_backend_serializes_as_env_value() {
        assert_eq!(
            serde_json::to_value(StorageBackend::KeyedTable).unwrap(),
            serde_json::json!("dynamodb")
        );
        assert_eq!(StorageBackend::ObjectStore.to_string(), "s3");
    }
}
