//! Configuration types for the MongoDB driver.
//!
//! Host, credentials, database and collection come from
//! `hospital_storage::StoreConfig`; this only carries client tuning.

use serde::{Deserialize, Serialize};

/// Client options for the MongoDB driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
    /// Application name reported to the server.
    pub app_name: Option<String>,

    /// Maximum number of pooled connections.
    pub max_pool_size: Option<u32>,

    /// Minimum number of pooled connections.
    pub min_pool_size: Option<u32>,

    /// Create a unique index on `id` before the first insert into a collection.
    pub ensure_id_index: bool,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            app_name: Some("hospital-server".into()),
            max_pool_size: None,
            min_pool_size: None,
            ensure_id_index: true,
        }
    }
}

impl MongoConfig {
    #[must_use]
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    /// Sets the pool size bounds.
    #[must_use]
    pub fn with_pool_size(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min_pool_size = min;
        self.max_pool_size = max;
        self
    }

    #[must_use]
    pub fn with_ensure_id_index(mut self, ensure: bool) -> Self {
        self.ensure_id_index = ensure;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MongoConfig::default();
        assert_eq!(config.app_name.as_deref(), Some("hospital-server"));
        assert!(config.ensure_id_index);
        assert_eq!(config.max_pool_size, None);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MongoConfig::default()
            .with_app_name("ward-sync")
            .with_pool_size(Some(2), Some(20))
            .with_ensure_id_index(false);

        assert_eq!(config.app_name.as_deref(), Some("ward-sync"));
        assert_eq!(config.min_pool_size, Some(2));
        assert_eq!(config.max_pool_size, Some(20));
        assert!(!config.ensure_id_index);
    }

    #[test]
    fn test_partial_deserialization_keeps_defaults() {
        let config: MongoConfig = serde_json::from_str(r#"{"max_pool_size": 5}"#).unwrap();
        assert_eq!(config.max_pool_size, Some(5));
        assert!(config.ensure_id_index);
    }
}
