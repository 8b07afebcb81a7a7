use hospital_db_mongo::MongoConfig;
use hospital_storage::StoreConfig;
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub otel: OtelConfig,
}

// Default derived via field defaults

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        // Server validations
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if self.server.request_timeout_ms == 0 {
            return Err("server.request_timeout_ms must be > 0".into());
        }
        if self.server.body_limit_bytes == 0 {
            return Err("server.body_limit_bytes must be > 0".into());
        }
        // Logging validation
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        // OTEL validation
        if self.otel.enabled && self.otel.endpoint.as_deref().unwrap_or("").is_empty() {
            return Err("otel.enabled=true requires otel.endpoint".into());
        }
        if let Some(ratio) = self.otel.sample_ratio {
            if !(0.0..=1.0).contains(&ratio) {
                return Err("otel.sample_ratio must be within 0.0..=1.0".into());
            }
        }
        // Storage validation
        let collections = &self.storage.collections;
        for (key, name) in [
            ("departments", &collections.departments),
            ("beds", &collections.beds),
            ("patients", &collections.patients),
        ] {
            if name.trim().is_empty() {
                return Err(format!("storage.collections.{key} must not be empty"));
            }
        }
        if let (Some(min), Some(max)) = (
            self.storage.mongo.min_pool_size,
            self.storage.mongo.max_pool_size,
        ) {
            if min > max {
                return Err("storage.mongo.min_pool_size must be <= max_pool_size".into());
            }
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }

    /// Deadline given to each request's store calls.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.request_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8080
}
fn default_body_limit() -> usize {
    1024 * 1024
}
fn default_request_timeout_ms() -> u64 {
    30_000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// Which document store backs the API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Mongo,
    /// Process-local store; data is lost on restart.
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mongo => write!(f, "mongo"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default)]
    pub mongo: MongoStorageConfig,
    #[serde(default)]
    pub collections: CollectionsConfig,
}

/// MongoDB settings.
///
/// Every connection field is optional: anything left out falls back to the
/// `AMBULANCE_API_MONGODB_*` environment variables and then to built-in
/// defaults when the store resolves its configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MongoStorageConfig {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
    /// Per-operation timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub max_pool_size: Option<u32>,
    #[serde(default)]
    pub min_pool_size: Option<u32>,
    /// Create the unique `id` index on first insert (default: true)
    #[serde(default)]
    pub ensure_id_index: Option<bool>,
}

impl MongoStorageConfig {
    /// Store settings for one collection.
    pub fn store_config(&self, collection: &str) -> StoreConfig {
        StoreConfig {
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
            collection: Some(collection.to_string()),
            timeout_secs: self.timeout_secs,
        }
    }

    pub fn driver_config(&self) -> MongoConfig {
        let mut config = MongoConfig::default()
            .with_pool_size(self.min_pool_size, self.max_pool_size)
            .with_ensure_id_index(self.ensure_id_index.unwrap_or(true));
        if let Some(name) = &self.app_name {
            config = config.with_app_name(name.clone());
        }
        config
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionsConfig {
    #[serde(default = "default_departments_collection")]
    pub departments: String,
    #[serde(default = "default_beds_collection")]
    pub beds: String,
    #[serde(default = "default_patients_collection")]
    pub patients: String,
}

fn default_departments_collection() -> String {
    "departments".into()
}
fn default_beds_collection() -> String {
    "beds".into()
}
fn default_patients_collection() -> String {
    "patients".into()
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            departments: default_departments_collection(),
            beds: default_beds_collection(),
            patients: default_patients_collection(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OtelConfig {
    #[serde(default)]
    pub enabled: bool,
    /// OTLP/HTTP collector endpoint, e.g. "http://localhost:4318/v1/traces"
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub sample_ratio: Option<f64>,
    /// Optional deployment environment label, e.g., "dev", "staging", "prod"
    #[serde(default)]
    pub environment: Option<String>,
}
// Default derived

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    /// Default configuration file looked up in the working directory.
    pub const DEFAULT_CONFIG_FILE: &str = "hospital.toml";

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_FILE));
        let mut builder = Config::builder();
        if pathbuf.exists() {
            builder = builder.add_source(File::from(pathbuf));
        }
        // Environment variable overrides, e.g., HOSPITAL__SERVER__PORT=9090
        builder = builder.add_source(
            Environment::with_prefix("HOSPITAL")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = AppConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.storage.backend, StorageBackend::Mongo);
        assert_eq!(cfg.storage.collections.beds, "beds");
        assert_eq!(cfg.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn invalid_host_falls_back_to_any() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "not-an-ip".into();
        cfg.server.port = 9000;
        assert_eq!(cfg.addr().to_string(), "0.0.0.0:9000");
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut cfg = AppConfig::default();
        cfg.logging.level = "loud".into();
        assert!(cfg.validate().unwrap_err().contains("logging.level"));

        let mut cfg = AppConfig::default();
        cfg.otel.enabled = true;
        assert!(cfg.validate().unwrap_err().contains("otel.endpoint"));

        let mut cfg = AppConfig::default();
        cfg.storage.collections.patients = " ".into();
        assert!(cfg.validate().unwrap_err().contains("collections.patients"));

        let mut cfg = AppConfig::default();
        cfg.storage.mongo.min_pool_size = Some(5);
        cfg.storage.mongo.max_pool_size = Some(2);
        assert!(cfg.validate().unwrap_err().contains("min_pool_size"));
    }

    #[test]
    fn mongo_section_maps_to_store_config() {
        let mongo = MongoStorageConfig {
            host: Some("db.local".into()),
            timeout_secs: Some(3),
            ..Default::default()
        };
        let store = mongo.store_config("beds");
        assert_eq!(store.host.as_deref(), Some("db.local"));
        assert_eq!(store.collection.as_deref(), Some("beds"));
        assert_eq!(store.timeout_secs, Some(3));
        assert_eq!(store.port, None);

        let driver = mongo.driver_config();
        assert!(driver.ensure_id_index);
    }
}
