pub mod config;
pub mod handlers;
pub mod hospital_mgmt;
pub mod middleware;
pub mod observability;
pub mod server;

pub use config::{
    AppConfig, CollectionsConfig, LoggingConfig, MongoStorageConfig, OtelConfig, ServerConfig,
    StorageBackend, StorageConfig,
};
pub use hospital_mgmt::AppState;
pub use observability::{init_tracing, shutdown_tracing};
pub use server::{HospitalServer, ServerBuilder, build_app};
