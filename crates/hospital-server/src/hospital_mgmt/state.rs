//! Shared state for the hospital management endpoints.

use std::sync::Arc;
use std::time::Duration;

use hospital_db_memory::MemoryDriver;
use hospital_db_mongo::MongoDriver;
use hospital_storage::{
    Document, DocumentService, Driver, DynDocumentStore, RequestContext, StoreConfig,
};

use super::models::{Bed, Department, Patient};
use crate::config::{AppConfig, StorageBackend};

// =============================================================================
// App State
// =============================================================================

/// One document store per collection plus the per-request deadline.
#[derive(Clone)]
pub struct AppState {
    pub departments: DynDocumentStore<Department>,
    pub beds: DynDocumentStore<Bed>,
    pub patients: DynDocumentStore<Patient>,
    request_timeout: Duration,
}

impl AppState {
    /// Creates state from explicit stores.
    #[must_use]
    pub fn new(
        departments: DynDocumentStore<Department>,
        beds: DynDocumentStore<Bed>,
        patients: DynDocumentStore<Patient>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            departments,
            beds,
            patients,
            request_timeout,
        }
    }

    /// Builds the stores for the configured backend. Nothing connects until
    /// the first request needs a store.
    pub fn from_config(cfg: &AppConfig) -> Self {
        let mongo = &cfg.storage.mongo;
        let collections = &cfg.storage.collections;
        let settings = |collection: &str| mongo.store_config(collection);

        match cfg.storage.backend {
            StorageBackend::Mongo => {
                let driver = MongoDriver::new(mongo.driver_config());
                Self::new(
                    store(driver.clone(), &settings(&collections.departments)),
                    store(driver.clone(), &settings(&collections.beds)),
                    store(driver, &settings(&collections.patients)),
                    cfg.request_timeout(),
                )
            }
            StorageBackend::Memory => {
                let driver = MemoryDriver::new();
                Self::new(
                    store(driver.clone(), &settings(&collections.departments)),
                    store(driver.clone(), &settings(&collections.beds)),
                    store(driver, &settings(&collections.patients)),
                    cfg.request_timeout(),
                )
            }
        }
    }

    /// Process-local stores with default collection names.
    pub fn in_memory(request_timeout: Duration) -> Self {
        let driver = MemoryDriver::new();
        let settings = |collection: &str| {
            StoreConfig::new()
                .with_database("hospital-mgmt")
                .with_collection(collection)
        };
        Self::new(
            store(driver.clone(), &settings("departments")),
            store(driver.clone(), &settings("beds")),
            store(driver, &settings("patients")),
            request_timeout,
        )
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// A fresh context bounded by the request timeout.
    pub fn request_context(&self) -> RequestContext {
        RequestContext::with_timeout(self.request_timeout)
    }

    /// Releases every store connection. Failures are logged and skipped so
    /// the remaining stores still close.
    pub async fn disconnect_all(&self, ctx: &RequestContext) {
        let results = [
            (self.departments.collection().to_string(), self.departments.disconnect(ctx).await),
            (self.beds.collection().to_string(), self.beds.disconnect(ctx).await),
            (self.patients.collection().to_string(), self.patients.disconnect(ctx).await),
        ];
        for (collection, result) in results {
            if let Err(e) = result {
                tracing::warn!(collection = %collection, error = %e, "Failed to disconnect store");
            }
        }
    }
}

fn store<T, D>(driver: D, config: &StoreConfig) -> DynDocumentStore<T>
where
    T: Document,
    D: Driver,
{
    Arc::new(DocumentService::<T, D>::new(driver, config))
}
