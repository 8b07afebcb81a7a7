//! In-memory document store driver for the hospital management service.
//!
//! This crate provides an implementation of the `Driver` trait from
//! `hospital-storage`, using papaya lock-free HashMap for concurrent access.
//! It backs the server when `storage.backend = "memory"` and doubles as a
//! test driver: it counts connections and can inject latency and failures.
//!
//! # Example
//!
//! ```ignore
//! use hospital_db_memory::MemoryDriver;
//! use hospital_storage::{DocumentService, DocumentStore, RequestContext, StoreConfig};
//!
//! let driver = MemoryDriver::new();
//! let beds = DocumentService::<Bed, _>::new(driver.clone(), &StoreConfig::new());
//! beds.create(&RequestContext::background(), "bed-1", &bed).await?;
//! assert_eq!(driver.connect_count(), 1);
//! ```

mod driver;
pub mod storage;

pub use driver::{MemoryConnection, MemoryDriver};
pub use storage::{InMemoryStore, StorageKey};
