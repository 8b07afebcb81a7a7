//! MongoDB document store driver for the hospital management service.
//!
//! This crate provides a MongoDB implementation of the `Driver` trait
//! from `hospital-storage`, using the official `mongodb` client.
//!
//! # Example
//!
//! ```ignore
//! use hospital_db_mongo::{MongoConfig, MongoDriver};
//! use hospital_storage::{DocumentService, DocumentStore, RequestContext, StoreConfig};
//!
//! let driver = MongoDriver::new(MongoConfig::default().with_pool_size(None, Some(20)));
//! let patients = DocumentService::<Patient, _>::new(
//!     driver,
//!     &StoreConfig::new().with_collection("patients"),
//! );
//! let patient = patients.find(&RequestContext::background(), "pat-001").await?;
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Client tuning options
//! - [`error`]: Error types and server error classification
//! - [`codec`]: JSON ↔ BSON conversion
//! - `driver`: The `Driver` and `Connection` implementations

pub mod codec;
pub mod config;
mod driver;
pub mod error;

pub use config::MongoConfig;
pub use driver::{MongoConnection, MongoDriver};
pub use error::{MongoError, Result};
