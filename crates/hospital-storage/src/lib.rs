//! # hospital-storage
//!
//! Typed document store access layer for the hospital management service.
//!
//! This crate defines the [`DocumentStore`] contract, the generic
//! [`DocumentService`] that implements it over any [`Driver`], and the
//! ambient pieces every operation shares: store configuration,
//! request-scoped deadlines, the error taxonomy and span bracketing.
//! Concrete drivers live in separate crates.
//!
//! ## Example
//!
//! ```ignore
//! use hospital_storage::{DocumentService, DocumentStore, RequestContext, StoreConfig};
//!
//! let beds = DocumentService::<Bed, _>::new(
//!     MongoDriver::default(),
//!     &StoreConfig::new().with_collection("beds"),
//! );
//! let ctx = RequestContext::background();
//! beds.create(&ctx, "bed-1", &bed).await?;
//! let bed: Bed = beds.find(&ctx, "bed-1").await?;
//! ```
//!
//! ## Drivers
//!
//! To support another database, implement [`Driver`] and [`Connection`].
//! Connections exchange plain JSON documents keyed by an `id` field;
//! probing, typing and tracing are handled by [`DocumentService`].

mod config;
mod context;
mod driver;
mod error;
mod filter;
mod service;
mod traced;
mod traits;

use std::sync::Arc;

pub use config::{
    ENV_COLLECTION, ENV_DATABASE, ENV_HOST, ENV_PASSWORD, ENV_PORT, ENV_TIMEOUT_SECONDS,
    ENV_USERNAME, ResolvedStoreConfig, StoreConfig, mask_password,
};
pub use context::{RequestContext, Scope};
pub use driver::{Connection, ConnectionSettings, Driver, DriverError, Namespace};
pub use error::{ErrorCategory, StoreError, TransportError};
pub use filter::{DocumentFilter, ID_FIELD};
pub use service::DocumentService;
pub use traced::{operation_span, traced};
pub use traits::{Document, DocumentStore};

/// Type alias for a shared, dynamically dispatched document store.
pub type DynDocumentStore<T> = Arc<dyn DocumentStore<T>>;

/// Result type for document store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use hospital_storage::prelude::*;
/// ```
pub mod prelude {
    pub use crate::context::RequestContext;
    pub use crate::error::{ErrorCategory, StoreError};
    pub use crate::filter::DocumentFilter;
    pub use crate::service::DocumentService;
    pub use crate::traits::{Document, DocumentStore};
    pub use crate::{DynDocumentStore, StoreResult};
}
