//! Store-agnostic driver seam.
//!
//! A [`Driver`] knows how to open a [`Connection`] to one kind of document
//! database. Connections speak raw JSON documents; typing, probing and
//! tracing live in [`DocumentService`](crate::DocumentService).

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;
use crate::filter::DocumentFilter;

/// Everything a driver needs to establish a connection.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    /// Full connection URI, credentials included when configured.
    pub uri: String,
    /// Bound on connection establishment.
    pub connect_timeout: Duration,
}

/// Database and collection an operation targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    pub database: String,
    pub collection: String,
}

impl Namespace {
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
        }
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}

/// Errors reported by a driver.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("connection failed: {0}")]
    Connection(String),

    /// A unique index rejected the write.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("codec failure: {0}")]
    Codec(String),

    #[error("{0}")]
    Backend(String),
}

impl DriverError {
    /// Maps a driver failure onto the store taxonomy.
    ///
    /// A duplicate key can only surface when two writers race past the
    /// existence check; it is reported as the conflict that check would
    /// have produced.
    pub fn into_store_error(self, ns: &Namespace, id: Option<&str>) -> StoreError {
        match self {
            DriverError::Connection(message) => StoreError::connection(message),
            DriverError::DuplicateKey(message) => match id {
                Some(id) => StoreError::conflict(&ns.collection, id),
                None => StoreError::backend(message),
            },
            DriverError::Codec(message) => StoreError::decode(message),
            DriverError::Backend(message) => StoreError::backend(message),
        }
    }
}

/// Opens connections to one kind of document store.
#[async_trait]
pub trait Driver: Send + Sync + 'static {
    type Connection: Connection;

    /// URI scheme used when building [`ConnectionSettings::uri`].
    fn scheme(&self) -> &'static str;

    /// Short system name recorded on spans, e.g. `mongodb`.
    fn system(&self) -> &'static str;

    /// Establishes a ready-to-use connection.
    async fn connect(&self, settings: &ConnectionSettings) -> Result<Self::Connection, DriverError>;
}

/// A live connection. Implementations must tolerate concurrent use.
#[async_trait]
pub trait Connection: Send + Sync + 'static {
    async fn find_one(
        &self,
        ns: &Namespace,
        filter: &DocumentFilter,
    ) -> Result<Option<Value>, DriverError>;

    async fn insert_one(&self, ns: &Namespace, document: Value) -> Result<(), DriverError>;

    /// Replaces the first document matching `filter` wholesale.
    async fn replace_one(
        &self,
        ns: &Namespace,
        filter: &DocumentFilter,
        document: Value,
    ) -> Result<(), DriverError>;

    async fn delete_one(&self, ns: &Namespace, filter: &DocumentFilter) -> Result<(), DriverError>;

    /// All matching documents in store order.
    async fn find(&self, ns: &Namespace, filter: &DocumentFilter)
    -> Result<Vec<Value>, DriverError>;

    /// Releases the underlying resources. Called at most once per connection.
    async fn close(&self) -> Result<(), DriverError>;
}
