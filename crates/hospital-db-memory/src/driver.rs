use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use hospital_storage::{
    Connection, ConnectionSettings, DocumentFilter, Driver, DriverError, Namespace,
};
use serde_json::Value;
use tracing::debug;

use crate::storage::InMemoryStore;

/// Latency and failure knobs, shared by the driver and its connections.
#[derive(Debug, Default)]
struct Faults {
    connect_delay_ms: AtomicU64,
    operation_delay_ms: AtomicU64,
    refuse_connections: AtomicBool,
    unavailable: AtomicBool,
}

impl Faults {
    async fn delay(millis: &AtomicU64) {
        let millis = millis.load(Ordering::SeqCst);
        if millis > 0 {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }
}

#[derive(Debug, Default)]
struct ConnectionStats {
    opened: AtomicUsize,
    closed: AtomicUsize,
}

/// In-memory [`Driver`].
///
/// Clones share the same data, counters and fault settings, so a test can
/// keep one clone to inspect what a service did with the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryDriver {
    store: Arc<InMemoryStore>,
    faults: Arc<Faults>,
    stats: Arc<ConnectionStats>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A driver over existing data, e.g. one store shared by several services.
    pub fn with_store(store: Arc<InMemoryStore>) -> Self {
        Self {
            store,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_connect_delay(self, delay: Duration) -> Self {
        self.set_connect_delay(delay);
        self
    }

    #[must_use]
    pub fn with_operation_delay(self, delay: Duration) -> Self {
        self.set_operation_delay(delay);
        self
    }

    pub fn set_connect_delay(&self, delay: Duration) {
        self.faults
            .connect_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set_operation_delay(&self, delay: Duration) {
        self.faults
            .operation_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Makes subsequent connection attempts fail.
    pub fn refuse_connections(&self, refuse: bool) {
        self.faults
            .refuse_connections
            .store(refuse, Ordering::SeqCst);
    }

    /// Makes every operation on open connections fail.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.faults.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn store(&self) -> &Arc<InMemoryStore> {
        &self.store
    }

    /// Connections established so far.
    pub fn connect_count(&self) -> usize {
        self.stats.opened.load(Ordering::SeqCst)
    }

    /// Connections closed so far.
    pub fn close_count(&self) -> usize {
        self.stats.closed.load(Ordering::SeqCst)
    }

    pub fn open_connections(&self) -> usize {
        self.connect_count() - self.close_count()
    }
}

#[async_trait]
impl Driver for MemoryDriver {
    type Connection = MemoryConnection;

    fn scheme(&self) -> &'static str {
        "memory"
    }

    fn system(&self) -> &'static str {
        "memory"
    }

    async fn connect(
        &self,
        settings: &ConnectionSettings,
    ) -> Result<MemoryConnection, DriverError> {
        Faults::delay(&self.faults.connect_delay_ms).await;
        if self.faults.refuse_connections.load(Ordering::SeqCst) {
            return Err(DriverError::Connection(format!(
                "connection refused: {}",
                hospital_storage::mask_password(&settings.uri)
            )));
        }
        let number = self.stats.opened.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(connection = number, "Opened in-memory connection");
        Ok(MemoryConnection {
            store: Arc::clone(&self.store),
            faults: Arc::clone(&self.faults),
            stats: Arc::clone(&self.stats),
            closed: AtomicBool::new(false),
        })
    }
}

/// A connection handed out by [`MemoryDriver`].
#[derive(Debug)]
pub struct MemoryConnection {
    store: Arc<InMemoryStore>,
    faults: Arc<Faults>,
    stats: Arc<ConnectionStats>,
    closed: AtomicBool,
}

impl MemoryConnection {
    async fn ready(&self) -> Result<&InMemoryStore, DriverError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(DriverError::Connection("connection closed".into()));
        }
        Faults::delay(&self.faults.operation_delay_ms).await;
        if self.faults.unavailable.load(Ordering::SeqCst) {
            return Err(DriverError::Backend("store unavailable".into()));
        }
        Ok(&self.store)
    }
}

#[async_trait]
impl Connection for MemoryConnection {
    async fn find_one(
        &self,
        ns: &Namespace,
        filter: &DocumentFilter,
    ) -> Result<Option<Value>, DriverError> {
        Ok(self.ready().await?.find_one(ns, filter))
    }

    async fn insert_one(&self, ns: &Namespace, document: Value) -> Result<(), DriverError> {
        self.ready().await?.insert(ns, document)
    }

    async fn replace_one(
        &self,
        ns: &Namespace,
        filter: &DocumentFilter,
        document: Value,
    ) -> Result<(), DriverError> {
        self.ready().await?.replace(ns, filter, document)
    }

    async fn delete_one(&self, ns: &Namespace, filter: &DocumentFilter) -> Result<(), DriverError> {
        self.ready().await?.delete(ns, filter);
        Ok(())
    }

    async fn find(
        &self,
        ns: &Namespace,
        filter: &DocumentFilter,
    ) -> Result<Vec<Value>, DriverError> {
        Ok(self.ready().await?.find(ns, filter))
    }

    async fn close(&self) -> Result<(), DriverError> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.stats.closed.fetch_add(1, Ordering::SeqCst);
            debug!("Closed in-memory connection");
        }
        Ok(())
    }
}
