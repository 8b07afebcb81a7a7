//! [`Driver`] implementation over the official MongoDB client.

use async_trait::async_trait;
use dashmap::DashSet;
use futures_util::TryStreamExt;
use hospital_storage::{
    Connection, ConnectionSettings, DocumentFilter, Driver, DriverError, Namespace, mask_password,
};
use mongodb::bson::{Document, doc};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::codec::{filter_document, from_document, to_document};
use crate::config::MongoConfig;
use crate::error::{MongoError, Result};

/// Connects to MongoDB.
#[derive(Debug, Clone, Default)]
pub struct MongoDriver {
    config: MongoConfig,
}

impl MongoDriver {
    pub fn new(config: MongoConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MongoConfig {
        &self.config
    }
}

#[async_trait]
impl Driver for MongoDriver {
    type Connection = MongoConnection;

    fn scheme(&self) -> &'static str {
        "mongodb"
    }

    fn system(&self) -> &'static str {
        "mongodb"
    }

    async fn connect(
        &self,
        settings: &ConnectionSettings,
    ) -> std::result::Result<MongoConnection, DriverError> {
        Ok(create_client(&self.config, settings).await?)
    }
}

/// Creates a client and verifies the server answers a ping.
#[instrument(skip_all, fields(uri = %mask_password(&settings.uri)))]
async fn create_client(
    config: &MongoConfig,
    settings: &ConnectionSettings,
) -> Result<MongoConnection> {
    info!(
        app_name = ?config.app_name,
        max_pool_size = ?config.max_pool_size,
        min_pool_size = ?config.min_pool_size,
        connect_timeout_ms = settings.connect_timeout.as_millis() as u64,
        "Creating MongoDB client"
    );

    let mut options = ClientOptions::parse(&settings.uri).await?;
    options.app_name = config.app_name.clone();
    options.connect_timeout = Some(settings.connect_timeout);
    options.server_selection_timeout = Some(settings.connect_timeout);
    options.max_pool_size = config.max_pool_size;
    options.min_pool_size = config.min_pool_size;

    let client = Client::with_options(options)?;
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await?;

    debug!("MongoDB client connected");

    Ok(MongoConnection {
        client,
        ensure_id_index: config.ensure_id_index,
        indexed: DashSet::new(),
    })
}

/// A pooled MongoDB client.
#[derive(Debug)]
pub struct MongoConnection {
    client: Client,
    ensure_id_index: bool,
    /// Collections whose `id` index has been ensured on this connection.
    indexed: DashSet<Namespace>,
}

impl MongoConnection {
    pub fn client(&self) -> &Client {
        &self.client
    }

    fn collection(&self, ns: &Namespace) -> Collection<Document> {
        self.client
            .database(&ns.database)
            .collection::<Document>(&ns.collection)
    }

    /// Creates the unique `id` index if it does not exist yet.
    #[instrument(skip(self), fields(namespace = %ns))]
    pub async fn ensure_id_index(&self, ns: &Namespace) -> Result<()> {
        if self.indexed.contains(ns) {
            return Ok(());
        }
        let index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection(ns).create_index(index).await?;
        self.indexed.insert(ns.clone());
        debug!("Unique id index ensured");
        Ok(())
    }

    async fn insert(&self, ns: &Namespace, document: Value) -> Result<()> {
        if self.ensure_id_index {
            self.ensure_id_index(ns).await?;
        }
        self.collection(ns)
            .insert_one(to_document(&document)?)
            .await?;
        Ok(())
    }

    async fn find_documents(&self, ns: &Namespace, filter: &DocumentFilter) -> Result<Vec<Value>> {
        let cursor = self.collection(ns).find(filter_document(filter)?).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(from_document).collect())
    }
}

#[async_trait]
impl Connection for MongoConnection {
    async fn find_one(
        &self,
        ns: &Namespace,
        filter: &DocumentFilter,
    ) -> std::result::Result<Option<Value>, DriverError> {
        let query = filter_document(filter)?;
        let found = self
            .collection(ns)
            .find_one(query)
            .await
            .map_err(MongoError::from)?;
        Ok(found.map(from_document))
    }

    async fn insert_one(
        &self,
        ns: &Namespace,
        document: Value,
    ) -> std::result::Result<(), DriverError> {
        Ok(self.insert(ns, document).await?)
    }

    async fn replace_one(
        &self,
        ns: &Namespace,
        filter: &DocumentFilter,
        document: Value,
    ) -> std::result::Result<(), DriverError> {
        let query = filter_document(filter)?;
        let replacement = to_document(&document)?;
        self.collection(ns)
            .replace_one(query, replacement)
            .await
            .map_err(MongoError::from)?;
        Ok(())
    }

    async fn delete_one(
        &self,
        ns: &Namespace,
        filter: &DocumentFilter,
    ) -> std::result::Result<(), DriverError> {
        let query = filter_document(filter)?;
        self.collection(ns)
            .delete_one(query)
            .await
            .map_err(MongoError::from)?;
        Ok(())
    }

    async fn find(
        &self,
        ns: &Namespace,
        filter: &DocumentFilter,
    ) -> std::result::Result<Vec<Value>, DriverError> {
        Ok(self.find_documents(ns, filter).await?)
    }

    async fn close(&self) -> std::result::Result<(), DriverError> {
        self.client.clone().shutdown().await;
        info!("MongoDB client shut down");
        Ok(())
    }
}
