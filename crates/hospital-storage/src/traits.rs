//! The typed document store contract.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::context::RequestContext;
use crate::error::StoreError;
use crate::filter::DocumentFilter;

/// A caller-defined record stored under a unique string id.
///
/// The store only needs to encode and decode it; any serde type qualifies.
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> Document for T where T: Serialize + DeserializeOwned + Send + Sync + 'static {}

/// CRUD over documents of type `T` in one collection.
///
/// Every call takes the caller's [`RequestContext`]; the store narrows it to
/// its own configured timeout. Errors are always exactly one of
/// [`StoreError::NotFound`], [`StoreError::Conflict`] or
/// [`StoreError::Transport`].
///
/// # Example
///
/// ```ignore
/// use hospital_storage::{DocumentStore, RequestContext, StoreError};
///
/// async fn rename(store: &dyn DocumentStore<Department>, id: &str) -> Result<(), StoreError> {
///     let ctx = RequestContext::background();
///     let mut department = store.find(&ctx, id).await?;
///     department.name = "Cardiology".into();
///     store.update(&ctx, id, &department).await
/// }
/// ```
#[async_trait]
pub trait DocumentStore<T: Document>: Send + Sync {
    /// Inserts `document` under `id`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if a document with `id` already exists.
    async fn create(&self, ctx: &RequestContext, id: &str, document: &T) -> Result<(), StoreError>;

    /// Reads the document stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no such document exists.
    async fn find(&self, ctx: &RequestContext, id: &str) -> Result<T, StoreError>;

    /// Replaces the document stored under `id` wholesale.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no such document exists; nothing is inserted.
    async fn update(&self, ctx: &RequestContext, id: &str, document: &T) -> Result<(), StoreError>;

    /// Removes the document stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no such document exists.
    async fn delete(&self, ctx: &RequestContext, id: &str) -> Result<(), StoreError>;

    /// Every document in the collection, in store order. Possibly empty.
    async fn find_all(&self, ctx: &RequestContext) -> Result<Vec<T>, StoreError>;

    /// Documents matching `filter`. Possibly empty.
    async fn find_by_filter(
        &self,
        ctx: &RequestContext,
        filter: &DocumentFilter,
    ) -> Result<Vec<T>, StoreError>;

    /// Releases the connection, if any. Safe to call repeatedly.
    async fn disconnect(&self, ctx: &RequestContext) -> Result<(), StoreError>;

    /// Name of the backing collection.
    fn collection(&self) -> &str;
}
