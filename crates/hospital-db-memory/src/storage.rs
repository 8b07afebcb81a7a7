use std::sync::atomic::{AtomicU64, Ordering};

use hospital_storage::{DocumentFilter, DriverError, ID_FIELD, Namespace};
use papaya::HashMap as PapayaHashMap;
use serde_json::Value;

/// Collection plus document id.
pub type StorageKey = (Namespace, String);

pub(crate) fn make_storage_key(ns: &Namespace, id: &str) -> StorageKey {
    (ns.clone(), id.to_string())
}

#[derive(Debug, Clone)]
struct StoredDocument {
    namespace: Namespace,
    /// Insertion order; replacement keeps it.
    sequence: u64,
    body: Value,
}

/// Shared document data using papaya lock-free HashMap.
///
/// Keys are unique per collection, which gives every collection the
/// unique `id` index a real deployment creates.
#[derive(Debug)]
pub struct InMemoryStore {
    data: PapayaHashMap<StorageKey, StoredDocument>,
    sequence: AtomicU64,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            data: PapayaHashMap::new(),
            sequence: AtomicU64::new(1),
        }
    }

    /// Total number of documents across all collections.
    pub fn len(&self) -> usize {
        self.data.pin().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of documents in one collection.
    pub fn count(&self, ns: &Namespace) -> usize {
        let guard = self.data.pin();
        guard.iter().filter(|(_, doc)| &doc.namespace == ns).count()
    }

    /// Matching documents ordered by insertion.
    pub(crate) fn find(&self, ns: &Namespace, filter: &DocumentFilter) -> Vec<Value> {
        let guard = self.data.pin();
        let mut matched: Vec<&StoredDocument> = guard
            .iter()
            .map(|(_, doc)| doc)
            .filter(|doc| &doc.namespace == ns && filter.matches(&doc.body))
            .collect();
        matched.sort_by_key(|doc| doc.sequence);
        matched.into_iter().map(|doc| doc.body.clone()).collect()
    }

    pub(crate) fn find_one(&self, ns: &Namespace, filter: &DocumentFilter) -> Option<Value> {
        self.first_match(ns, filter).map(|(_, doc)| doc.body)
    }

    pub(crate) fn insert(&self, ns: &Namespace, body: Value) -> Result<(), DriverError> {
        let id = document_id(&body)?;
        let key = make_storage_key(ns, &id);
        let stored = StoredDocument {
            namespace: ns.clone(),
            sequence: self.sequence.fetch_add(1, Ordering::SeqCst),
            body,
        };

        let guard = self.data.pin();
        match guard.try_insert(key, stored) {
            Ok(_) => Ok(()),
            Err(_) => Err(DriverError::DuplicateKey(format!(
                "E11000 duplicate key error collection: {ns} index: id_1 \
                 dup key: {{ id: \"{id}\" }}"
            ))),
        }
    }

    /// Replaces the first match in place. A miss is not an error.
    pub(crate) fn replace(
        &self,
        ns: &Namespace,
        filter: &DocumentFilter,
        body: Value,
    ) -> Result<(), DriverError> {
        let Some((key, existing)) = self.first_match(ns, filter) else {
            return Ok(());
        };
        let replacement_key = make_storage_key(ns, &document_id(&body)?);
        let guard = self.data.pin();
        if replacement_key != key {
            if guard.get(&replacement_key).is_some() {
                return Err(DriverError::DuplicateKey(format!(
                    "E11000 duplicate key error collection: {ns} index: id_1"
                )));
            }
            guard.remove(&key);
        }
        guard.insert(
            replacement_key,
            StoredDocument {
                namespace: existing.namespace,
                sequence: existing.sequence,
                body,
            },
        );
        Ok(())
    }

    /// Removes the first match. A miss is not an error.
    pub(crate) fn delete(&self, ns: &Namespace, filter: &DocumentFilter) {
        if let Some((key, _)) = self.first_match(ns, filter) {
            self.data.pin().remove(&key);
        }
    }

    pub fn clear(&self) {
        self.data.pin().clear();
    }

    fn first_match(
        &self,
        ns: &Namespace,
        filter: &DocumentFilter,
    ) -> Option<(StorageKey, StoredDocument)> {
        let guard = self.data.pin();
        guard
            .iter()
            .filter(|(_, doc)| &doc.namespace == ns && filter.matches(&doc.body))
            .min_by_key(|(_, doc)| doc.sequence)
            .map(|(key, doc)| (key.clone(), doc.clone()))
    }
}

fn document_id(body: &Value) -> Result<String, DriverError> {
    match body.get(ID_FIELD) {
        Some(Value::String(id)) => Ok(id.clone()),
        Some(other) => Ok(other.to_string()),
        None => Err(DriverError::Codec(format!(
            "document has no `{ID_FIELD}` field"
        ))),
    }
}
