//! The store module
//! Namespaced, ephemeral storage for embedding vectors and their metadata

use crate::error::SearchError;
use crate::similarity::{self, SearchMatch};
use serde::{Serialize, Deserialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// Namespace used when a caller does not name one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// A stored vector with its key and opaque metadata payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Entry {
    pub key: String,
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// In-memory vector store partitioned by namespace.
///
/// Entries live only as long as the process; nothing is written to disk.
/// The store is safe to share across threads: each mutation takes the write
/// lock, and reads see either the entry before or after a write, never a
/// torn mix. Within a namespace keys are unique and storing an existing key
/// overwrites the prior entry in place, so `list` keeps first-insert order.
///
/// # Examples
///
/// ```
/// use embeddb::VectorStore;
/// use serde_json::Map;
///
/// let store = VectorStore::new();
///
/// store.store("notes", "a".to_string(), vec![1.0, 0.0], Map::new());
/// store.store("notes", "b".to_string(), vec![0.0, 1.0], Map::new());
///
/// let results = store.search("notes", &[1.0, 0.0], 5, 0.5).unwrap();
/// assert_eq!(results[0].key, "a");
/// ```
#[derive(Default)]
pub struct VectorStore {
    namespaces: RwLock<HashMap<String, Vec<Entry>>>,
}

impl VectorStore {
    /// Creates a new empty store with no namespaces.
    ///
    /// Namespaces come into existence on first insert; there is no explicit
    /// create or delete operation for them.
    pub fn new() -> VectorStore {
        VectorStore { namespaces: RwLock::new(HashMap::new()) }
    }

    /// Inserts or overwrites the entry at `(namespace, key)`.
    ///
    /// Always succeeds: the store does not validate vector shape, value
    /// range or metadata schema, that is the caller's concern. The
    /// namespace is created implicitly if absent. Overwriting keeps the
    /// entry's original position, so repeated writes to one key do not
    /// change the order `list` reports.
    ///
    /// # Examples
    ///
    /// ```
    /// use embeddb::VectorStore;
    /// use serde_json::Map;
    ///
    /// let store = VectorStore::new();
    /// store.store("ns", "vec1".to_string(), vec![3.0, 4.0], Map::new());
    /// store.store("ns", "vec1".to_string(), vec![1.0, 0.0], Map::new());
    /// assert_eq!(store.count("ns"), 1);
    /// ```
    pub fn store(
        &self,
        namespace: &str,
        key: String,
        embedding: Vec<f32>,
        metadata: Map<String, Value>,
    ) {
        let mut namespaces = self.namespaces.write().unwrap();
        let entries = namespaces.entry(namespace.to_string()).or_default();

        let entry = Entry { key, embedding, metadata };
        if let Some(index) = entries.iter().position(|e| e.key == entry.key) {
            debug!(namespace, key = %entry.key, "overwrote entry");
            entries[index] = entry;
        } else {
            debug!(namespace, key = %entry.key, "stored entry");
            entries.push(entry);
        }
    }

    /// Returns up to `limit` entries of a namespace in insertion order.
    ///
    /// An absent or empty namespace yields an empty list, never an error.
    /// Bounding `limit` to a sane range is the concern of the layer that
    /// accepts external input; the store applies whatever it is given.
    ///
    /// # Examples
    ///
    /// ```
    /// use embeddb::VectorStore;
    /// use serde_json::Map;
    ///
    /// let store = VectorStore::new();
    /// store.store("ns", "vec1".to_string(), vec![1.0, 0.0], Map::new());
    /// store.store("ns", "vec2".to_string(), vec![0.0, 1.0], Map::new());
    ///
    /// let entries = store.list("ns", 10);
    /// assert_eq!(entries.len(), 2);
    /// assert_eq!(entries[0].key, "vec1");
    ///
    /// assert!(store.list("elsewhere", 10).is_empty());
    /// ```
    pub fn list(&self, namespace: &str, limit: usize) -> Vec<Entry> {
        let namespaces = self.namespaces.read().unwrap();

        match namespaces.get(namespace) {
            Some(entries) => entries.iter().take(limit).cloned().collect(),
            None => Vec::new(),
        }
    }

    /// Returns a consistent point-in-time copy of a namespace's entries.
    ///
    /// The clone is taken under the read lock, so a concurrent writer can
    /// never leave a half-updated entry in the snapshot. Absent namespaces
    /// yield an empty snapshot.
    pub fn snapshot(&self, namespace: &str) -> Vec<Entry> {
        let namespaces = self.namespaces.read().unwrap();

        namespaces.get(namespace).cloned().unwrap_or_default()
    }

    /// Returns the number of entries in a namespace.
    pub fn count(&self, namespace: &str) -> usize {
        let namespaces = self.namespaces.read().unwrap();

        namespaces.get(namespace).map_or(0, Vec::len)
    }

    /// Returns the names of all namespaces, sorted.
    pub fn namespaces(&self) -> Vec<String> {
        let namespaces = self.namespaces.read().unwrap();

        let mut names: Vec<String> = namespaces.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the total number of entries across all namespaces.
    pub fn total(&self) -> usize {
        let namespaces = self.namespaces.read().unwrap();

        namespaces.values().map(Vec::len).sum()
    }

    /// Ranks a namespace's entries by cosine similarity against `query`.
    ///
    /// Runs the full-scan similarity pass over the namespace while holding
    /// the read lock, which gives the scan a consistent view. Searching an
    /// absent namespace returns an empty result; an empty query or a stored
    /// vector whose length differs from the query is an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use embeddb::VectorStore;
    /// use serde_json::Map;
    ///
    /// let store = VectorStore::new();
    /// store.store("ns", "a".to_string(), vec![1.0, 0.0], Map::new());
    /// store.store("ns", "b".to_string(), vec![0.0, 1.0], Map::new());
    ///
    /// let results = store.search("ns", &[1.0, 0.0], 10, 0.5).unwrap();
    /// assert_eq!(results.len(), 1);
    /// assert_eq!(results[0].key, "a");
    /// ```
    pub fn search(
        &self,
        namespace: &str,
        query: &[f32],
        k: usize,
        min_score: f32,
    ) -> Result<Vec<SearchMatch>, SearchError> {
        let namespaces = self.namespaces.read().unwrap();
        let entries = namespaces.get(namespace).map(Vec::as_slice).unwrap_or(&[]);

        similarity::search(query, entries, k, min_score)
    }
}
