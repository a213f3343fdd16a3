//! # EmbedDB - An Ephemeral Namespaced Vector Store
//!
//! EmbedDB stores fixed-dimension embedding vectors with attached metadata,
//! partitioned into namespaces, and ranks them against a query vector by
//! cosine similarity. Vectors are normalized at search time, scored with a
//! dot product, filtered by a minimum score and truncated to the top k.
//!
//! Everything lives in memory for the lifetime of the process. The
//! intended deployment pairs this store with a longer-lived cache on the
//! calling side, so state is lost on restart.
//!
//! ## Example
//!
//! ```
//! use embeddb::VectorStore;
//! use serde_json::Map;
//!
//! let store = VectorStore::new();
//!
//! // Store vectors under a namespace
//! store.store("docs", "a".to_string(), vec![1.0, 0.0], Map::new());
//! store.store("docs", "b".to_string(), vec![0.0, 1.0], Map::new());
//! store.store("docs", "c".to_string(), vec![0.7071, 0.7071], Map::new());
//!
//! // Rank by cosine similarity, keeping scores >= 0.5
//! let results = store.search("docs", &[1.0, 0.0], 10, 0.5).unwrap();
//! assert_eq!(results.len(), 2);
//! assert_eq!(results[0].key, "a"); // exact match, score 1.0
//! assert_eq!(results[1].key, "c"); // ~0.7071
//! ```

pub mod embed;
pub mod error;
pub mod server;
pub mod similarity;
pub mod vector;
mod store;

// Re-export the primary public API
pub use similarity::SearchMatch;
pub use store::{Entry, VectorStore, DEFAULT_NAMESPACE};
