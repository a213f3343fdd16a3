//! Typed errors for search and embedding operations.
//!
//! Storing and listing never fail; an unknown or empty namespace is a valid
//! empty result, not an error.

use thiserror::Error;

/// Errors raised by a similarity search pass.
///
/// A failed search returns no results at all; there is no partial output.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// A zero-length query carries no similarity information.
    #[error("query vector is empty")]
    EmptyQuery,

    /// The query and a stored vector disagree on length. The whole search
    /// fails rather than skipping the entry, since a length mismatch almost
    /// always means an upstream contract violation.
    #[error("dimension mismatch: query has {query} dimensions, stored vector has {stored}")]
    DimensionMismatch { query: usize, stored: usize },
}

/// Errors raised by an upstream text embedder.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmbedError {
    /// No texts were provided.
    #[error("no input text provided")]
    NoInput,

    /// The batch exceeds the embedder's per-call cap.
    #[error("too many texts: {len} exceeds the batch cap of {max}")]
    BatchTooLarge { len: usize, max: usize },

    /// The backing model failed to produce vectors.
    #[error("embedding backend failure: {0}")]
    Backend(String),
}
