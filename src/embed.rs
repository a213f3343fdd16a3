//! The embedder seam
//! Text-to-vector production is an upstream concern; the store only ever
//! sees finished vectors. This module pins down the contract upstream
//! backends must honor.

use crate::error::EmbedError;

/// Largest number of texts a single embed call may carry.
pub const MAX_EMBED_BATCH: usize = 100;

/// A text-to-vector backend.
///
/// Implementations return one vector per input string, each of
/// [`dimension`](TextEmbedder::dimension) length. Output is expected to be
/// unit-normalized so stored scores come out as exact cosine similarities.
/// The reference deployment runs a MiniLM sentence transformer at 384
/// dimensions; see `demos/semantic_search.rs` for a candle-backed
/// implementation.
pub trait TextEmbedder {
    /// Fixed output dimensionality.
    fn dimension(&self) -> usize;

    /// Embeds a batch of texts.
    ///
    /// Implementations should run [`check_batch`] before any model work so
    /// malformed batches fail the same way across backends.
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError>;
}

/// Rejects empty input and batches over [`MAX_EMBED_BATCH`].
pub fn check_batch(texts: &[String]) -> Result<(), EmbedError> {
    if texts.is_empty() {
        return Err(EmbedError::NoInput);
    }

    if texts.len() > MAX_EMBED_BATCH {
        return Err(EmbedError::BatchTooLarge {
            len: texts.len(),
            max: MAX_EMBED_BATCH,
        });
    }

    Ok(())
}
