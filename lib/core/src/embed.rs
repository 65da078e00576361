use crate::model::TextEmbedder;
use crate::{Result, Vector};
use ahash::AHasher;
use std::hash::{Hash, Hasher};

/// Default dimension for hashed embeddings
pub const DEFAULT_HASH_DIM: usize = 256;

/// Deterministic bag-of-words embedding provider based on feature hashing.
///
/// Each lowercased alphanumeric token is hashed into one of `dim` buckets
/// with a hash-derived sign, and the resulting vector is L2-normalized.
/// Requires no model files, which makes it a usable stand-in when no ONNX
/// embedding model is available; retrieval quality is limited to token
/// overlap rather than semantics.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    #[must_use]
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn embed_text(&self, text: &str) -> Vector {
        let mut components = vec![0.0f32; self.dim];

        for token in tokenize(text) {
            let mut hasher = AHasher::default();
            token.hash(&mut hasher);
            let hashed = hasher.finish();

            let bucket = (hashed % self.dim as u64) as usize;
            let sign = if hashed & (1u64 << 63) == 0 { 1.0 } else { -1.0 };
            components[bucket] += sign;
        }

        let mut vector = Vector::new(components);
        vector.normalize();
        vector
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_DIM)
    }
}

impl TextEmbedder for HashEmbedder {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn dim(&self) -> usize {
        self.dim
    }
}

/// Split into lowercased alphanumeric tokens
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}
