use crate::{Result, Vector};

/// An extracted answer span with its model confidence
#[derive(Debug, Clone, PartialEq)]
pub struct SpanAnswer {
    pub text: String,
    pub score: f32,
}

impl SpanAnswer {
    #[must_use]
    pub fn new(text: impl Into<String>, score: f32) -> Self {
        Self {
            text: text.into(),
            score,
        }
    }

    /// An empty answer for contexts with no plausible span
    #[must_use]
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            score: 0.0,
        }
    }
}

/// Trait for text embedding models.
///
/// Index and query embeddings must come from the same implementation so they
/// share dimensionality; `dim` reports that width up front.
pub trait TextEmbedder: Send + Sync {
    /// Embed a batch of texts for indexing
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>>;

    /// Embed a single query for searching
    fn embed_one(&self, text: &str) -> Result<Vector> {
        let mut embeddings = self.embed_batch(&[text.to_string()])?;
        embeddings
            .pop()
            .ok_or_else(|| crate::Error::Model("empty embedding batch result".to_string()))
    }

    /// Embedding width produced by this model
    fn dim(&self) -> usize;
}

/// Trait for extractive question answering models.
///
/// Answers by selecting a contiguous span of the supplied context, never by
/// generating free text.
pub trait AnswerExtractor: Send + Sync {
    fn extract(&self, question: &str, context: &str) -> Result<SpanAnswer>;
}
