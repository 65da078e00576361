//! # SheetQA Models
//!
//! ONNX model inference for SheetQA via [tract](https://github.com/sonos/tract).
//!
//! Two models are loaded once at process start and held for the process
//! lifetime:
//!
//! - [`OnnxEmbedder`] - sentence embedding model (mean pooling), implements
//!   [`sheetqa_core::TextEmbedder`]
//! - [`OnnxExtractor`] - extractive question answering model (start/end span
//!   logits), implements [`sheetqa_core::AnswerExtractor`]
//!
//! Both expect a BERT-family model exported to ONNX next to its HuggingFace
//! `tokenizer.json`.

pub mod embedder;
pub mod error;
pub mod qa;
pub mod tokenize;

use std::path::{Path, PathBuf};
use tract_onnx::prelude::*;

pub use embedder::{EmbedderConfig, OnnxEmbedder};
pub use error::{ModelError, Result};
pub use qa::{OnnxExtractor, QaConfig};
pub use tokenize::{PairEncoding, TextTokenizer, TokenizedInput};

/// Type alias for the tract typed model
pub(crate) type TractModel =
    SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Conventional file layout of a model directory:
///
/// ```text
/// models/
///   embedder.onnx
///   embedder-tokenizer.json
///   qa.onnx
///   qa-tokenizer.json
/// ```
#[derive(Debug, Clone)]
pub struct ModelPaths {
    pub embedder_model: PathBuf,
    pub embedder_tokenizer: PathBuf,
    pub qa_model: PathBuf,
    pub qa_tokenizer: PathBuf,
}

impl ModelPaths {
    #[must_use]
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            embedder_model: dir.join("embedder.onnx"),
            embedder_tokenizer: dir.join("embedder-tokenizer.json"),
            qa_model: dir.join("qa.onnx"),
            qa_tokenizer: dir.join("qa-tokenizer.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_paths_from_dir() {
        let paths = ModelPaths::from_dir(Path::new("/opt/models"));
        assert_eq!(paths.qa_model, Path::new("/opt/models/qa.onnx"));
        assert_eq!(
            paths.embedder_tokenizer,
            Path::new("/opt/models/embedder-tokenizer.json")
        );
    }
}
