//! # SheetQA
//!
//! Ask questions against an uploaded spreadsheet.
//!
//! SheetQA embeds every row of a CSV or XLSX file, indexes the embeddings in
//! an in-memory flat L2 index, and answers free-text questions by retrieving
//! the nearest rows and running an extractive question-answering model over
//! their concatenation.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! sheetqa --models-dir ./models --port 8080
//! ```
//!
//! Then upload a file and ask:
//!
//! ```bash
//! curl -F file=@people.csv http://localhost:8080/upload
//! curl -H 'Content-Type: application/json' \
//!      -d '{"query": "How old is Alice?"}' http://localhost:8080/ask
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use sheetqa::prelude::*;
//! use std::sync::Arc;
//!
//! # struct NoopExtractor;
//! # impl AnswerExtractor for NoopExtractor {
//! #     fn extract(&self, _q: &str, _c: &str) -> sheetqa_core::Result<SpanAnswer> {
//! #         Ok(SpanAnswer::empty())
//! #     }
//! # }
//! let engine = QaEngine::new(
//!     Arc::new(HashEmbedder::default()),
//!     Arc::new(NoopExtractor),
//! );
//!
//! let bytes = b"name,age\nAlice,30\nBob,25\n";
//! engine.load_table(bytes, TableFormat::Csv).unwrap();
//! let answer = engine.ask("How old is Alice?", 1).unwrap();
//! ```
//!
//! ## Crate Structure
//!
//! - [`sheetqa-core`](https://docs.rs/sheetqa-core) - flat L2 index, model
//!   seams, error taxonomy
//! - [`sheetqa-models`](https://docs.rs/sheetqa-models) - ONNX inference
//!   (sentence embeddings, extractive QA) via tract
//! - [`sheetqa-engine`](https://docs.rs/sheetqa-engine) - table parsing and
//!   the retrieval-then-answer pipeline
//! - [`sheetqa-api`](https://docs.rs/sheetqa-api) - REST upload/ask surface

// Re-export core types
pub use sheetqa_core::{
    AnswerExtractor, Error, FlatIndex, HashEmbedder, Result, SpanAnswer, TextEmbedder, Vector,
};

// Re-export models
pub use sheetqa_models::{EmbedderConfig, ModelPaths, OnnxEmbedder, OnnxExtractor, QaConfig};

// Re-export engine
pub use sheetqa_engine::{
    EngineStatus, IndexStats, QaEngine, Row, SearchIndex, TableFormat, DEFAULT_TOP_K,
};

// Re-export API
pub use sheetqa_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AnswerExtractor, EngineStatus, Error, FlatIndex, HashEmbedder, IndexStats, QaEngine,
        RestApi, Result, Row, SearchIndex, SpanAnswer, TableFormat, TextEmbedder, Vector,
        DEFAULT_TOP_K,
    };
}
