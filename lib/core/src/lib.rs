//! # SheetQA Core
//!
//! Core library for the SheetQA question-answering pipeline.
//!
//! This crate provides the fundamental data structures and seams:
//!
//! - [`Vector`] - Dense vector representation with L2 distance
//! - [`FlatIndex`] - Exact nearest-neighbor index over squared L2 distance
//! - [`TextEmbedder`] / [`AnswerExtractor`] - Model seams implemented by
//!   `sheetqa-models`
//! - [`HashEmbedder`] - Deterministic hashing embedder requiring no model files
//! - [`Error`] - Tagged error taxonomy shared across the workspace
//!
//! ## Example
//!
//! ```rust
//! use sheetqa_core::{FlatIndex, Vector};
//!
//! let index = FlatIndex::build(
//!     2,
//!     vec![Vector::new(vec![0.0, 0.0]), Vector::new(vec![1.0, 1.0])],
//! )
//! .unwrap();
//!
//! let results = index.search(&Vector::new(vec![0.1, 0.1]), 1).unwrap();
//! assert_eq!(results[0].0, 0);
//! ```

pub mod embed;
pub mod error;
pub mod index;
pub mod model;
pub mod vector;

pub use embed::{HashEmbedder, DEFAULT_HASH_DIM};
pub use error::{Error, Result};
pub use index::FlatIndex;
pub use model::{AnswerExtractor, SpanAnswer, TextEmbedder};
pub use vector::Vector;
