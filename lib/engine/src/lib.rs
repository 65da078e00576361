//! # SheetQA Engine
//!
//! The retrieval-then-answer pipeline behind SheetQA:
//!
//! 1. [`table`] parses an uploaded CSV or spreadsheet into rows
//! 2. [`corpus`] flattens each row into one text blob
//! 3. [`QaEngine::load_rows`] embeds the blobs and builds a flat L2 index
//! 4. [`QaEngine::ask`] embeds a question, retrieves the nearest rows and
//!    extracts an answer span from their concatenation
//!
//! The engine is a stateless pipeline per request, parameterized by the most
//! recently published index. Uploads replace the index atomically; in-flight
//! queries keep the snapshot they started with.

pub mod answerer;
pub mod corpus;
pub mod engine;
pub mod retriever;
pub mod table;

pub use answerer::build_context;
pub use corpus::{build_corpus, row_text};
pub use engine::{EngineStatus, IndexStats, QaEngine, SearchIndex};
pub use retriever::{retrieve, DEFAULT_TOP_K};
pub use table::{parse_table, Row, TableFormat};
