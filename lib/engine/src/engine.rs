use crate::answerer::answer;
use crate::corpus::build_corpus;
use crate::retriever::retrieve;
use crate::table::{parse_table, Row, TableFormat};
use parking_lot::RwLock;
use sheetqa_core::{
    AnswerExtractor, Error, FlatIndex, Result, SpanAnswer, TextEmbedder,
};
use std::sync::Arc;
use tracing::info;

/// A flat index paired with the exact row-string sequence it was built from.
/// Search positions are offsets into that sequence, so the two are published
/// and replaced as one unit.
pub struct SearchIndex {
    index: FlatIndex,
    rows: Vec<String>,
}

impl SearchIndex {
    #[must_use]
    pub fn new(index: FlatIndex, rows: Vec<String>) -> Self {
        debug_assert_eq!(index.len(), rows.len());
        Self { index, rows }
    }

    #[inline]
    #[must_use]
    pub fn index(&self) -> &FlatIndex {
        &self.index
    }

    #[inline]
    pub fn row(&self, position: usize) -> Option<&str> {
        self.rows.get(position).map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Result of indexing an uploaded table
#[derive(Debug, Clone, Copy)]
pub struct IndexStats {
    pub rows: usize,
    pub dim: usize,
}

/// Current engine state, for health/status reporting
#[derive(Debug, Clone, Copy)]
pub struct EngineStatus {
    pub ready: bool,
    pub rows: usize,
    pub dim: usize,
}

/// The question-answering service.
///
/// Owns the embedding model, the answer extractor and the currently
/// published index. One corpus is live at a time: an upload builds a
/// complete new [`SearchIndex`] off to the side and publishes it with a
/// single pointer swap, so queries snapshot whichever index was live when
/// they started and never observe a partially built or mixed one.
pub struct QaEngine {
    embedder: Arc<dyn TextEmbedder>,
    extractor: Arc<dyn AnswerExtractor>,
    current: RwLock<Option<Arc<SearchIndex>>>,
}

impl QaEngine {
    #[must_use]
    pub fn new(embedder: Arc<dyn TextEmbedder>, extractor: Arc<dyn AnswerExtractor>) -> Self {
        Self {
            embedder,
            extractor,
            current: RwLock::new(None),
        }
    }

    /// Parse tabular bytes and index them, replacing the current corpus
    pub fn load_table(&self, bytes: &[u8], format: TableFormat) -> Result<IndexStats> {
        let rows = parse_table(bytes, format)?;
        self.load_rows(rows)
    }

    /// Index a parsed row set, replacing the current corpus.
    ///
    /// The new index is fully built before it becomes visible; on any
    /// failure the previously published index stays live untouched.
    pub fn load_rows(&self, rows: Vec<Row>) -> Result<IndexStats> {
        let corpus = build_corpus(&rows);
        if corpus.is_empty() {
            return Err(Error::IndexBuild("corpus is empty".to_string()));
        }

        let embeddings = self
            .embedder
            .embed_batch(&corpus)
            .map_err(|e| Error::IndexBuild(format!("corpus embedding failed: {e}")))?;
        if embeddings.len() != corpus.len() {
            return Err(Error::IndexBuild(format!(
                "embedder returned {} vectors for {} rows",
                embeddings.len(),
                corpus.len()
            )));
        }

        let dim = self.embedder.dim();
        let index = FlatIndex::build(dim, embeddings)
            .map_err(|e| Error::IndexBuild(format!("index construction failed: {e}")))?;

        let stats = IndexStats {
            rows: corpus.len(),
            dim,
        };
        let built = Arc::new(SearchIndex::new(index, corpus));

        *self.current.write() = Some(built);
        info!(rows = stats.rows, dim = stats.dim, "corpus indexed");
        Ok(stats)
    }

    /// Answer a question against the currently published index.
    ///
    /// Fails with [`Error::IndexNotReady`] when no corpus has ever been
    /// indexed; this is a precondition, distinct from a failed build.
    pub fn ask(&self, query: &str, top_k: usize) -> Result<SpanAnswer> {
        let snapshot = self.snapshot().ok_or(Error::IndexNotReady)?;

        let retrieved = retrieve(self.embedder.as_ref(), &snapshot, query, top_k)?;
        answer(self.extractor.as_ref(), query, &retrieved)
    }

    /// The currently published index, if any
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<SearchIndex>> {
        self.current.read().clone()
    }

    #[must_use]
    pub fn status(&self) -> EngineStatus {
        match self.snapshot() {
            Some(si) => EngineStatus {
                ready: true,
                rows: si.len(),
                dim: si.index().dim(),
            },
            None => EngineStatus {
                ready: false,
                rows: 0,
                dim: 0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetqa_core::HashEmbedder;

    struct EchoExtractor;

    impl AnswerExtractor for EchoExtractor {
        fn extract(&self, _question: &str, context: &str) -> sheetqa_core::Result<SpanAnswer> {
            Ok(SpanAnswer::new(context, 1.0))
        }
    }

    fn engine() -> QaEngine {
        QaEngine::new(Arc::new(HashEmbedder::default()), Arc::new(EchoExtractor))
    }

    fn person_rows(people: &[(&str, &str)]) -> Vec<Row> {
        people
            .iter()
            .map(|(name, age)| {
                Row::from_pairs(vec![
                    ("name".to_string(), name.to_string()),
                    ("age".to_string(), age.to_string()),
                ])
            })
            .collect()
    }

    #[test]
    fn test_ask_before_upload_fails_with_precondition() {
        let engine = engine();
        let result = engine.ask("How old is Alice?", 3);
        assert!(matches!(result, Err(Error::IndexNotReady)));
    }

    #[test]
    fn test_load_rows_reports_stats() {
        let engine = engine();
        let stats = engine
            .load_rows(person_rows(&[("Alice", "30"), ("Bob", "25")]))
            .unwrap();
        assert_eq!(stats.rows, 2);
        assert_eq!(stats.dim, HashEmbedder::default().dim());

        let status = engine.status();
        assert!(status.ready);
        assert_eq!(status.rows, 2);
    }

    #[test]
    fn test_index_entries_match_embedder_output() {
        let embedder = HashEmbedder::default();
        let engine = QaEngine::new(
            Arc::new(HashEmbedder::default()),
            Arc::new(EchoExtractor),
        );
        engine
            .load_rows(person_rows(&[("Alice", "30"), ("Bob", "25")]))
            .unwrap();

        let snapshot = engine.snapshot().unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.row(0), Some("Alice 30"));

        let expected = embedder.embed_one("Bob 25").unwrap();
        assert_eq!(
            snapshot.index().vector(1).unwrap().as_slice(),
            expected.as_slice()
        );
    }

    #[test]
    fn test_reupload_replaces_corpus_completely() {
        let engine = engine();
        engine
            .load_rows(person_rows(&[("Alice", "30"), ("Bob", "25")]))
            .unwrap();
        engine
            .load_rows(person_rows(&[("Carol", "41"), ("Dave", "19")]))
            .unwrap();

        // EchoExtractor returns the whole retrieved context, so any leaked
        // old row would show up in the answer text.
        let result = engine.ask("who is there", 10).unwrap();
        assert!(!result.text.contains("Alice"));
        assert!(!result.text.contains("Bob"));
        assert!(result.text.contains("Carol"));
        assert!(result.text.contains("Dave"));
    }

    #[test]
    fn test_failed_reload_keeps_previous_index() {
        let engine = engine();
        engine.load_rows(person_rows(&[("Alice", "30")])).unwrap();

        let result = engine.load_rows(vec![]);
        assert!(matches!(result, Err(Error::IndexBuild(_))));

        let status = engine.status();
        assert!(status.ready);
        assert_eq!(status.rows, 1);
    }

    #[test]
    fn test_in_flight_snapshot_survives_swap() {
        let engine = engine();
        engine.load_rows(person_rows(&[("Alice", "30")])).unwrap();

        let before = engine.snapshot().unwrap();
        engine.load_rows(person_rows(&[("Carol", "41")])).unwrap();

        // A query holding the old snapshot still sees the old corpus
        assert_eq!(before.row(0), Some("Alice 30"));
        assert_eq!(engine.snapshot().unwrap().row(0), Some("Carol 41"));
    }
}
