use crate::engine::SearchIndex;
use sheetqa_core::{Error, Result, TextEmbedder};

/// Default number of rows retrieved per question
pub const DEFAULT_TOP_K: usize = 3;

/// Retrieve the `top_k` row-strings most similar to the query, nearest
/// first.
///
/// The query is embedded with the same model the index was built with. When
/// `top_k` exceeds the corpus size the result is truncated to the corpus
/// size. `top_k` of zero is rejected.
pub fn retrieve(
    embedder: &dyn TextEmbedder,
    index: &SearchIndex,
    query: &str,
    top_k: usize,
) -> Result<Vec<String>> {
    if top_k == 0 {
        return Err(Error::Retrieval("top_k must be at least 1".to_string()));
    }

    let query_embedding = embedder
        .embed_one(query)
        .map_err(|e| Error::Retrieval(format!("query embedding failed: {e}")))?;

    let hits = index
        .index()
        .search(&query_embedding, top_k)
        .map_err(|e| Error::Retrieval(format!("index search failed: {e}")))?;

    hits.into_iter()
        .map(|(position, _distance)| {
            index
                .row(position)
                .map(str::to_string)
                .ok_or_else(|| Error::Retrieval(format!("index position {position} out of range")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SearchIndex;
    use sheetqa_core::{FlatIndex, HashEmbedder, Vector};

    /// Embedder mapping each known phrase to a fixed axis, so test geometry
    /// is exact instead of hash-dependent
    struct VocabEmbedder {
        vocab: Vec<(&'static str, usize)>,
    }

    impl VocabEmbedder {
        fn new(vocab: Vec<(&'static str, usize)>) -> Self {
            Self { vocab }
        }

        fn axis(&self, text: &str) -> usize {
            self.vocab
                .iter()
                .find(|(phrase, _)| *phrase == text)
                .map(|(_, axis)| *axis)
                .unwrap_or(0)
        }
    }

    impl TextEmbedder for VocabEmbedder {
        fn embed_batch(&self, texts: &[String]) -> sheetqa_core::Result<Vec<Vector>> {
            Ok(texts
                .iter()
                .map(|t| {
                    let mut v = vec![0.0f32; 4];
                    v[self.axis(t)] = 1.0;
                    Vector::new(v)
                })
                .collect())
        }

        fn dim(&self) -> usize {
            4
        }
    }

    fn vocab_index(embedder: &VocabEmbedder, rows: Vec<String>) -> SearchIndex {
        let vectors = embedder.embed_batch(&rows).unwrap();
        let index = FlatIndex::build(embedder.dim(), vectors).unwrap();
        SearchIndex::new(index, rows)
    }

    #[test]
    fn test_retrieve_returns_k_nearest_in_order() {
        let embedder = VocabEmbedder::new(vec![
            ("red apple", 0),
            ("green pear", 1),
            ("blue sky", 2),
            ("what fruit is red", 0),
        ]);
        let index = vocab_index(
            &embedder,
            vec![
                "green pear".to_string(),
                "red apple".to_string(),
                "blue sky".to_string(),
            ],
        );

        let results = retrieve(&embedder, &index, "what fruit is red", 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], "red apple");
    }

    #[test]
    fn test_retrieve_results_come_from_corpus() {
        let embedder = HashEmbedder::default();
        let rows = vec![
            "Alice 30".to_string(),
            "Bob 25".to_string(),
            "Carol 41".to_string(),
        ];
        let vectors = embedder.embed_batch(&rows).unwrap();
        let index = SearchIndex::new(
            FlatIndex::build(embedder.dim(), vectors).unwrap(),
            rows.clone(),
        );

        let results = retrieve(&embedder, &index, "who is Carol", 3).unwrap();
        assert_eq!(results.len(), 3);
        for r in &results {
            assert!(rows.contains(r));
        }
    }

    #[test]
    fn test_retrieve_truncates_oversized_top_k() {
        let embedder = HashEmbedder::default();
        let rows = vec!["Alice 30".to_string(), "Bob 25".to_string()];
        let vectors = embedder.embed_batch(&rows).unwrap();
        let index = SearchIndex::new(
            FlatIndex::build(embedder.dim(), vectors).unwrap(),
            rows,
        );

        let results = retrieve(&embedder, &index, "anyone", 10).unwrap();
        assert_eq!(results.len(), 2);
        assert_ne!(results[0], results[1]);
    }

    #[test]
    fn test_retrieve_rejects_zero_top_k() {
        let embedder = HashEmbedder::default();
        let rows = vec!["Alice 30".to_string()];
        let vectors = embedder.embed_batch(&rows).unwrap();
        let index = SearchIndex::new(
            FlatIndex::build(embedder.dim(), vectors).unwrap(),
            rows,
        );

        let result = retrieve(&embedder, &index, "anyone", 0);
        assert!(matches!(result, Err(Error::Retrieval(_))));
    }
}
