use crate::{Error, Result, Vector};

/// An exact nearest-neighbor index over squared L2 distance.
///
/// Stores every corpus vector and scans all of them on search. Built in one
/// shot and immutable afterwards; search results are positions into the
/// sequence the index was built from, so the caller must keep that sequence
/// paired with the index.
pub struct FlatIndex {
    dim: usize,
    vectors: Vec<Vector>,
}

impl FlatIndex {
    /// Build an index of the given dimension from a batch of vectors.
    ///
    /// Every vector must have dimension `dim`.
    pub fn build(dim: usize, vectors: Vec<Vector>) -> Result<Self> {
        for v in &vectors {
            if v.dim() != dim {
                return Err(Error::InvalidDimension {
                    expected: dim,
                    actual: v.dim(),
                });
            }
        }

        Ok(Self { dim, vectors })
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Get the stored vector at a position
    #[inline]
    pub fn vector(&self, position: usize) -> Option<&Vector> {
        self.vectors.get(position)
    }

    /// Exact k-nearest-neighbor search.
    ///
    /// Returns up to `k` (position, squared L2 distance) pairs ordered by
    /// ascending distance, ties broken by lower position. When `k` exceeds
    /// the number of indexed vectors the result is truncated to the full
    /// index size; it is never padded and never contains duplicates.
    pub fn search(&self, query: &Vector, k: usize) -> Result<Vec<(usize, f32)>> {
        if query.dim() != self.dim {
            return Err(Error::InvalidDimension {
                expected: self.dim,
                actual: query.dim(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, v)| (position, v.l2_distance_sq(query)))
            .collect();

        scored.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(k);
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> FlatIndex {
        FlatIndex::build(
            2,
            vec![
                Vector::new(vec![0.0, 0.0]),
                Vector::new(vec![1.0, 0.0]),
                Vector::new(vec![0.0, 2.0]),
                Vector::new(vec![3.0, 3.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_build_stores_all_vectors() {
        let index = sample_index();
        assert_eq!(index.len(), 4);
        assert_eq!(index.dim(), 2);
        assert_eq!(index.vector(1).unwrap().as_slice(), &[1.0, 0.0]);
        assert!(index.vector(4).is_none());
    }

    #[test]
    fn test_build_rejects_mismatched_dimension() {
        let result = FlatIndex::build(
            2,
            vec![Vector::new(vec![0.0, 0.0]), Vector::new(vec![1.0])],
        );
        assert!(matches!(
            result,
            Err(Error::InvalidDimension {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_search_orders_by_ascending_distance() {
        let index = sample_index();
        let results = index.search(&Vector::new(vec![0.0, 0.0]), 4).unwrap();

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].0, 0);
        assert_eq!(results[1].0, 1);
        assert_eq!(results[2].0, 2);
        assert_eq!(results[3].0, 3);
        for pair in results.windows(2) {
            assert!(pair[0].1 <= pair[1].1);
        }
    }

    #[test]
    fn test_search_tie_break_by_position() {
        let index = FlatIndex::build(
            1,
            vec![
                Vector::new(vec![1.0]),
                Vector::new(vec![-1.0]),
                Vector::new(vec![1.0]),
            ],
        )
        .unwrap();

        let results = index.search(&Vector::new(vec![0.0]), 3).unwrap();
        assert_eq!(
            results.iter().map(|r| r.0).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_search_truncates_oversized_k() {
        let index = sample_index();
        let results = index.search(&Vector::new(vec![0.0, 0.0]), 100).unwrap();

        assert_eq!(results.len(), 4);
        let mut positions: Vec<usize> = results.iter().map(|r| r.0).collect();
        positions.sort_unstable();
        positions.dedup();
        assert_eq!(positions.len(), 4);
    }

    #[test]
    fn test_search_k_zero() {
        let index = sample_index();
        let results = index.search(&Vector::new(vec![0.0, 0.0]), 0).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_search_rejects_query_dim_mismatch() {
        let index = sample_index();
        let result = index.search(&Vector::new(vec![0.0, 0.0, 0.0]), 1);
        assert!(matches!(result, Err(Error::InvalidDimension { .. })));
    }
}
