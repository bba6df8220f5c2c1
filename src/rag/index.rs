//! In-memory nearest-neighbour index.
//!
//! Embeddings are L2-normalised on insert so cosine similarity reduces to a
//! single matrix-vector product at query time.

use std::cmp::Ordering;

use ndarray::{Array1, Array2};

use crate::core::errors::RagError;

#[derive(Debug, Clone)]
pub struct VectorIndex {
    vectors: Array2<f32>,
}

impl VectorIndex {
    pub fn build(embeddings: Vec<Vec<f32>>) -> Result<Self, RagError> {
        let rows = embeddings.len();
        let dim = embeddings.first().map(Vec::len).unwrap_or(0);
        if rows == 0 || dim == 0 {
            return Err(RagError::Ingestion(
                "cannot build an index without embeddings".to_string(),
            ));
        }

        let mut flat = Vec::with_capacity(rows * dim);
        for (row, embedding) in embeddings.into_iter().enumerate() {
            if embedding.len() != dim {
                return Err(RagError::Ingestion(format!(
                    "embedding {} has dimension {}, expected {}",
                    row,
                    embedding.len(),
                    dim
                )));
            }
            flat.extend(normalized(embedding));
        }

        let vectors = Array2::from_shape_vec((rows, dim), flat)
            .map_err(|e| RagError::Ingestion(e.to_string()))?;
        Ok(Self { vectors })
    }

    pub fn len(&self) -> usize {
        self.vectors.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dim(&self) -> usize {
        self.vectors.ncols()
    }

    /// Up to `k` `(row, cosine score)` pairs, best first.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>, RagError> {
        if query.len() != self.dim() {
            return Err(RagError::Retrieval(format!(
                "query dimension {} does not match index dimension {}",
                query.len(),
                self.dim()
            )));
        }

        let query = Array1::from(normalized(query.to_vec()));
        let scores = self.vectors.dot(&query);

        let mut ranked: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
        ranked.sort_by(|left, right| right.1.partial_cmp(&left.1).unwrap_or(Ordering::Equal));
        ranked.truncate(k);
        Ok(ranked)
    }
}

fn normalized(mut vector: Vec<f32>) -> Vec<f32> {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
    vector
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(left: f32, right: f32) -> bool {
        (left - right).abs() < 1e-5
    }

    #[test]
    fn ranking_returns_highest_similarity_first() {
        let index =
            VectorIndex::build(vec![vec![0.8, 0.2], vec![0.1, 0.9], vec![0.9, 0.0]]).unwrap();
        let ranked = index.search(&[1.0, 0.0], 3).unwrap();

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].0, 2);
        assert!(approx_eq(ranked[0].1, 1.0));
        assert_eq!(ranked[2].0, 1);
    }

    #[test]
    fn search_truncates_to_k() {
        let index = VectorIndex::build(vec![vec![1.0, 0.0]; 5]).unwrap();
        assert_eq!(index.search(&[1.0, 0.0], 3).unwrap().len(), 3);
        assert_eq!(index.search(&[1.0, 0.0], 10).unwrap().len(), 5);
    }

    #[test]
    fn scores_are_scale_invariant() {
        let index = VectorIndex::build(vec![vec![3.0, 4.0]]).unwrap();
        let ranked = index.search(&[30.0, 40.0], 1).unwrap();
        assert!(approx_eq(ranked[0].1, 1.0));
    }

    #[test]
    fn zero_vectors_score_zero() {
        let index = VectorIndex::build(vec![vec![0.0, 0.0], vec![1.0, 0.0]]).unwrap();
        let ranked = index.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(ranked[0].0, 1);
        assert!(approx_eq(ranked[1].1, 0.0));
    }

    #[test]
    fn build_rejects_empty_and_ragged_input() {
        assert!(VectorIndex::build(vec![]).is_err());
        assert!(VectorIndex::build(vec![vec![1.0, 0.0], vec![1.0]]).is_err());
    }

    #[test]
    fn search_rejects_dimension_mismatch() {
        let index = VectorIndex::build(vec![vec![1.0, 0.0]]).unwrap();
        let err = index.search(&[1.0, 0.0, 0.0], 1).unwrap_err();
        assert!(matches!(err, RagError::Retrieval(_)));
    }
}
