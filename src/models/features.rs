use serde::{Deserialize, Serialize};

/// A sparse feature vector over a fixed vocabulary. Entries are kept sorted by index and
/// never hold explicit zeros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// Build a vector of dimension `dim` from `(index, value)` pairs. Zero values and
    /// indices outside `0..dim` are dropped; duplicate indices are summed.
    pub fn new(dim: usize, mut entries: Vec<(usize, f64)>) -> Self {
        entries.retain(|&(index, value)| index < dim && value != 0.0);
        entries.sort_by_key(|&(index, _)| index);

        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());

        for (index, value) in entries {
            match merged.last_mut() {
                Some(last) if last.0 == index => last.1 += value,
                _ => merged.push((index, value)),
            }
        }

        Self {
            dim,
            entries: merged,
        }
    }

    /// The all-zero vector
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    /// Build a vector from a dense slice
    pub fn from_dense(values: &[f64]) -> Self {
        Self::new(values.len(), values.iter().copied().enumerate().collect())
    }

    /// The dimension, i.e. the vocabulary size
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of non-zero entries
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Whether every entry is zero
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over non-zero `(index, value)` pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// The value at `index`, zero when absent
    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Euclidean norm
    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_new_sorts_merges_and_drops() {
        let vector = FeatureVector::new(4, vec![(3, 1.0), (1, 2.0), (3, 0.5), (2, 0.0), (9, 1.0)]);

        assert_eq!(vector.iter().collect::<Vec<_>>(), vec![(1, 2.0), (3, 1.5)]);
        assert_eq!(vector.dim(), 4);
        assert_eq!(vector.get(3), 1.5);
        assert_eq!(vector.get(0), 0.0);
        assert_eq!(vector.get(2), 0.0);
        assert_eq!(vector.nnz(), 2);
    }

    #[test]
    fn test_zero_vector() {
        let vector = FeatureVector::zeros(5);

        assert!(vector.is_zero());
        assert_eq!(vector.norm(), 0.0);
        assert_eq!(vector, FeatureVector::from_dense(&[0.0; 5]));
    }
}
