use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::models::Label;

/// Split Error
#[derive(thiserror::Error, Debug)]
pub enum SplitError {
    /// The ratio must leave something on both sides
    #[error("test ratio must lie strictly between 0 and 1, got {0}")]
    InvalidRatio(f64),

    /// A class is too rare to appear in both partitions
    #[error("the {label} class has {count} member(s), at least 2 are required")]
    TooFewMembers {
        /// The rare class
        label: Label,
        /// Its member count
        count: usize,
    },

    /// The ratio leaves a partition smaller than the number of classes
    #[error("a {train}/{test} split cannot hold every class on both sides")]
    PartitionTooSmall {
        /// Training partition size
        train: usize,
        /// Test partition size
        test: usize,
    },
}

/// Indices of the training and test partitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StratifiedSplit {
    /// Training indices
    pub train: Vec<usize>,

    /// Held-out test indices
    pub test: Vec<usize>,
}

/// Split sample indices into train and test partitions, preserving the class balance
/// of `labels` in both. The test partition holds `ceil(test_ratio * n)` samples. The
/// same labels, ratio and seed always produce the same split.
pub fn stratified_split(
    labels: &[Label],
    test_ratio: f64,
    seed: u64,
) -> Result<StratifiedSplit, SplitError> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(SplitError::InvalidRatio(test_ratio));
    }

    let mut members: [Vec<usize>; 2] = [Vec::new(), Vec::new()];

    for (index, label) in labels.iter().enumerate() {
        members[label.index()].push(index);
    }

    for label in Label::ALL {
        let count = members[label.index()].len();

        if count < 2 {
            return Err(SplitError::TooFewMembers { label, count });
        }
    }

    let n = labels.len();
    let n_test = ((test_ratio * n as f64).ceil() as usize).min(n);
    let n_train = n - n_test;

    if n_train < Label::ALL.len() || n_test < Label::ALL.len() {
        return Err(SplitError::PartitionTooSmall {
            train: n_train,
            test: n_test,
        });
    }

    let counts = [members[0].len(), members[1].len()];
    let train_counts = allocate(n_train, counts);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(n_train);
    let mut test = Vec::with_capacity(n_test);

    for (class, indices) in members.iter_mut().enumerate() {
        indices.shuffle(&mut rng);

        let (class_train, class_test) = indices.split_at(train_counts[class]);

        train.extend_from_slice(class_train);
        test.extend_from_slice(class_test);
    }

    train.shuffle(&mut rng);
    test.shuffle(&mut rng);

    Ok(StratifiedSplit { train, test })
}

/// Largest-remainder allocation of `total` slots across classes in proportion to
/// `counts`. Every class gets at least one slot and keeps at least one member back.
fn allocate(total: usize, counts: [usize; 2]) -> [usize; 2] {
    let n: usize = counts.iter().sum();

    let quotas = counts.map(|count| total as f64 * count as f64 / n as f64);
    let mut allocation = quotas.map(|quota| quota.floor() as usize);

    let mut order = [0, 1];
    order.sort_by(|&a, &b| {
        let ra = quotas[a] - quotas[a].floor();
        let rb = quotas[b] - quotas[b].floor();

        rb.total_cmp(&ra).then(a.cmp(&b))
    });

    let mut remaining = total - allocation.iter().sum::<usize>();

    for &class in order.iter().cycle() {
        if remaining == 0 {
            break;
        }

        if allocation[class] < counts[class] {
            allocation[class] += 1;
            remaining -= 1;
        }
    }

    // Both sides must see both classes
    for class in 0..2 {
        let other = 1 - class;

        if allocation[class] == 0 && allocation[other] > 1 {
            allocation[class] += 1;
            allocation[other] -= 1;
        }

        if allocation[class] == counts[class] && counts[other] - allocation[other] > 1 {
            allocation[class] -= 1;
            allocation[other] += 1;
        }
    }

    allocation
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;

    fn labels(spam: usize, ham: usize) -> Vec<Label> {
        let mut labels = vec![Label::Spam; spam];
        labels.extend(vec![Label::Ham; ham]);
        labels
    }

    fn count(labels: &[Label], indices: &[usize], label: Label) -> usize {
        indices.iter().filter(|&&i| labels[i] == label).count()
    }

    #[test]
    fn test_split_sizes() {
        let labels = labels(50, 50);
        let split = stratified_split(&labels, 0.2, 42).unwrap();

        assert_eq!(split.test.len(), 20);
        assert_eq!(split.train.len(), 80);
        assert_eq!(count(&labels, &split.test, Label::Spam), 10);
        assert_eq!(count(&labels, &split.test, Label::Ham), 10);
    }

    #[test]
    fn test_split_is_a_partition() {
        let labels = labels(13, 87);
        let split = stratified_split(&labels, 0.25, 7).unwrap();

        let mut seen: HashSet<usize> = split.train.iter().copied().collect();

        for index in &split.test {
            assert!(seen.insert(*index), "index {index} in both partitions");
        }

        assert_eq!(seen.len(), labels.len());
    }

    #[test]
    fn test_split_preserves_proportions() {
        for (spam, ham) in [(2, 2), (3, 17), (13, 87), (50, 50), (747, 4825), (5, 96)] {
            let labels = labels(spam, ham);
            let n = labels.len() as f64;

            for ratio in [0.1, 0.2, 0.33, 0.5, 0.75] {
                let Ok(split) = stratified_split(&labels, ratio, 42) else {
                    continue;
                };

                let n_test = split.test.len() as f64;

                for (label, members) in [(Label::Spam, spam), (Label::Ham, ham)] {
                    let expected = members as f64 * n_test / n;
                    let actual = count(&labels, &split.test, label) as f64;

                    assert!(
                        (actual - expected).abs() < 1.0,
                        "{label}: {actual} vs {expected} ({spam}/{ham} at {ratio})"
                    );
                    assert!(count(&labels, &split.train, label) > 0);
                }
            }
        }
    }

    #[test]
    fn test_split_is_deterministic() {
        let labels = labels(30, 70);

        assert_eq!(
            stratified_split(&labels, 0.2, 42).unwrap(),
            stratified_split(&labels, 0.2, 42).unwrap()
        );
        assert_ne!(
            stratified_split(&labels, 0.2, 42).unwrap(),
            stratified_split(&labels, 0.2, 43).unwrap()
        );
    }

    #[test]
    fn test_split_errors() {
        let labels = labels(10, 10);

        for ratio in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            assert!(matches!(
                stratified_split(&labels, ratio, 42),
                Err(SplitError::InvalidRatio(_))
            ));
        }

        assert!(matches!(
            stratified_split(&self::labels(1, 10), 0.2, 42),
            Err(SplitError::TooFewMembers {
                label: Label::Spam,
                count: 1
            })
        ));
        assert!(matches!(
            stratified_split(&self::labels(0, 10), 0.2, 42),
            Err(SplitError::TooFewMembers { count: 0, .. })
        ));
        assert!(matches!(
            stratified_split(&self::labels(2, 2), 0.1, 42),
            Err(SplitError::PartitionTooSmall { train: 3, test: 1 })
        ));
    }
}
