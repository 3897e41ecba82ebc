use serde::{Deserialize, Serialize};

use crate::models::Label;

/// A 2×2 confusion matrix with spam as the positive class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// Ham predicted as ham
    pub true_negatives: usize,

    /// Ham predicted as spam
    pub false_positives: usize,

    /// Spam predicted as ham
    pub false_negatives: usize,

    /// Spam predicted as spam
    pub true_positives: usize,
}

impl ConfusionMatrix {
    /// Tally `(truth, prediction)` pairs
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Label, Label)>) -> Self {
        let mut matrix = Self::default();

        for pair in pairs {
            match pair {
                (Label::Ham, Label::Ham) => matrix.true_negatives += 1,
                (Label::Ham, Label::Spam) => matrix.false_positives += 1,
                (Label::Spam, Label::Ham) => matrix.false_negatives += 1,
                (Label::Spam, Label::Spam) => matrix.true_positives += 1,
            }
        }

        matrix
    }

    /// Number of tallied samples
    pub fn total(&self) -> usize {
        self.true_negatives + self.false_positives + self.false_negatives + self.true_positives
    }
}

/// Held-out evaluation of a fitted model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Fraction of correct predictions
    pub accuracy: f64,

    /// Fraction of spam predictions that were spam
    pub precision: f64,

    /// Fraction of spam that was predicted as spam
    pub recall: f64,

    /// Harmonic mean of precision and recall
    pub f1: f64,

    /// Raw counts
    pub confusion: ConfusionMatrix,
}

impl Evaluation {
    /// Score predictions against the truth. Undefined ratios (zero denominators)
    /// are reported as 0.
    pub fn new(confusion: ConfusionMatrix) -> Self {
        let ConfusionMatrix {
            true_negatives: tn,
            false_positives: fp,
            false_negatives: fn_,
            true_positives: tp,
        } = confusion;

        let accuracy = ratio(tp + tn, confusion.total());
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            accuracy,
            precision,
            recall,
            f1,
            confusion,
        }
    }

    /// Score aligned truth and prediction slices
    pub fn from_predictions(truth: &[Label], predicted: &[Label]) -> Self {
        Self::new(ConfusionMatrix::from_pairs(
            truth.iter().copied().zip(predicted.iter().copied()),
        ))
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
