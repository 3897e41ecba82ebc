use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::FeatureVector;

/// Binary message label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Legitimate message
    Ham = 0,

    /// Spam message
    Spam = 1,
}

impl Label {
    /// Every label, in class-index order
    pub const ALL: [Label; 2] = [Label::Ham, Label::Spam];

    /// The class index (ham = 0, spam = 1)
    pub fn index(self) -> usize {
        self as usize
    }

    /// The label for a class index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Encode a raw dataset label: `spam` (trimmed, any case) is spam, anything else ham.
    ///
    /// Matching deliberately differs from exact equality with `"spam"`: `Spam` and
    /// ` spam ` are spam too.
    pub fn from_raw(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("spam") {
            Label::Spam
        } else {
            Label::Ham
        }
    }

    /// Get the string token for this label
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Ham => "ham",
            Label::Spam => "spam",
        }
    }

    /// Whether this is the spam label
    pub fn is_spam(self) -> bool {
        self == Label::Spam
    }
}

impl From<bool> for Label {
    fn from(is_spam: bool) -> Self {
        if is_spam {
            Label::Spam
        } else {
            Label::Ham
        }
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A probability distribution over {ham, spam}
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probabilities {
    /// P(ham)
    pub ham: f64,

    /// P(spam)
    pub spam: f64,
}

impl Probabilities {
    /// Normalize per-class joint log likelihoods into probabilities (log-sum-exp)
    pub fn from_log_likelihood(jll: [f64; 2]) -> Self {
        let max = jll[0].max(jll[1]);
        let ham = (jll[0] - max).exp();
        let spam = (jll[1] - max).exp();
        let total = ham + spam;

        Self {
            ham: ham / total,
            spam: spam / total,
        }
    }

    /// The probability of `label`
    pub fn get(&self, label: Label) -> f64 {
        match label {
            Label::Ham => self.ham,
            Label::Spam => self.spam,
        }
    }

    /// The more probable label; ties go to ham
    pub fn label(&self) -> Label {
        Label::from(self.spam > self.ham)
    }

    /// The probability of the more probable label
    pub fn confidence(&self) -> f64 {
        self.ham.max(self.spam)
    }
}

/// Classifier Error
#[derive(thiserror::Error, Debug)]
pub enum ClassifierError {
    /// The classifier only produces labels
    #[error("classifier does not produce class probabilities")]
    ProbabilitiesUnavailable,

    /// The vector does not match the fitted vocabulary
    #[error("feature vector has {actual} dimensions, the model expects {expected}")]
    DimensionMismatch {
        /// Fitted dimension
        expected: usize,
        /// Dimension of the offending vector
        actual: usize,
    },

    /// Nothing to fit on
    #[error("cannot fit a classifier without samples")]
    EmptyTrainingSet,

    /// Features and labels disagree in length
    #[error("got {features} feature vectors but {labels} labels")]
    LengthMismatch {
        /// Number of feature vectors
        features: usize,
        /// Number of labels
        labels: usize,
    },

    /// One of the two classes never appears in the labels
    #[error("training labels contain no {0} samples")]
    MissingClass(Label),

    /// Smoothing must be a non-negative number
    #[error("invalid smoothing parameter {0}")]
    InvalidAlpha(f64),
}

/// A fitted binary classifier over feature vectors. Fitted state is read-only, so
/// implementations are shared across threads without locking.
pub trait Classifier: Send + Sync {
    /// The feature dimension the classifier was fitted on
    fn n_features(&self) -> usize;

    /// Predict a label
    fn predict(&self, features: &FeatureVector) -> Result<Label, ClassifierError>;

    /// Predict a distribution over labels. Classifiers without a probabilistic output
    /// keep the default, which reports [ClassifierError::ProbabilitiesUnavailable].
    fn predict_proba(&self, _features: &FeatureVector) -> Result<Probabilities, ClassifierError> {
        Err(ClassifierError::ProbabilitiesUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_raw() {
        assert_eq!(Label::from_raw("spam"), Label::Spam);
        assert_eq!(Label::from_raw(" SPAM "), Label::Spam);
        assert_eq!(Label::from_raw("Spam"), Label::Spam);
        assert_eq!(Label::from_raw("spam\t"), Label::Spam);
        assert_eq!(Label::from_raw("spammy"), Label::Ham);
        assert_eq!(Label::from_raw("ham"), Label::Ham);
        assert_eq!(Label::from_raw("legit"), Label::Ham);
        assert_eq!(Label::from_raw(""), Label::Ham);
    }

    #[test]
    fn test_label_index() {
        for label in Label::ALL {
            assert_eq!(Label::from_index(label.index()), Some(label));
        }

        assert_eq!(Label::from_index(2), None);
        assert_eq!(Label::Spam.to_string(), "spam");
    }

    #[test]
    fn test_probabilities_from_log_likelihood() {
        let probabilities = Probabilities::from_log_likelihood([(0.25f64).ln(), (0.75f64).ln()]);

        assert!((probabilities.ham - 0.25).abs() < 1e-12);
        assert!((probabilities.spam - 0.75).abs() < 1e-12);
        assert_eq!(probabilities.label(), Label::Spam);
        assert!((probabilities.confidence() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_probabilities_survive_large_magnitudes() {
        let probabilities = Probabilities::from_log_likelihood([-1200.0, -1210.0]);

        assert!((probabilities.ham + probabilities.spam - 1.0).abs() < 1e-12);
        assert_eq!(probabilities.label(), Label::Ham);
    }

    #[test]
    fn test_probabilities_tie_goes_to_ham() {
        let probabilities = Probabilities::from_log_likelihood([-3.0, -3.0]);

        assert_eq!(probabilities.label(), Label::Ham);
        assert_eq!(probabilities.confidence(), 0.5);
    }
}
