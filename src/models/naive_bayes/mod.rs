use serde::{Deserialize, Serialize};

use super::{Classifier, ClassifierError, FeatureVector, Label, Probabilities};

/// Classifier configuration
pub mod config;

pub use config::NaiveBayesConfig;

/// Smallest smoothing value used before log probabilities degenerate
pub static ALPHA_MIN: f64 = 1e-10;

/// A fitted Multinomial Naive Bayes classifier over non-negative feature vectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNb {
    alpha: f64,
    class_count: [f64; 2],
    class_log_prior: [f64; 2],
    feature_count: [Vec<f64>; 2],
    feature_log_prob: [Vec<f64>; 2],
}

impl NaiveBayesConfig {
    /// Fit per-class priors and feature log probabilities
    pub fn fit(
        &self,
        features: &[FeatureVector],
        labels: &[Label],
    ) -> Result<MultinomialNb, ClassifierError> {
        if features.len() != labels.len() {
            return Err(ClassifierError::LengthMismatch {
                features: features.len(),
                labels: labels.len(),
            });
        }

        let Some(first) = features.first() else {
            return Err(ClassifierError::EmptyTrainingSet);
        };

        let alpha = checked_alpha(self.alpha)?;
        let n_features = first.dim();

        let mut class_count = [0.0f64; 2];
        let mut feature_count = [vec![0.0; n_features], vec![0.0; n_features]];

        for (vector, label) in features.iter().zip(labels) {
            if vector.dim() != n_features {
                return Err(ClassifierError::DimensionMismatch {
                    expected: n_features,
                    actual: vector.dim(),
                });
            }

            let class = label.index();
            class_count[class] += 1.0;

            for (index, value) in vector.iter() {
                feature_count[class][index] += value;
            }
        }

        for label in Label::ALL {
            if class_count[label.index()] == 0.0 {
                return Err(ClassifierError::MissingClass(label));
            }
        }

        let class_log_prior = if self.fit_prior {
            let total = class_count[0] + class_count[1];

            [
                (class_count[0] / total).ln(),
                (class_count[1] / total).ln(),
            ]
        } else {
            [(0.5f64).ln(); 2]
        };

        let feature_log_prob = [
            log_probabilities(&feature_count[0], alpha),
            log_probabilities(&feature_count[1], alpha),
        ];

        log::debug!(
            "Fitted naive bayes on {} ham and {} spam samples over {} features",
            class_count[0],
            class_count[1],
            n_features
        );

        Ok(MultinomialNb {
            alpha,
            class_count,
            class_log_prior,
            feature_count,
            feature_log_prob,
        })
    }
}

impl MultinomialNb {
    /// The smoothing value actually used
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Number of training samples per class
    pub fn class_count(&self, label: Label) -> f64 {
        self.class_count[label.index()]
    }

    /// ln P(class)
    pub fn class_log_prior(&self, label: Label) -> f64 {
        self.class_log_prior[label.index()]
    }

    /// Smoothed ln P(feature | class) for every feature
    pub fn feature_log_prob(&self, label: Label) -> &[f64] {
        &self.feature_log_prob[label.index()]
    }

    /// Per-class unnormalized log posterior: prior plus the feature-weighted log
    /// probabilities
    pub fn joint_log_likelihood(
        &self,
        features: &FeatureVector,
    ) -> Result<[f64; 2], ClassifierError> {
        self.check_dim(features)?;

        let mut jll = self.class_log_prior;

        for (class, total) in jll.iter_mut().enumerate() {
            let log_prob = &self.feature_log_prob[class];

            *total += features
                .iter()
                .map(|(index, value)| value * log_prob[index])
                .sum::<f64>();
        }

        Ok(jll)
    }

    fn check_dim(&self, features: &FeatureVector) -> Result<(), ClassifierError> {
        if features.dim() != self.n_features() {
            return Err(ClassifierError::DimensionMismatch {
                expected: self.n_features(),
                actual: features.dim(),
            });
        }

        Ok(())
    }
}

impl Classifier for MultinomialNb {
    fn n_features(&self) -> usize {
        self.feature_count[0].len()
    }

    fn predict(&self, features: &FeatureVector) -> Result<Label, ClassifierError> {
        Ok(self.predict_proba(features)?.label())
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Probabilities, ClassifierError> {
        Ok(Probabilities::from_log_likelihood(
            self.joint_log_likelihood(features)?,
        ))
    }
}

fn checked_alpha(alpha: f64) -> Result<f64, ClassifierError> {
    if alpha.is_nan() || alpha < 0.0 {
        return Err(ClassifierError::InvalidAlpha(alpha));
    }

    if alpha < ALPHA_MIN {
        log::warn!("alpha too small, clamping from {alpha} to {ALPHA_MIN}");

        return Ok(ALPHA_MIN);
    }

    Ok(alpha)
}

fn log_probabilities(counts: &[f64], alpha: f64) -> Vec<f64> {
    let denominator = (counts.iter().sum::<f64>() + alpha * counts.len() as f64).ln();

    counts
        .iter()
        .map(|count| (count + alpha).ln() - denominator)
        .collect()
}
