use std::path::Path;

use serde::Serialize;

use crate::{
    models::{
        ArtifactError, Classifier, ClassifierError, Label, ModelArtifact, MultinomialNb,
        TfidfVectorizer,
    },
    normalizer::Normalizer,
};

/// Advice attached to a spam verdict
pub static SPAM_RECOMMENDATION: &str =
    "Do not click any links or respond to this message. Consider reporting it to your carrier.";

/// Advice attached to a legitimate verdict
pub static HAM_RECOMMENDATION: &str = "This message is safe to read and respond to.";

/// Classify Error
#[derive(thiserror::Error, Debug)]
pub enum ClassifyError {
    /// Blank input never reaches the model
    #[error("No message provided")]
    EmptyMessage,

    /// The model failed
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

/// The outcome of classifying one message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    /// Predicted label
    pub label: Label,

    /// Probability of the predicted label, absent when the classifier has no
    /// probabilistic output
    pub probability: Option<f64>,

    /// Advice for the reader
    pub recommendation: &'static str,
}

impl ClassificationResult {
    /// Attach the recommendation matching `label`
    pub fn new(label: Label, probability: Option<f64>) -> Self {
        let recommendation = match label {
            Label::Spam => SPAM_RECOMMENDATION,
            Label::Ham => HAM_RECOMMENDATION,
        };

        Self {
            label,
            probability,
            recommendation,
        }
    }

    /// Whether the message was classified as spam
    pub fn is_spam(&self) -> bool {
        self.label.is_spam()
    }

    /// Human-readable verdict
    pub fn verdict(&self) -> &'static str {
        match self.label {
            Label::Spam => "SPAM DETECTED",
            Label::Ham => "LEGITIMATE MESSAGE",
        }
    }

    /// Confidence as a percentage rounded to two decimals
    pub fn confidence_percent(&self) -> Option<f64> {
        self.probability
            .map(|probability| (probability * 10_000.0).round() / 100.0)
    }
}

/// A loaded, read-only spam detector. Construct it once per process and share it by
/// reference (or `Arc`) with every caller.
#[derive(Debug, Clone)]
pub struct SpamDetector<C = MultinomialNb> {
    normalizer: Normalizer,
    vectorizer: TfidfVectorizer,
    classifier: C,
}

impl SpamDetector<MultinomialNb> {
    /// Load the artifact persisted in `artifact_dir`
    pub fn load(artifact_dir: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let artifact: ModelArtifact = ModelArtifact::load(artifact_dir)?;

        Ok(Self::from_artifact(artifact))
    }

    /// Wrap an already loaded artifact
    pub fn from_artifact(artifact: ModelArtifact) -> Self {
        let (vectorizer, classifier) = artifact.into_parts();

        Self {
            normalizer: Normalizer::new(),
            vectorizer,
            classifier,
        }
    }
}

impl<C: Classifier> SpamDetector<C> {
    /// Pair a vectorizer with any classifier fitted on its output
    pub fn new(vectorizer: TfidfVectorizer, classifier: C) -> Result<Self, ClassifierError> {
        if vectorizer.vocabulary_len() != classifier.n_features() {
            return Err(ClassifierError::DimensionMismatch {
                expected: classifier.n_features(),
                actual: vectorizer.vocabulary_len(),
            });
        }

        Ok(Self {
            normalizer: Normalizer::new(),
            vectorizer,
            classifier,
        })
    }

    /// The fitted vectorizer
    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    /// Classify a raw message: normalize, vectorize, predict. Blank input is rejected;
    /// a message left empty by normalization is still classified from the priors. A
    /// failure while computing probabilities leaves the confidence absent; only a
    /// failing `predict` is an error.
    pub fn classify(&self, message: &str) -> Result<ClassificationResult, ClassifyError> {
        if message.trim().is_empty() {
            return Err(ClassifyError::EmptyMessage);
        }

        let normalized = self.normalizer.normalize(message);

        if normalized.is_empty() {
            log::debug!("Message has no features left after normalization");
        }

        let features = self.vectorizer.transform(&normalized);

        match self.classifier.predict_proba(&features) {
            Ok(probabilities) => Ok(ClassificationResult::new(
                probabilities.label(),
                Some(probabilities.confidence()),
            )),
            Err(ClassifierError::ProbabilitiesUnavailable) => {
                log::warn!("Classifier has no probability output, confidence is absent");

                Ok(ClassificationResult::new(
                    self.classifier.predict(&features)?,
                    None,
                ))
            }
            Err(error) => {
                log::warn!("Unable to compute confidence, falling back to the label: {error}");

                Ok(ClassificationResult::new(
                    self.classifier.predict(&features)?,
                    None,
                ))
            }
        }
    }
}
