/// Sparse feature vectors
pub mod features;

/// Labels and the classifier seam
pub mod classifier;

/// TF-IDF vectorizer
pub mod tfidf;

/// Multinomial Naive Bayes
pub mod naive_bayes;

/// Persisted model artifacts
pub mod artifact;

pub use artifact::{ArtifactError, ModelArtifact};
pub use classifier::{Classifier, ClassifierError, Label, Probabilities};
pub use features::FeatureVector;
pub use naive_bayes::{MultinomialNb, NaiveBayesConfig};
pub use tfidf::{FeatureRanking, TfidfConfig, TfidfVectorizer, VectorizerError};
