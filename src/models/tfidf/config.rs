use burn::config::Config;
use serde::{Deserialize, Serialize};

/// Tokens of two or more word characters
pub static DEFAULT_TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// How candidate terms are ranked when the vocabulary is capped at `max_features`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureRanking {
    /// Number of training documents containing the term
    DocumentFrequency,

    /// Total occurrences of the term across the training corpus
    TermFrequency,
}

/// TF-IDF vectorizer configuration
#[derive(Config, Debug)]
pub struct TfidfConfig {
    /// Maximum vocabulary size
    #[config(default = 3000)]
    pub max_features: usize,

    /// Ranking used to pick the vocabulary
    #[config(default = "FeatureRanking::DocumentFrequency")]
    pub ranking: FeatureRanking,

    /// Regular expression selecting terms from a normalized document
    #[config(default = "DEFAULT_TOKEN_PATTERN.to_string()")]
    pub token_pattern: String,

    /// Lowercase documents before matching terms
    #[config(default = true)]
    pub lowercase: bool,

    /// Add one to document frequencies, as if an extra document contained every term
    #[config(default = true)]
    pub smooth_idf: bool,

    /// Replace tf with 1 + ln(tf)
    #[config(default = false)]
    pub sublinear_tf: bool,

    /// Scale every vector to unit L2 norm
    #[config(default = true)]
    pub l2_normalize: bool,
}
