//! TF-IDF vectorizer.
//!
//! [TfidfConfig::fit] learns a capped vocabulary and per-term inverse document
//! frequencies from a normalized training corpus and returns a [TfidfVectorizer]. The
//! fitted vectorizer has no mutating methods: its vocabulary is frozen for the lifetime
//! of the artifact, and out-of-vocabulary terms contribute nothing to a vector.

use std::collections::{HashMap, HashSet};

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::FeatureVector;

/// Vectorizer configuration
pub mod config;

pub use config::{FeatureRanking, TfidfConfig, DEFAULT_TOKEN_PATTERN};

/// Vectorizer Error
#[derive(thiserror::Error, Debug)]
pub enum VectorizerError {
    /// Nothing to fit on
    #[error("cannot fit a vectorizer on an empty corpus")]
    EmptyCorpus,

    /// The corpus produced no terms at all
    #[error("empty vocabulary: the corpus contains no terms matching the token pattern")]
    EmptyVocabulary,

    /// A vocabulary must hold at least one term
    #[error("max_features must be positive")]
    ZeroMaxFeatures,

    /// The token pattern does not compile
    #[error("invalid token pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A decoded vectorizer whose terms and weights disagree
    #[error("vectorizer holds {terms} terms but {weights} idf weights")]
    Inconsistent {
        /// Number of terms
        terms: usize,
        /// Number of idf weights
        weights: usize,
    },
}

/// A fitted TF-IDF vectorizer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TfidfRecord", into = "TfidfRecord")]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    terms: Vec<String>,
    idf: Vec<f64>,
    pattern: Regex,
    lowercase: bool,
    sublinear_tf: bool,
    l2_normalize: bool,
}

/// The persisted form of a [TfidfVectorizer]
#[derive(Clone, Serialize, Deserialize)]
struct TfidfRecord {
    terms: Vec<String>,
    idf: Vec<f64>,
    token_pattern: String,
    lowercase: bool,
    sublinear_tf: bool,
    l2_normalize: bool,
}

impl TfidfConfig {
    /// Learn the vocabulary and idf weights from a corpus of normalized documents
    pub fn fit<S: AsRef<str>>(&self, corpus: &[S]) -> Result<TfidfVectorizer, VectorizerError> {
        if corpus.is_empty() {
            return Err(VectorizerError::EmptyCorpus);
        }

        if self.max_features == 0 {
            return Err(VectorizerError::ZeroMaxFeatures);
        }

        let pattern = Regex::new(&self.token_pattern)?;

        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        let mut term_frequency: HashMap<String, usize> = HashMap::new();

        for document in corpus {
            let mut seen = HashSet::new();

            for term in analyze(&pattern, self.lowercase, document.as_ref()) {
                *term_frequency.entry(term.clone()).or_default() += 1;

                if seen.insert(term.clone()) {
                    *document_frequency.entry(term).or_default() += 1;
                }
            }
        }

        if document_frequency.is_empty() {
            return Err(VectorizerError::EmptyVocabulary);
        }

        let mut ranked: Vec<(&String, usize)> = document_frequency
            .iter()
            .map(|(term, &df)| {
                let score = match self.ranking {
                    FeatureRanking::DocumentFrequency => df,
                    FeatureRanking::TermFrequency => term_frequency[term],
                };

                (term, score)
            })
            .collect();

        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(self.max_features);

        let mut terms: Vec<String> = ranked.into_iter().map(|(term, _)| term.clone()).collect();
        terms.sort();

        let n_documents = corpus.len() as f64;

        let idf = terms
            .iter()
            .map(|term| {
                let df = document_frequency[term] as f64;

                if self.smooth_idf {
                    ((1.0 + n_documents) / (1.0 + df)).ln() + 1.0
                } else {
                    (n_documents / df).ln() + 1.0
                }
            })
            .collect();

        log::debug!(
            "Fitted vocabulary of {} terms from {} candidates",
            terms.len(),
            document_frequency.len()
        );

        Ok(TfidfVectorizer::from_parts(
            terms,
            idf,
            pattern,
            self.lowercase,
            self.sublinear_tf,
            self.l2_normalize,
        ))
    }
}

impl TfidfVectorizer {
    fn from_parts(
        terms: Vec<String>,
        idf: Vec<f64>,
        pattern: Regex,
        lowercase: bool,
        sublinear_tf: bool,
        l2_normalize: bool,
    ) -> Self {
        let vocabulary = terms
            .iter()
            .enumerate()
            .map(|(index, term)| (term.clone(), index))
            .collect();

        Self {
            vocabulary,
            terms,
            idf,
            pattern,
            lowercase,
            sublinear_tf,
            l2_normalize,
        }
    }

    /// Map a normalized document to its TF-IDF vector
    pub fn transform(&self, text: &str) -> FeatureVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();

        for term in analyze(&self.pattern, self.lowercase, text) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_default() += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(index, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };

                (index, tf * self.idf[index])
            })
            .collect();

        if self.l2_normalize {
            let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();

            if norm > 0.0 {
                for (_, weight) in entries.iter_mut() {
                    *weight /= norm;
                }
            }
        }

        FeatureVector::new(self.terms.len(), entries)
    }

    /// Transform every document of a batch
    pub fn transform_batch<S: AsRef<str>>(&self, documents: &[S]) -> Vec<FeatureVector> {
        documents
            .iter()
            .map(|document| self.transform(document.as_ref()))
            .collect()
    }

    /// Vocabulary size, which is also the dimension of every produced vector
    pub fn vocabulary_len(&self) -> usize {
        self.terms.len()
    }

    /// Vocabulary terms in feature-index order
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// The feature index of `term`, if it is in the vocabulary
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// The idf weight of `term`, if it is in the vocabulary
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.index_of(term).map(|index| self.idf[index])
    }
}

impl TryFrom<TfidfRecord> for TfidfVectorizer {
    type Error = VectorizerError;

    fn try_from(record: TfidfRecord) -> Result<Self, Self::Error> {
        if record.terms.len() != record.idf.len() {
            return Err(VectorizerError::Inconsistent {
                terms: record.terms.len(),
                weights: record.idf.len(),
            });
        }

        let pattern = Regex::new(&record.token_pattern)?;

        Ok(Self::from_parts(
            record.terms,
            record.idf,
            pattern,
            record.lowercase,
            record.sublinear_tf,
            record.l2_normalize,
        ))
    }
}

impl From<TfidfVectorizer> for TfidfRecord {
    fn from(vectorizer: TfidfVectorizer) -> Self {
        Self {
            token_pattern: vectorizer.pattern.as_str().to_string(),
            terms: vectorizer.terms,
            idf: vectorizer.idf,
            lowercase: vectorizer.lowercase,
            sublinear_tf: vectorizer.sublinear_tf,
            l2_normalize: vectorizer.l2_normalize,
        }
    }
}

fn analyze(pattern: &Regex, lowercase: bool, text: &str) -> Vec<String> {
    let text = if lowercase {
        text.to_lowercase()
    } else {
        text.to_string()
    };

    pattern
        .find_iter(&text)
        .map(|term| term.as_str().to_string())
        .collect()
}
