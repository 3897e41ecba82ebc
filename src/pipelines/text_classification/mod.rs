/// Labelled items
pub mod item;

/// Stratified train/test split
pub mod split;

/// Evaluation metrics
pub mod metrics;

/// Training
pub mod training;

/// Inference
pub mod inference;

pub use inference::{
    ClassificationResult, ClassifyError, SpamDetector, HAM_RECOMMENDATION, SPAM_RECOMMENDATION,
};
pub use item::Item;
pub use metrics::{ConfusionMatrix, Evaluation};
pub use split::{stratified_split, SplitError, StratifiedSplit};
pub use training::{fit, train, TrainingConfig, TrainingOutcome, TrainingReport};
