use std::path::Path;

use burn::{config::Config, data::dataset::Dataset};
use serde::{Deserialize, Serialize};

use crate::{
    models::{Classifier, Label, ModelArtifact, NaiveBayesConfig, TfidfConfig},
    normalizer::Normalizer,
};

use super::{
    metrics::Evaluation,
    split::{stratified_split, StratifiedSplit},
    Item,
};

/// Effective configuration file written next to the artifacts
pub static CONFIG_FILE: &str = "config.json";

/// Evaluation report written next to the artifacts
pub static METRICS_FILE: &str = "metrics.json";

/// Define configuration struct for a training run
#[derive(Config, Debug)]
pub struct TrainingConfig {
    /// Vectorizer settings
    #[config(default = "TfidfConfig::new()")]
    pub vectorizer: TfidfConfig,

    /// Classifier settings
    #[config(default = "NaiveBayesConfig::new()")]
    pub classifier: NaiveBayesConfig,

    /// Share of the dataset held out for evaluation
    #[config(default = 0.2)]
    pub test_ratio: f64,

    /// Seed for the stratified shuffle
    #[config(default = 42)]
    pub seed: u64,

    /// Directory receiving the model artifact, config and metrics
    #[config(default = "\"artifacts\".to_string()")]
    pub artifact_dir: String,
}

/// Summary of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Number of labelled messages
    pub dataset_size: usize,

    /// Spam messages in the dataset
    pub spam_count: usize,

    /// Ham messages in the dataset
    pub ham_count: usize,

    /// Training partition size
    pub train_size: usize,

    /// Held-out partition size
    pub test_size: usize,

    /// Number of vectorizer features
    pub vocabulary_size: usize,

    /// Held-out scores
    pub evaluation: Evaluation,
}

/// A fitted artifact together with its evaluation
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    /// The fitted vectorizer and classifier
    pub artifact: ModelArtifact,

    /// What happened
    pub report: TrainingReport,
}

/// Fit a vectorizer and classifier on the stratified training partition of
/// `dataset` and evaluate them on the held-out partition. Nothing is written.
pub fn fit<I: Item, D: Dataset<I>>(
    dataset: &D,
    config: &TrainingConfig,
) -> anyhow::Result<TrainingOutcome> {
    if dataset.is_empty() {
        bail!("The dataset is empty, refusing to fit a model");
    }

    let normalizer = Normalizer::new();

    let (documents, labels): (Vec<String>, Vec<Label>) = dataset
        .iter()
        .map(|item| (normalizer.normalize(item.input()), item.label()))
        .unzip();

    let spam_count = labels.iter().filter(|label| label.is_spam()).count();
    let ham_count = labels.len() - spam_count;

    log::info!(
        "Normalized {} messages ({} spam, {} ham)",
        labels.len(),
        spam_count,
        ham_count
    );

    let StratifiedSplit { train, test } =
        stratified_split(&labels, config.test_ratio, config.seed)?;

    let train_documents: Vec<&str> = train.iter().map(|&i| documents[i].as_str()).collect();
    let train_labels: Vec<Label> = train.iter().map(|&i| labels[i]).collect();

    // Fitted on the training partition only
    let vectorizer = config.vectorizer.fit(&train_documents)?;
    let features = vectorizer.transform_batch(&train_documents);

    log::info!(
        "Fitted vocabulary of {} terms on {} training messages",
        vectorizer.vocabulary_len(),
        train.len()
    );

    let classifier = config.classifier.fit(&features, &train_labels)?;

    let mut predicted = Vec::with_capacity(test.len());
    for &index in &test {
        predicted.push(classifier.predict(&vectorizer.transform(&documents[index]))?);
    }

    let truth: Vec<Label> = test.iter().map(|&i| labels[i]).collect();
    let evaluation = Evaluation::from_predictions(&truth, &predicted);

    log::info!(
        "Held-out accuracy {:.4} on {} messages",
        evaluation.accuracy,
        test.len()
    );

    let report = TrainingReport {
        dataset_size: labels.len(),
        spam_count,
        ham_count,
        train_size: train.len(),
        test_size: test.len(),
        vocabulary_size: vectorizer.vocabulary_len(),
        evaluation,
    };

    let artifact = ModelArtifact::new(vectorizer, classifier)?;

    Ok(TrainingOutcome { artifact, report })
}

/// Define train function: fit, evaluate and persist the artifact, the effective
/// config and the metrics into `config.artifact_dir`
pub fn train<I: Item, D: Dataset<I>>(
    dataset: &D,
    config: &TrainingConfig,
) -> anyhow::Result<TrainingReport> {
    let TrainingOutcome { artifact, report } = fit(dataset, config)?;

    let artifact_dir = Path::new(&config.artifact_dir);

    artifact.save(artifact_dir)?;

    config
        .save(artifact_dir.join(CONFIG_FILE))
        .map_err(|e| anyhow!("Unable to save config file: {}", e))?;

    std::fs::write(
        artifact_dir.join(METRICS_FILE),
        serde_json::to_string_pretty(&report)?,
    )
    .map_err(|e| anyhow!("Unable to save metrics file: {}", e))?;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use burn::data::dataset::InMemDataset;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::pipelines::text_classification::split::SplitError;

    #[derive(Debug, Clone)]
    struct Message(&'static str, Label);

    impl Item for Message {
        fn input(&self) -> &str {
            self.0
        }

        fn label(&self) -> Label {
            self.1
        }
    }

    fn dataset() -> InMemDataset<Message> {
        let spam = [
            "WIN a FREE prize now, claim your cash reward",
            "Urgent! Claim your free voucher prize today",
            "Congratulations, you won a free cash bonus",
            "Free entry to win a prize, text CLAIM now",
            "You have won a reward! Claim your free gift",
        ];
        let ham = [
            "Are we still meeting for lunch tomorrow?",
            "I'll be home late tonight, save me dinner",
            "Can you pick up milk on the way home",
            "See you at the meeting after lunch",
            "Dinner at mum's tonight, don't be late",
        ];

        InMemDataset::new(
            spam.into_iter()
                .map(|text| Message(text, Label::Spam))
                .chain(ham.into_iter().map(|text| Message(text, Label::Ham)))
                .collect(),
        )
    }

    #[test]
    fn test_fit_reports_split_and_scores() {
        let outcome = fit(&dataset(), &TrainingConfig::new()).unwrap();
        let report = outcome.report;

        assert_eq!(report.dataset_size, 10);
        assert_eq!(report.spam_count, 5);
        assert_eq!(report.ham_count, 5);
        assert_eq!(report.test_size, 2);
        assert_eq!(report.train_size, 8);
        assert_eq!(report.evaluation.confusion.total(), 2);
        assert_eq!(
            report.vocabulary_size,
            outcome.artifact.vectorizer().vocabulary_len()
        );
    }

    #[test]
    fn test_fit_rejects_empty_dataset() {
        let empty: InMemDataset<Message> = InMemDataset::new(Vec::new());

        assert!(fit(&empty, &TrainingConfig::new()).is_err());
    }

    #[test]
    fn test_fit_rejects_single_class() {
        let dataset = InMemDataset::new(vec![
            Message("free prize", Label::Spam),
            Message("claim cash", Label::Spam),
            Message("win bonus", Label::Spam),
        ]);

        let error = fit(&dataset, &TrainingConfig::new()).unwrap_err();

        assert!(matches!(
            error.downcast_ref::<SplitError>(),
            Some(SplitError::TooFewMembers {
                label: Label::Ham,
                ..
            })
        ));
    }

    #[test]
    fn test_train_persists_everything() {
        let dir = tempfile::tempdir().unwrap();
        let artifact_dir = dir.path().join("model");
        let config =
            TrainingConfig::new().with_artifact_dir(artifact_dir.to_string_lossy().into_owned());

        let report = train(&dataset(), &config).unwrap();

        let loaded: ModelArtifact = ModelArtifact::load(&artifact_dir).unwrap();
        assert_eq!(loaded.vectorizer().vocabulary_len(), report.vocabulary_size);

        let saved = TrainingConfig::load(artifact_dir.join(CONFIG_FILE)).unwrap();
        assert_eq!(saved.seed, 42);
        assert_eq!(saved.vectorizer.max_features, 3000);

        let metrics: TrainingReport = serde_json::from_str(
            &std::fs::read_to_string(artifact_dir.join(METRICS_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(metrics.dataset_size, report.dataset_size);
        assert_eq!(metrics.evaluation.confusion, report.evaluation.confusion);
    }
}
