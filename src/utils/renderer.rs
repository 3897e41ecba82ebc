use serde::Serialize;

use crate::pipelines::text_classification::{ClassificationResult, TrainingReport};

static REPORT: &str = "\
Dataset:     {{ dataset_size }} messages ({{ spam_count }} spam, {{ ham_count }} ham)
Split:       {{ train_size }} train / {{ test_size }} test (stratified)
Vocabulary:  {{ vocabulary_size }} terms

Accuracy:    {{ evaluation.accuracy | times: 100 | round: 2 }}%
Precision:   {{ evaluation.precision | times: 100 | round: 2 }}%
Recall:      {{ evaluation.recall | times: 100 | round: 2 }}%
F1 score:    {{ evaluation.f1 | times: 100 | round: 2 }}%

Confusion matrix (rows actual, columns predicted)
             ham      spam
  ham        {{ evaluation.confusion.true_negatives }} (TN)   {{ evaluation.confusion.false_positives }} (FP)
  spam       {{ evaluation.confusion.false_negatives }} (FN)   {{ evaluation.confusion.true_positives }} (TP)
";

static VERDICT: &str = "\
{{ verdict }}
  Message:        {{ message }}
  Prediction:     {{ prediction }}
  Confidence:     {% if confidence %}{{ confidence }}%{% else %}unavailable{% endif %}
  Recommendation: {{ recommendation }}
";

#[derive(Serialize)]
struct Verdict<'a> {
    verdict: &'a str,
    message: &'a str,
    prediction: &'a str,
    confidence: Option<f64>,
    recommendation: &'a str,
}

/// Plain-text renderer for training reports and classification verdicts
pub struct Renderer {
    report: liquid::Template,
    verdict: liquid::Template,
}

impl Renderer {
    /// Compile the templates
    pub fn new() -> Result<Self, liquid::Error> {
        let parser = liquid::ParserBuilder::with_stdlib().build()?;

        Ok(Self {
            report: parser.parse(REPORT)?,
            verdict: parser.parse(VERDICT)?,
        })
    }

    /// Render a training report
    pub fn report(&self, report: &TrainingReport) -> Result<String, liquid::Error> {
        self.report.render(&liquid::to_object(report)?)
    }

    /// Render the verdict for one classified message
    pub fn verdict(
        &self,
        message: &str,
        result: &ClassificationResult,
    ) -> Result<String, liquid::Error> {
        let verdict = Verdict {
            verdict: result.verdict(),
            message,
            prediction: result.label.as_str(),
            confidence: result.confidence_percent(),
            recommendation: result.recommendation,
        };

        self.verdict.render(&liquid::to_object(&verdict)?)
    }
}
