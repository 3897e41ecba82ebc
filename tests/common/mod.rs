#![allow(dead_code)]

use sms_spam_detector::{
    datasets::sms,
    models::Label,
    pipelines::text_classification::{fit, SpamDetector, TrainingConfig},
};

pub const SPAM_SCENARIO: &str = "Congratulations! You won a FREE iPhone. Click here: bit.ly/winner";

pub const HAM_SCENARIO: &str = "Hi, are you available for lunch tomorrow?";

pub const SPAM_WORDS: &[&str] = &[
    "congratulations",
    "free",
    "iPhone",
    "click",
    "winner",
    "prize",
    "claim",
    "cash",
    "urgent",
    "offer",
    "voucher",
    "reward",
    "bonus",
    "win",
];

pub const HAM_WORDS: &[&str] = &[
    "hi",
    "available",
    "lunch",
    "tomorrow",
    "meeting",
    "dinner",
    "home",
    "thanks",
    "later",
    "movie",
    "weekend",
    "mum",
    "office",
    "coffee",
];

fn message(words: &[&str], seed: usize) -> String {
    let picked: Vec<&str> = (0..4)
        .map(|k| words[(seed * 5 + k * 3) % words.len()])
        .collect();

    format!("{}! Are you {} {} and {}?", picked[0], picked[1], picked[2], picked[3])
}

/// A balanced corpus with disjoint spam and ham vocabularies
pub fn synthetic_items(per_class: usize) -> Vec<sms::Item> {
    (0..per_class)
        .flat_map(|i| {
            [
                sms::Item::new(Label::Spam, message(SPAM_WORDS, i).to_uppercase()),
                sms::Item::new(Label::Ham, message(HAM_WORDS, i)),
            ]
        })
        .collect()
}

pub fn synthetic_dataset(per_class: usize) -> sms::Dataset {
    sms::Dataset::from_items(synthetic_items(per_class))
}

/// A detector fitted in memory on the 100-row synthetic corpus
pub fn detector() -> SpamDetector {
    let outcome = fit(&synthetic_dataset(50), &TrainingConfig::new()).unwrap();

    SpamDetector::from_artifact(outcome.artifact)
}
