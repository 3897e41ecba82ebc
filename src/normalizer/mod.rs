//! Text normalization shared by the training pipeline and every serving entry point.
//!
//! A raw message goes through: lowercase → Unicode word segmentation (UAX #29) → keep
//! fully alphanumeric tokens → drop stopwords and lone punctuation → Porter stem → join
//! with single spaces. Training and serving must both go through [normalize].

use unicode_segmentation::UnicodeSegmentation;

/// Porter stemming
pub mod porter;

/// Stopwords and punctuation
pub mod stopwords;

pub use porter::PorterStemmer;

/// Deterministic raw text → normalized text transformation
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    stemmer: PorterStemmer,
}

impl Normalizer {
    /// Create a new normalizer
    pub fn new() -> Self {
        Self {
            stemmer: PorterStemmer::new(),
        }
    }

    /// Produce the ordered stems that survive normalization
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();

        lowered
            .split_word_bounds()
            .filter(|token| is_alphanumeric(token))
            .filter(|token| !stopwords::is_stopword(token) && !stopwords::is_punctuation(token))
            .map(|token| self.stemmer.stem(token))
            .collect()
    }

    /// Normalize `text` into a space-joined sequence of stems. Blank, stopword-only or
    /// punctuation-only input yields an empty string.
    pub fn normalize(&self, text: &str) -> String {
        self.tokens(text).join(" ")
    }
}

/// Normalize `text` with a default [Normalizer]
pub fn normalize(text: &str) -> String {
    Normalizer::new().normalize(text)
}

fn is_alphanumeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_normalize_ham_message() {
        assert_eq!(
            normalize("Hi, are you available for lunch tomorrow?"),
            "hi avail lunch tomorrow"
        );
    }

    #[test]
    fn test_normalize_spam_message() {
        // "bit.ly" is a single word segment containing '.', so it is dropped
        assert_eq!(
            normalize("Congratulations! You won a FREE iPhone. Click here: bit.ly/winner"),
            "congratul free iphon click winner"
        );
    }

    #[test]
    fn test_normalize_numbers_and_punctuation() {
        assert_eq!(
            normalize("I'm RUNNING late!!! Call me at 555-1234"),
            "run late call 555 1234"
        );
    }

    #[test]
    fn test_normalize_empty_and_stopword_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t\n"), "");
        assert_eq!(normalize("the of and ... !!!"), "");
        assert_eq!(normalize("Are YOU there?"), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let normalizer = Normalizer::new();

        for text in [
            "Hi, are you available for lunch tomorrow?",
            "Congratulations! You won a FREE iPhone. Click here: bit.ly/winner",
            "I'm RUNNING late!!! Call me at 555-1234",
            "",
            "!!!",
        ] {
            let once = normalizer.normalize(text);

            assert_eq!(normalizer.normalize(&once), once, "normalizing {text:?}");
        }
    }

    #[test]
    fn test_normalize_is_not_a_fixpoint_for_every_stem() {
        // Porter strips the final e of "agre" on a second pass
        let once = normalize("agreed");

        assert_eq!(once, "agre");
        assert_eq!(normalize(&once), "agr");
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let text = "URGENT: Your account has been suspended. Verify now: malicious-site.com";

        assert_eq!(normalize(text), normalize(text));
        assert_eq!(Normalizer::new().normalize(text), normalize(text));
    }

    #[test]
    fn test_tokens_preserve_order() {
        let tokens = Normalizer::new().tokens("lunch then dinner then breakfast");

        assert_eq!(tokens, vec!["lunch", "dinner", "breakfast"]);
    }
}
