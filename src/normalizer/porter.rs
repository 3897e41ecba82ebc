//! Porter's suffix-stripping stemmer, following the revised reference implementation
//! (`-bli` → `-ble`, `-logi` → `-log`).
//!
//! Words are handled as `char` sequences so non-ASCII alphanumeric tokens pass through
//! without being split mid-codepoint. Any character that is not `a e i o u` (or a `y`
//! acting as a vowel) counts as a consonant.

/// Step 2 rewrites, applied when the remaining stem has a measure above zero
static STEP2: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("bli", "ble"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
    ("logi", "log"),
];

/// Step 3 rewrites, applied when the remaining stem has a measure above zero
static STEP3: &[(&str, &str)] = &[
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

/// Step 4 deletions, applied when the remaining stem has a measure above one
static STEP4: &[&str] = &[
    "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion", "ou",
    "ism", "ate", "iti", "ous", "ive", "ize",
];

/// The Porter stemmer. Stateless, so a single instance can be shared freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    /// Create a new stemmer
    pub fn new() -> Self {
        Self
    }

    /// Reduce a lowercase word to its stem. Words of one or two characters are returned
    /// untouched.
    pub fn stem(&self, word: &str) -> String {
        let mut w: Vec<char> = word.chars().collect();

        if w.len() <= 2 {
            return word.to_string();
        }

        step1a(&mut w);
        step1b(&mut w);
        step1c(&mut w);
        step2(&mut w);
        step3(&mut w);
        step4(&mut w);
        step5(&mut w);

        w.into_iter().collect()
    }
}

fn is_consonant(w: &[char], i: usize) -> bool {
    match w[i] {
        'a' | 'e' | 'i' | 'o' | 'u' => false,
        'y' => i == 0 || !is_consonant(w, i - 1),
        _ => true,
    }
}

/// The number of vowel-consonant sequences in `w`, the `m` in `[C](VC)^m[V]`
fn measure(w: &[char]) -> usize {
    let n = w.len();
    let mut i = 0;
    let mut m = 0;

    while i < n && is_consonant(w, i) {
        i += 1;
    }

    loop {
        while i < n && !is_consonant(w, i) {
            i += 1;
        }

        if i >= n {
            return m;
        }

        while i < n && is_consonant(w, i) {
            i += 1;
        }

        m += 1;
    }
}

fn has_vowel(w: &[char]) -> bool {
    (0..w.len()).any(|i| !is_consonant(w, i))
}

fn ends_with(w: &[char], suffix: &str) -> bool {
    let len = suffix.len();

    w.len() >= len && w[w.len() - len..].iter().copied().eq(suffix.chars())
}

fn ends_double_consonant(w: &[char]) -> bool {
    let n = w.len();

    n >= 2 && w[n - 1] == w[n - 2] && is_consonant(w, n - 1)
}

/// `*o`: the word ends consonant-vowel-consonant and the final consonant is not w, x or y
fn ends_cvc(w: &[char]) -> bool {
    let n = w.len();

    n >= 3
        && is_consonant(w, n - 1)
        && !is_consonant(w, n - 2)
        && is_consonant(w, n - 3)
        && !matches!(w[n - 1], 'w' | 'x' | 'y')
}

fn replace_tail(w: &mut Vec<char>, suffix_len: usize, replacement: &str) {
    w.truncate(w.len() - suffix_len);
    w.extend(replacement.chars());
}

/// Apply the longest matching rule whose stem measure exceeds `min_measure`. Only the
/// longest match is considered; a failed condition does not fall back to shorter rules.
fn apply_rules(w: &mut Vec<char>, rules: &[(&str, &str)], min_measure: usize) {
    let matched = rules
        .iter()
        .filter(|(suffix, _)| ends_with(w, suffix))
        .max_by_key(|(suffix, _)| suffix.len());

    if let Some((suffix, replacement)) = matched {
        let stem_len = w.len() - suffix.len();

        if measure(&w[..stem_len]) > min_measure {
            replace_tail(w, suffix.len(), replacement);
        }
    }
}

/// Plurals: sses → ss, ies → i, ss → ss, s → ""
fn step1a(w: &mut Vec<char>) {
    if ends_with(w, "sses") || ends_with(w, "ies") {
        w.truncate(w.len() - 2);
    } else if !ends_with(w, "ss") && ends_with(w, "s") {
        w.pop();
    }
}

/// Past participles and gerunds
fn step1b(w: &mut Vec<char>) {
    if ends_with(w, "eed") {
        if measure(&w[..w.len() - 3]) > 0 {
            w.pop();
        }

        return;
    }

    let cut = if ends_with(w, "ed") && has_vowel(&w[..w.len() - 2]) {
        2
    } else if ends_with(w, "ing") && has_vowel(&w[..w.len() - 3]) {
        3
    } else {
        return;
    };

    w.truncate(w.len() - cut);

    if ends_with(w, "at") || ends_with(w, "bl") || ends_with(w, "iz") {
        w.push('e');
    } else if ends_double_consonant(w) && !matches!(w.last(), Some('l' | 's' | 'z')) {
        w.pop();
    } else if measure(w) == 1 && ends_cvc(w) {
        w.push('e');
    }
}

/// Terminal y → i when the stem contains a vowel
fn step1c(w: &mut [char]) {
    let n = w.len();

    if ends_with(w, "y") && has_vowel(&w[..n - 1]) {
        w[n - 1] = 'i';
    }
}

fn step2(w: &mut Vec<char>) {
    apply_rules(w, STEP2, 0);
}

fn step3(w: &mut Vec<char>) {
    apply_rules(w, STEP3, 0);
}

fn step4(w: &mut Vec<char>) {
    let matched = STEP4
        .iter()
        .filter(|suffix| ends_with(w, suffix))
        .max_by_key(|suffix| suffix.len());

    let Some(suffix) = matched else {
        return;
    };

    let stem_len = w.len() - suffix.len();

    // -ion is only removed after s or t
    if *suffix == "ion" && !matches!(stem_len.checked_sub(1).map(|i| w[i]), Some('s' | 't')) {
        return;
    }

    if measure(&w[..stem_len]) > 1 {
        w.truncate(stem_len);
    }
}

/// Final e, and ll → l on long stems
fn step5(w: &mut Vec<char>) {
    if ends_with(w, "e") {
        let stem = &w[..w.len() - 1];
        let m = measure(stem);

        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            w.pop();
        }
    }

    if ends_with(w, "ll") && measure(w) > 1 {
        w.pop();
    }
}
