//! Launch-phrase detection - decides which recognizer lines are timer requests
//!
//! On the device the platform voice trigger launches the app; in feed mode
//! this gate stands in for it. The configured phrase must lead the
//! utterance, matched word by word with some tolerance for transcription
//! noise. The full utterance still goes to the parser afterwards, since the
//! duration words interleave with the trigger words.

pub struct Trigger {
    enabled: bool,
    words: Vec<String>,
}

impl Trigger {
    pub fn new(phrase: &str, enabled: bool) -> Self {
        Self {
            enabled,
            words: phrase
                .to_lowercase()
                .split_whitespace()
                .map(String::from)
                .collect(),
        }
    }

    /// Check if the utterance leads with the trigger phrase
    pub fn matches(&self, text: &str) -> bool {
        if !self.enabled || self.words.is_empty() {
            return true;
        }
        let spoken: Vec<&str> = text.split_whitespace().collect();
        if spoken.len() < self.words.len() {
            return false;
        }
        self.words.iter().zip(&spoken).all(|(expected, heard)| {
            let heard: String = heard
                .to_lowercase()
                .chars()
                .filter(|c| c.is_alphabetic())
                .collect();
            fuzzy_word_match(expected, &heard)
        })
    }
}

/// Per-word fuzzy match, allows ~30% errors for recognizer slips
fn fuzzy_word_match(expected: &str, actual: &str) -> bool {
    if expected == actual {
        return true;
    }
    let max_dist = (expected.len() / 3).max(1);
    levenshtein(expected, actual) <= max_dist
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
