//! Duration parsing - turns a recognizer utterance into milliseconds
//!
//! The recognizer hands us free-form text ("set a timer for 5 minutes");
//! we scan it for unit words and read the token before each one as the
//! quantity. Anything that doesn't fit contributes nothing, and a result
//! of 0 means "no timer requested".

use serde::Deserialize;

/// Time units a spoken phrase can quantify
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Hour,
    Minute,
    Second,
}

impl UnitKind {
    /// Milliseconds in one unit
    pub fn millis(self) -> u64 {
        match self {
            UnitKind::Hour => 60 * 60 * 1000,
            UnitKind::Minute => 60 * 1000,
            UnitKind::Second => 1000,
        }
    }
}

/// Localized unit vocabulary, injected by the caller - the parser never
/// hard-codes English.
///
/// Unit words are matched by prefix so singular and plural fold together
/// ("minute"/"minutes"). Article words are read as a quantity of one
/// ("a second"). Prefixes are case-sensitive and must be non-empty.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitTable {
    #[serde(default = "default_hour_prefix")]
    pub hour_prefix: String,
    #[serde(default = "default_minute_prefix")]
    pub minute_prefix: String,
    #[serde(default = "default_second_prefix")]
    pub second_prefix: String,
    #[serde(default = "default_article_words")]
    pub article_words: Vec<String>,
}

impl Default for UnitTable {
    fn default() -> Self {
        Self {
            hour_prefix: default_hour_prefix(),
            minute_prefix: default_minute_prefix(),
            second_prefix: default_second_prefix(),
            article_words: default_article_words(),
        }
    }
}

fn default_hour_prefix() -> String {
    "hour".into()
}
fn default_minute_prefix() -> String {
    "minute".into()
}
fn default_second_prefix() -> String {
    "second".into()
}
fn default_article_words() -> Vec<String> {
    vec!["a".into()]
}

impl UnitTable {
    /// Classify a token by unit prefix. Hour is tested first, then minute,
    /// then second; the first match wins.
    fn unit_of(&self, token: &str) -> Option<UnitKind> {
        if token.starts_with(&self.hour_prefix) {
            Some(UnitKind::Hour)
        } else if token.starts_with(&self.minute_prefix) {
            Some(UnitKind::Minute)
        } else if token.starts_with(&self.second_prefix) {
            Some(UnitKind::Second)
        } else {
            None
        }
    }

    fn is_article(&self, token: &str) -> bool {
        self.article_words.iter().any(|w| w == token)
    }
}

/// What the token before a unit word turned out to be
#[derive(Debug, PartialEq, Eq)]
enum Quantifier {
    Count(u64),
    Article,
    Other,
}

fn classify_quantifier(token: &str, table: &UnitTable) -> Quantifier {
    // u64 rejects negatives outright, so "-5 minutes" falls through here
    if let Ok(n) = token.parse::<u64>() {
        Quantifier::Count(n)
    } else if table.is_article(token) {
        Quantifier::Article
    } else {
        // Spelled-out numerals ("five") land here and contribute nothing
        Quantifier::Other
    }
}

/// Extract a millisecond duration from a spoken utterance.
///
/// Tokens are split on single spaces and scanned left to right; every unit
/// word past index 0 looks one token back for its quantity. Occurrences
/// accumulate independently, so "1 hour 30 minutes" and
/// "30 minutes 1 hour" agree. Returns 0 when no timer was detected.
pub fn parse_duration_ms(utterance: &str, table: &UnitTable) -> u64 {
    let words: Vec<&str> = utterance.split(' ').collect();
    let mut total_ms: u64 = 0;

    for i in 1..words.len() {
        let Some(unit) = table.unit_of(words[i]) else {
            continue;
        };
        match classify_quantifier(words[i - 1], table) {
            Quantifier::Count(n) => {
                total_ms = total_ms.saturating_add(n.saturating_mul(unit.millis()));
            }
            Quantifier::Article => {
                total_ms = total_ms.saturating_add(unit.millis());
            }
            Quantifier::Other => {}
        }
    }

    total_ms
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> UnitTable {
        UnitTable::default()
    }

    #[test]
    fn test_spoken_commands() {
        let t = table();
        assert_eq!(parse_duration_ms("set a timer for 5 minutes", &t), 300_000);
        assert_eq!(parse_duration_ms("timer 1 hour 30 minutes", &t), 5_400_000);
        assert_eq!(parse_duration_ms("a second", &t), 1_000);
        assert_eq!(parse_duration_ms("countdown 10 seconds", &t), 10_000);
        assert_eq!(
            parse_duration_ms("for 2 hours and 15 minutes please", &t),
            8_100_000
        );
    }

    #[test]
    fn test_no_timer_detected() {
        let t = table();
        assert_eq!(parse_duration_ms("", &t), 0);
        assert_eq!(parse_duration_ms("hello world", &t), 0);
        assert_eq!(parse_duration_ms("what time is it", &t), 0);
    }

    #[test]
    fn test_unit_at_start_is_unquantified() {
        let t = table();
        // No token before it, so nothing to read as a quantity
        assert_eq!(parse_duration_ms("hours", &t), 0);
        assert_eq!(parse_duration_ms("minutes later", &t), 0);
    }

    #[test]
    fn test_article_counts_as_one() {
        let t = table();
        assert_eq!(parse_duration_ms("set a minute", &t), 60_000);
        assert_eq!(parse_duration_ms("just a second please", &t), 1_000);
        assert_eq!(parse_duration_ms("wait an hour", &t), 0); // "an" not in the default table
    }

    #[test]
    fn test_integer_quantifier() {
        let t = table();
        assert_eq!(parse_duration_ms("set 3 hours", &t), 10_800_000);
        for n in [0u64, 1, 7, 45, 90] {
            assert_eq!(parse_duration_ms(&format!("x {} hours", n), &t), n * 3_600_000);
            assert_eq!(parse_duration_ms(&format!("x {} minutes", n), &t), n * 60_000);
            assert_eq!(parse_duration_ms(&format!("x {} seconds", n), &t), n * 1_000);
        }
    }

    #[test]
    fn test_spelled_out_numbers_unsupported() {
        let t = table();
        assert_eq!(parse_duration_ms("about seven minutes", &t), 0);
        assert_eq!(parse_duration_ms("thirty seconds", &t), 0);
    }

    #[test]
    fn test_negative_quantifier_rejected() {
        let t = table();
        assert_eq!(parse_duration_ms("set -5 minutes", &t), 0);
    }

    #[test]
    fn test_prefix_folds_derived_forms() {
        let t = table();
        assert_eq!(parse_duration_ms("in 2 hourlong break", &t), 7_200_000);
        assert_eq!(parse_duration_ms("set 5 mins", &t), 0); // "mins" is not a "minute" prefix match
    }

    #[test]
    fn test_unit_phrases_commute_and_accumulate() {
        let t = table();
        assert_eq!(
            parse_duration_ms("1 hour 30 minutes", &t),
            parse_duration_ms("30 minutes 1 hour", &t)
        );
        assert_eq!(parse_duration_ms("5 minutes 5 minutes", &t), 600_000);
        assert_eq!(
            parse_duration_ms("x 2 hours 15 minutes", &t),
            parse_duration_ms("x 2 hours", &t) + parse_duration_ms("x 15 minutes", &t)
        );
    }

    #[test]
    fn test_quantifier_not_shared_across_units() {
        let t = table();
        // The "minutes" occurrence looks back at "hours", which is neither
        // an integer nor an article
        assert_eq!(parse_duration_ms("2 hours minutes", &t), 7_200_000);
    }

    #[test]
    fn test_empty_tokens_from_repeated_spaces() {
        let t = table();
        // Double spaces split into empty tokens; they match no unit, and a
        // unit preceded by one reads it as an unusable quantifier
        assert_eq!(parse_duration_ms("set  5 minutes", &t), 300_000);
        assert_eq!(parse_duration_ms("set 5  minutes", &t), 0);
    }

    #[test]
    fn test_localized_table() {
        let t = UnitTable {
            hour_prefix: "hora".into(),
            minute_prefix: "minuto".into(),
            second_prefix: "segundo".into(),
            article_words: vec!["un".into(), "una".into()],
        };
        assert_eq!(parse_duration_ms("pon 5 minutos", &t), 300_000);
        assert_eq!(parse_duration_ms("espera una hora", &t), 3_600_000);
        assert_eq!(parse_duration_ms("set 5 minutes", &t), 0);
    }
}
