//! Fuzzy matching of feed text against the watch-list names.
//!
//! Scores are token-set ratios: word order and repeated words are ignored,
//! so "Acme Corp raises funding" matches "Acme Corp" at full score.

use crate::model::CandidateMatch;
use std::collections::BTreeSet;
use strsim::normalized_levenshtein;

#[derive(Debug, Clone, Default)]
pub struct NameMatcher;

impl NameMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Best candidate for the text, first candidate wins ties.
    ///
    /// Empty text or an empty candidate list yields the null match.
    pub fn best_match(&self, text: &str, candidates: &[String]) -> CandidateMatch {
        let text_tokens = tokenize(text);
        if text_tokens.is_empty() || candidates.is_empty() {
            return CandidateMatch::none();
        }

        let mut best = CandidateMatch::none();
        for candidate in candidates {
            let score = token_set_ratio(&text_tokens, &tokenize(candidate));
            if score > best.score {
                best = CandidateMatch {
                    matched_name: Some(candidate.clone()),
                    score,
                };
            }
        }
        best
    }
}

/// Lowercased word tokens, split on any non-alphanumeric character
fn tokenize(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Token-set similarity in [0, 1].
///
/// When every candidate token appears in the text the score is exactly 1.0.
/// Otherwise the score is the best normalized edit distance among the
/// intersection string and the two diff-extended strings.
fn token_set_ratio(text_tokens: &BTreeSet<String>, candidate_tokens: &BTreeSet<String>) -> f64 {
    if text_tokens.is_empty() || candidate_tokens.is_empty() {
        return 0.0;
    }

    let diff_candidate: Vec<&str> = candidate_tokens
        .difference(text_tokens)
        .map(String::as_str)
        .collect();
    if diff_candidate.is_empty() {
        return 1.0;
    }

    let intersection: Vec<&str> = candidate_tokens
        .intersection(text_tokens)
        .map(String::as_str)
        .collect();
    let diff_text: Vec<&str> = text_tokens
        .difference(candidate_tokens)
        .map(String::as_str)
        .collect();

    let base = intersection.join(" ");
    let with_text_diff = join_parts(&base, &diff_text);
    let with_candidate_diff = join_parts(&base, &diff_candidate);

    normalized_levenshtein(&base, &with_text_diff)
        .max(normalized_levenshtein(&base, &with_candidate_diff))
        .max(normalized_levenshtein(&with_text_diff, &with_candidate_diff))
        .clamp(0.0, 1.0)
}

fn join_parts(base: &str, diff: &[&str]) -> String {
    if base.is_empty() {
        diff.join(" ")
    } else if diff.is_empty() {
        base.to_string()
    } else {
        format!("{} {}", base, diff.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_containment_scores_full() {
        let matcher = NameMatcher::new();
        let candidates = vec!["Acme Corp".to_string()];
        let result = matcher.best_match("Acme Corp raises $10M Series B", &candidates);
        assert_eq!(result.matched_name.as_deref(), Some("Acme Corp"));
        assert_eq!(result.score, 1.0);
    }

    #[test]
    fn test_word_order_ignored() {
        let matcher = NameMatcher::new();
        let candidates = vec!["Corp Acme".to_string()];
        let result = matcher.best_match("Acme Corp announces expansion", &candidates);
        assert_eq!(result.score, 1.0);
    }

    #[test]
    fn test_empty_candidates_yield_null_match() {
        let matcher = NameMatcher::new();
        let result = matcher.best_match("Acme Corp raises funding", &[]);
        assert!(result.matched_name.is_none());
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_empty_text_yields_null_match() {
        let matcher = NameMatcher::new();
        let result = matcher.best_match("", &["Acme".to_string()]);
        assert!(result.matched_name.is_none());
        assert_eq!(result.score, 0.0);

        let result = matcher.best_match("   ---   ", &["Acme".to_string()]);
        assert!(result.matched_name.is_none());
    }

    #[test]
    fn test_typo_scores_above_unrelated_text() {
        let matcher = NameMatcher::new();
        let candidates = vec!["Acme Corp".to_string()];
        let typo = matcher.best_match("Acme Crop expands to Berlin", &candidates);
        let unrelated = matcher.best_match("Weather forecast for the weekend", &candidates);
        assert!(typo.score > unrelated.score);
        assert!(typo.score > 0.4, "got {}", typo.score);
        assert!(typo.score < 1.0);
    }

    #[test]
    fn test_unrelated_text_scores_low() {
        let matcher = NameMatcher::new();
        let candidates = vec!["Acme Corp".to_string()];
        let result = matcher.best_match("Weather forecast for the weekend", &candidates);
        assert!(result.score < 0.5, "got {}", result.score);
    }

    #[test]
    fn test_tie_keeps_first_candidate() {
        let matcher = NameMatcher::new();
        let candidates = vec!["Acme".to_string(), "acme".to_string()];
        let result = matcher.best_match("Acme ships a new release", &candidates);
        assert_eq!(result.matched_name.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_repeated_words_do_not_inflate() {
        let matcher = NameMatcher::new();
        let candidates = vec!["Acme Corp".to_string()];
        let once = matcher.best_match("Acme announcement", &candidates);
        let thrice = matcher.best_match("Acme Acme Acme announcement", &candidates);
        assert_eq!(once.score, thrice.score);
    }

    proptest! {
        #[test]
        fn prop_score_bounded(text in ".{0,80}", name in ".{0,40}") {
            let matcher = NameMatcher::new();
            let result = matcher.best_match(&text, &[name]);
            prop_assert!(result.score >= 0.0);
            prop_assert!(result.score <= 1.0);
        }

        #[test]
        fn prop_deterministic(text in ".{0,80}", name in ".{0,40}") {
            let matcher = NameMatcher::new();
            let candidates = vec![name];
            let a = matcher.best_match(&text, &candidates);
            let b = matcher.best_match(&text, &candidates);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_containment_is_exact(words in proptest::collection::vec("[a-z]{1,8}", 1..4)) {
            let matcher = NameMatcher::new();
            let name = words.join(" ");
            let text = format!("breaking news {} update", name);
            let result = matcher.best_match(&text, &[name]);
            prop_assert_eq!(result.score, 1.0);
        }
    }
}
