//! Confidence scoring for matched technologies.
//!
//! ```text
//! score = clamp(BASE + max(match_bonus, frequency_bonus) + registry_bonus, 0, 1)
//! ```
//!
//! `match_bonus` is [`EXACT_BONUS`] when the matched text and the canonical
//! name share a name key, [`PARTIAL_BONUS`] when one contains the other.
//! `frequency_bonus` applies to repeated mentions. The two compete rather
//! than stack, so repetition lifts a variation match without letting it
//! outrank an exact one. The score is a heuristic, not a probability.

use crate::stack::normalize_name;

pub const BASE_SCORE: f64 = 0.7;
pub const EXACT_BONUS: f64 = 0.3;
pub const PARTIAL_BONUS: f64 = 0.1;
pub const FREQUENCY_BONUS: f64 = 0.2;
pub const REGISTRY_BONUS: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Partial,
    Variation,
}

impl MatchKind {
    pub fn classify(matched_text: &str, canonical_name: &str) -> Self {
        let matched = normalize_name(matched_text);
        let canonical = normalize_name(canonical_name);

        if matched.is_empty() || canonical.is_empty() {
            MatchKind::Variation
        } else if matched == canonical {
            MatchKind::Exact
        } else if matched.contains(&canonical) || canonical.contains(&matched) {
            MatchKind::Partial
        } else {
            MatchKind::Variation
        }
    }

    fn bonus(&self) -> f64 {
        match self {
            MatchKind::Exact => EXACT_BONUS,
            MatchKind::Partial => PARTIAL_BONUS,
            MatchKind::Variation => 0.0,
        }
    }
}

/// Scores one match. `registered` is false only for candidates that did not
/// come from a registry lookup.
pub fn score(matched_text: &str, canonical_name: &str, occurrences: usize, registered: bool) -> f64 {
    let match_bonus = MatchKind::classify(matched_text, canonical_name).bonus();
    let frequency_bonus = if occurrences > 1 { FREQUENCY_BONUS } else { 0.0 };
    let registry_bonus = if registered { REGISTRY_BONUS } else { 0.0 };

    (BASE_SCORE + match_bonus.max(frequency_bonus) + registry_bonus).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(MatchKind::classify("nodejs", "node.js"), MatchKind::Exact);
        assert_eq!(MatchKind::classify("semantic-ui", "semantic ui"), MatchKind::Exact);
        assert_eq!(MatchKind::classify("postgres", "postgresql"), MatchKind::Partial);
        assert_eq!(MatchKind::classify("k8s", "kubernetes"), MatchKind::Variation);
        assert_eq!(MatchKind::classify("", "react"), MatchKind::Variation);
    }

    #[test]
    fn test_score_is_clamped() {
        assert_eq!(score("python", "python", 5, true), 1.0);
        assert!(score("k8s", "kubernetes", 1, false) >= 0.0);
    }

    #[test]
    fn test_score_ordering() {
        let exact = score("react", "react", 1, false);
        let partial = score("postgres", "postgresql", 1, false);
        let variation = score("k8s", "kubernetes", 1, false);

        assert!(exact >= partial);
        assert!(partial >= variation);
        assert!((variation - BASE_SCORE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_frequency_lifts_variation_matches() {
        let once = score("k8s", "kubernetes", 1, true);
        let repeated = score("k8s", "kubernetes", 3, true);
        assert!(repeated > once);
        assert!(repeated <= score("kubernetes", "kubernetes", 1, true));
    }
}
