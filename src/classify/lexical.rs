// src/classify/lexical.rs
// Keyword-based scorer used whenever the zero-shot model is unavailable.
// Pure and dependency-free: this path must keep working when everything
// external is down.

use super::{ClassificationResult, Label, Scores};

// Signals that the email asks for something and needs a response.
const PRODUCTIVE_KEYWORDS: &[&str] = &[
    "status",
    "update",
    "support",
    "error",
    "problem",
    "issue",
    "access",
    "order",
    "request",
    "requirement",
    "case",
    "ticket",
    "contract",
    "invoice",
    "payment",
    "refund",
    "attachment",
    "attached",
    "document",
    "deadline",
    "urgent",
    "blocked",
    "question",
    "login",
];

// Courtesy and closing signals: no action required.
const UNPRODUCTIVE_KEYWORDS: &[&str] = &[
    "thank you",
    "thanks",
    "grateful",
    "congratulations",
    "happy holidays",
    "merry christmas",
    "happy new year",
    "best wishes",
    "good morning",
    "good afternoon",
    "good evening",
    "kind regards",
    "best regards",
    "warm regards",
    "appreciate",
    "welcome",
];

/// Score `text` by keyword containment. Matching is plain substring
/// containment on the lowercased text, so a keyword embedded in a longer
/// word still counts.
pub fn score(text: &str) -> ClassificationResult {
    let lowered = text.to_lowercase();

    let prod_hits = PRODUCTIVE_KEYWORDS
        .iter()
        .filter(|kw| lowered.contains(*kw))
        .count();
    let unprod_hits = UNPRODUCTIVE_KEYWORDS
        .iter()
        .filter(|kw| lowered.contains(*kw))
        .count();

    // Tie (including zero hits on both sides) goes to Productive: an email
    // we cannot read is safer to route to a human than to drop.
    let label = if unprod_hits > prod_hits {
        Label::Unproductive
    } else {
        Label::Productive
    };

    // Relative hit ratios, not calibrated probabilities. The clamp keeps the
    // zero-hit case at {0.0, 0.0} instead of dividing by zero.
    let total = (prod_hits + unprod_hits).max(1) as f64;
    let scores = Scores::new(prod_hits as f64 / total, unprod_hits as f64 / total);

    ClassificationResult { label, scores }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn productive_signals_win() {
        let result = score("urgent support problem");
        assert_eq!(result.label, Label::Productive);
        assert_eq!(result.scores, Scores::new(1.0, 0.0));
    }

    #[test]
    fn courtesy_signals_win() {
        let result = score("thank you, happy holidays");
        assert_eq!(result.label, Label::Unproductive);
        assert_eq!(result.scores, Scores::new(0.0, 1.0));
    }

    #[test]
    fn zero_hits_ties_to_productive_with_zero_scores() {
        let result = score("lorem ipsum dolor sit amet");
        assert_eq!(result.label, Label::Productive);
        assert_eq!(result.scores, Scores::new(0.0, 0.0));
    }

    #[test]
    fn equal_hits_tie_to_productive() {
        // One hit each side: "invoice" vs "thanks".
        let result = score("thanks for the invoice");
        assert_eq!(result.label, Label::Productive);
        assert_eq!(result.scores, Scores::new(0.5, 0.5));
    }

    #[test]
    fn embedded_keyword_counts() {
        // "error" inside "errors", no word-boundary tokenization.
        let result = score("we keep seeing errors");
        assert_eq!(result.label, Label::Productive);
        assert_eq!(result.scores.productive, 1.0);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let upper = score("URGENT: PAYMENT PROBLEM");
        let lower = score("urgent: payment problem");
        assert_eq!(upper, lower);
        assert_eq!(upper.label, Label::Productive);
    }

    #[test]
    fn mixed_text_uses_relative_ratios() {
        // Two productive hits ("status", "request"), one courtesy hit ("thanks").
        let result = score("thanks, what is the status of my request?");
        assert_eq!(result.label, Label::Productive);
        assert_eq!(result.scores, Scores::new(2.0 / 3.0, 1.0 / 3.0));
    }

    #[test]
    fn scores_stay_in_unit_range() {
        for text in [
            "",
            "a",
            "urgent urgent urgent",
            "thank you thank you",
            "status update request deadline invoice payment",
        ] {
            let result = score(text);
            assert!((0.0..=1.0).contains(&result.scores.productive));
            assert!((0.0..=1.0).contains(&result.scores.unproductive));
        }
    }
}
