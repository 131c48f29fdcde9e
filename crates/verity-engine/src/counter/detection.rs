//! Contradiction detectors for a (claim, canonical answer) pair.
//!
//! Each detector looks at one signal. [`detect_all`] runs them in order of
//! specificity and reports the first that fires.

use verity_domain::ContradictionKind;
use verity_store::text::{is_negated, numbers};

/// Agreement below this means the claim does not carry the canonical answer.
pub const DIVERGENCE_THRESHOLD: f64 = 0.5;

/// Exactly one side contains a negation cue.
///
/// "Paris is not the capital of France" against "Paris" fires;
/// two negated statements agree in polarity and do not.
pub fn negated_polarity(claim: &str, answer: &str) -> Option<ContradictionKind> {
    (is_negated(claim) != is_negated(answer)).then_some(ContradictionKind::NegatedPolarity)
}

/// Both sides carry numbers and they share none.
pub fn numeric_mismatch(claim: &str, answer: &str) -> Option<ContradictionKind> {
    let claim_numbers = numbers(claim);
    let answer_numbers = numbers(answer);

    if claim_numbers.is_empty() || answer_numbers.is_empty() {
        return None;
    }
    claim_numbers
        .is_disjoint(&answer_numbers)
        .then_some(ContradictionKind::NumericMismatch)
}

/// The claim carries less than half of the canonical answer's keywords.
pub fn answer_divergence(agreement: f64) -> Option<ContradictionKind> {
    (agreement < DIVERGENCE_THRESHOLD).then_some(ContradictionKind::AnswerDivergence)
}

/// Run all detectors, most specific first.
pub fn detect_all(claim: &str, answer: &str, agreement: f64) -> Option<ContradictionKind> {
    negated_polarity(claim, answer)
        .or_else(|| numeric_mismatch(claim, answer))
        .or_else(|| answer_divergence(agreement))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negated_polarity() {
        assert_eq!(
            negated_polarity("Paris is not the capital of France", "Paris"),
            Some(ContradictionKind::NegatedPolarity)
        );
        assert_eq!(negated_polarity("Paris is the capital of France", "Paris"), None);
        assert_eq!(negated_polarity("Pluto is not a planet", "Pluto is no longer a planet"), None);
    }

    #[test]
    fn test_numeric_mismatch() {
        assert_eq!(
            numeric_mismatch("SpaceX was founded in 2004", "Elon Musk founded SpaceX in 2002."),
            Some(ContradictionKind::NumericMismatch)
        );
        assert_eq!(numeric_mismatch("Founded in 2002", "Elon Musk founded SpaceX in 2002."), None);
        assert_eq!(numeric_mismatch("Elon Musk founded SpaceX", "Elon Musk founded SpaceX in 2002."), None);
    }

    #[test]
    fn test_answer_divergence() {
        assert_eq!(answer_divergence(0.0), Some(ContradictionKind::AnswerDivergence));
        assert_eq!(answer_divergence(0.5), None);
    }

    #[test]
    fn test_detect_all_order() {
        // Negation wins over the numeric and divergence signals.
        assert_eq!(
            detect_all("It was not founded in 2004", "Founded in 2002", 0.0),
            Some(ContradictionKind::NegatedPolarity)
        );
        assert_eq!(
            detect_all("Founded in 2004", "Founded in 2002", 0.2),
            Some(ContradictionKind::NumericMismatch)
        );
        assert_eq!(
            detect_all("The capital of France is Berlin", "Paris", 0.0),
            Some(ContradictionKind::AnswerDivergence)
        );
        assert_eq!(detect_all("Paris is the capital", "Paris", 1.0), None);
    }
}
