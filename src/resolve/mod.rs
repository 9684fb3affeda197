//! Answer resolution.
//!
//! Field labels come from the page and answer keys come from the caller, so
//! they rarely agree verbatim ("LICENSE PLATE#/#" vs "License Plate or CF #").
//! Each correlated label is compared against every key in answer-set order
//! and the first key whose [`similarity_ratio`] reaches the threshold
//! supplies the value. No key above the threshold means the field is left
//! blank: an empty value, never an error.

mod answer_set;
mod similarity;

pub use answer_set::AnswerSet;
pub use similarity::similarity_ratio;

use crate::config::DEFAULT_SIMILARITY_THRESHOLD;
use crate::correlate::Correlation;
use crate::discovery::FieldLabel;
use crate::geometry::Quad;

/// A correlation plus its resolved (possibly empty) answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The matched field label
    pub field: FieldLabel,
    /// Box of the anchoring token
    pub anchor: Quad,
    /// Resolved answer, empty when no key was similar enough
    pub value: String,
}

impl Resolution {
    /// Whether an answer was found.
    pub fn is_resolved(&self) -> bool {
        !self.value.is_empty()
    }
}

/// First-match-wins fuzzy resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolver {
    threshold: f64,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    /// Create a resolver with the default 0.7 threshold.
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_SIMILARITY_THRESHOLD)
    }

    /// Create a resolver with a custom threshold (inclusive).
    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    /// The acceptance threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Find the first answer whose key is similar enough to `label`.
    ///
    /// Returns the matching `(key, value)`.
    pub fn find_answer<'a>(&self, label: &str, answers: &'a AnswerSet) -> Option<(&'a str, &'a str)> {
        answers
            .iter()
            .find(|(key, _)| similarity_ratio(label, key) >= self.threshold)
    }

    /// Resolve one correlation.
    pub fn resolve(&self, correlation: &Correlation, answers: &AnswerSet) -> Resolution {
        let value = match self.find_answer(correlation.field.as_str(), answers) {
            Some((key, value)) => {
                log::debug!("Field '{}' resolved via key '{}'", correlation.field, key);
                value.to_string()
            },
            None => {
                log::debug!("Field '{}' left blank: no key above threshold", correlation.field);
                String::new()
            },
        };
        Resolution {
            field: correlation.field.clone(),
            anchor: correlation.anchor,
            value,
        }
    }

    /// Resolve every correlation on a page, preserving count and order.
    pub fn resolve_all(&self, correlations: &[Correlation], answers: &AnswerSet) -> Vec<Resolution> {
        correlations
            .iter()
            .map(|c| self.resolve(c, answers))
            .collect()
    }
}

/// Resolve with the default threshold.
pub fn resolve(correlation: &Correlation, answers: &AnswerSet) -> Resolution {
    Resolver::new().resolve(correlation, answers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn correlation(field: &str) -> Correlation {
        Correlation {
            field: FieldLabel::from(field),
            anchor: Quad::from_rect(10.0, 20.0, 30.0, 10.0),
        }
    }

    #[test]
    fn test_exact_key() {
        let answers: AnswerSet = [("Make", "Toyota")].into_iter().collect();
        let r = resolve(&correlation("Make"), &answers);
        assert_eq!(r.value, "Toyota");
        assert!(r.is_resolved());
        assert_eq!(r.anchor, Quad::from_rect(10.0, 20.0, 30.0, 10.0));
    }

    #[test]
    fn test_fuzzy_key() {
        let answers: AnswerSet = [("Buyer Name", "Jane Smith")].into_iter().collect();
        assert_eq!(resolve(&correlation("Buyer's Name"), &answers).value, "Jane Smith");
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let answers: AnswerSet = [("ABCDEFGXYZ", "hit")].into_iter().collect();
        assert_eq!(similarity_ratio("ABCDEFGHIJ", "ABCDEFGXYZ"), 0.7);
        assert_eq!(resolve(&correlation("ABCDEFGHIJ"), &answers).value, "hit");
    }

    #[test]
    fn test_below_threshold_is_blank() {
        // 2 * 9 / 26 ~= 0.692
        assert!(similarity_ratio("ABCDEFGHIJKLM", "ABCDEFGHIXYZW") < 0.7);
        let answers: AnswerSet =
            [("DATE OF SALE", "09/14/2024"), ("ABCDEFGHIXYZW", "miss")].into_iter().collect();
        assert_eq!(resolve(&correlation("DATE"), &answers).value, "");
        let r = resolve(&correlation("ABCDEFGHIJKLM"), &answers);
        assert_eq!(r.value, "");
        assert!(!r.is_resolved());
    }

    #[test]
    fn test_first_key_above_threshold_wins() {
        // Both keys clear the threshold; the earlier one is used even though
        // the later one is an exact match.
        let answers: AnswerSet = [("Seller Name", "first"), ("Seller's Name", "exact")]
            .into_iter()
            .collect();
        assert_eq!(resolve(&correlation("Seller's Name"), &answers).value, "first");
    }

    #[test]
    fn test_empty_answer_set() {
        assert_eq!(resolve(&correlation("Make"), &AnswerSet::new()).value, "");
    }

    #[test]
    fn test_resolve_all_preserves_count_and_order() {
        let answers: AnswerSet = [("Make", "Toyota")].into_iter().collect();
        let correlations = vec![correlation("Zip"), correlation("Make"), correlation("Zip")];
        let resolutions = Resolver::new().resolve_all(&correlations, &answers);
        assert_eq!(resolutions.len(), 3);
        let values: Vec<&str> = resolutions.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["", "Toyota", ""]);
        let fields: Vec<&str> = resolutions.iter().map(|r| r.field.as_str()).collect();
        assert_eq!(fields, vec!["Zip", "Make", "Zip"]);
    }

    #[test]
    fn test_custom_threshold() {
        let answers: AnswerSet = [("DATE OF SALE", "09/14/2024")].into_iter().collect();
        let resolver = Resolver::with_threshold(0.5);
        assert_eq!(resolver.resolve(&correlation("DATE"), &answers).value, "09/14/2024");
    }
}
