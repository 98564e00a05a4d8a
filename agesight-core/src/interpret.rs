//! Turning a detector class label into display fields.
//!
//! Labels are two whitespace-separated words. Which word is the age bracket
//! depends on the first word: `adult` and `senior` (configurable through
//! [`LabelVocabulary`]) come first in age-first labels such as `"adult male"`,
//! all other labels are gender-first, e.g. `"female young"`. The rule is
//! applied literally, so `"young female"` yields gender `young`.

use agesight_utils::LabelVocabulary;
use thiserror::Error;

/// Errors raised while interpreting a class label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpretError {
    #[error("Unrecognized result '{label}': expected two words, found {found}")]
    TokenCount { label: String, found: usize },
}

/// The known shapes of a class label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelShape<'a> {
    /// `<age> <gender>`, selected by a vocabulary token in first position.
    AgeFirst { age: &'a str, gender: &'a str },
    /// `<gender> <age>`.
    GenderFirst { gender: &'a str, age: &'a str },
    /// Anything that is not exactly two words.
    Unrecognized { label: &'a str, token_count: usize },
}

impl<'a> LabelShape<'a> {
    /// Classify `label` against `vocabulary`.
    pub fn classify(label: &'a str, vocabulary: &LabelVocabulary) -> Self {
        let mut tokens = label.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(first), Some(second), None) if vocabulary.is_age_first(first) => {
                LabelShape::AgeFirst {
                    age: first,
                    gender: second,
                }
            }
            (Some(first), Some(second), None) => LabelShape::GenderFirst {
                gender: first,
                age: second,
            },
            _ => LabelShape::Unrecognized {
                label,
                token_count: label.split_whitespace().count(),
            },
        }
    }
}

/// Age bracket, gender, and confidence ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResult {
    pub age_bracket: String,
    pub gender: String,
    /// Confidence in percent, `score * 100`.
    pub confidence_percent: f32,
}

/// Interpret `label` with the default `adult`/`senior` vocabulary.
pub fn interpret(label: &str, confidence: f32) -> Result<NormalizedResult, InterpretError> {
    interpret_with(&LabelVocabulary::default(), label, confidence)
}

/// Interpret `label` using a custom age-first vocabulary.
pub fn interpret_with(
    vocabulary: &LabelVocabulary,
    label: &str,
    confidence: f32,
) -> Result<NormalizedResult, InterpretError> {
    let (age, gender) = match LabelShape::classify(label, vocabulary) {
        LabelShape::AgeFirst { age, gender } | LabelShape::GenderFirst { gender, age } => {
            (age, gender)
        }
        LabelShape::Unrecognized { label, token_count } => {
            return Err(InterpretError::TokenCount {
                label: label.to_string(),
                found: token_count,
            });
        }
    };

    Ok(NormalizedResult {
        age_bracket: age.to_string(),
        gender: gender.to_string(),
        confidence_percent: confidence * 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_first_tokens_lead_with_age() {
        for (label, age, gender) in [
            ("adult male", "adult", "male"),
            ("adult female", "adult", "female"),
            ("senior female", "senior", "female"),
            ("senior x", "senior", "x"),
        ] {
            let result = interpret(label, 0.5).expect("two-word label");
            assert_eq!(result.age_bracket, age, "{label}");
            assert_eq!(result.gender, gender, "{label}");
        }
    }

    #[test]
    fn other_labels_lead_with_gender() {
        let result = interpret("female child", 0.25).expect("two-word label");
        assert_eq!(result.gender, "female");
        assert_eq!(result.age_bracket, "child");
    }

    #[test]
    fn adult_male_scenario() {
        let result = interpret("adult male", 0.87).expect("two-word label");
        assert_eq!(result.age_bracket, "adult");
        assert_eq!(result.gender, "male");
        assert!((result.confidence_percent - 87.0).abs() < 1e-4);
    }

    #[test]
    fn literal_rule_applies_to_young_female() {
        let result = interpret("young female", 0.5).expect("two-word label");
        assert_eq!(result.gender, "young");
        assert_eq!(result.age_bracket, "female");
        assert_eq!(result.confidence_percent, 50.0);
    }

    #[test]
    fn confidence_bounds_scale_to_percent() {
        assert_eq!(interpret("adult male", 0.0).unwrap().confidence_percent, 0.0);
        assert_eq!(interpret("adult male", 1.0).unwrap().confidence_percent, 100.0);
    }

    #[test]
    fn interpretation_is_repeatable() {
        let first = interpret("senior male", 0.42);
        let second = interpret("senior male", 0.42);
        assert_eq!(first, second);
    }

    #[test]
    fn wrong_token_counts_are_errors() {
        assert_eq!(
            interpret("adult", 0.9),
            Err(InterpretError::TokenCount {
                label: "adult".into(),
                found: 1
            })
        );
        assert_eq!(
            interpret("adult male extra", 0.9),
            Err(InterpretError::TokenCount {
                label: "adult male extra".into(),
                found: 3
            })
        );
        assert!(matches!(
            interpret("   ", 0.9),
            Err(InterpretError::TokenCount { found: 0, .. })
        ));
    }

    #[test]
    fn extra_whitespace_is_ignored() {
        let result = interpret("  adult\tmale ", 0.1).expect("two words");
        assert_eq!(result.age_bracket, "adult");
        assert_eq!(result.gender, "male");
    }

    #[test]
    fn custom_vocabulary_changes_ordering() {
        let vocabulary = LabelVocabulary {
            age_first: vec!["young".into()],
        };
        let result = interpret_with(&vocabulary, "young female", 0.5).expect("two words");
        assert_eq!(result.age_bracket, "young");
        assert_eq!(result.gender, "female");

        let result = interpret_with(&vocabulary, "adult male", 0.5).expect("two words");
        assert_eq!(result.gender, "adult");
        assert_eq!(result.age_bracket, "male");
    }

    #[test]
    fn classify_reports_shape() {
        let vocabulary = LabelVocabulary::default();
        assert_eq!(
            LabelShape::classify("senior male", &vocabulary),
            LabelShape::AgeFirst {
                age: "senior",
                gender: "male"
            }
        );
        assert_eq!(
            LabelShape::classify("male teen", &vocabulary),
            LabelShape::GenderFirst {
                gender: "male",
                age: "teen"
            }
        );
        assert_eq!(
            LabelShape::classify("", &vocabulary),
            LabelShape::Unrecognized {
                label: "",
                token_count: 0
            }
        );
    }
}
