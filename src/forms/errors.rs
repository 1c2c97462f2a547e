//! Form error types
//!
//! Error codes:
//! - FORM_UNKNOWN_QUESTION
//! - FORM_MISSING_REQUIRED_VALUE
//! - FORM_INVALID_OPTION
//! - FORM_MISSING_REQUIRED_QUESTION
//!
//! Validation never stops at the first violation. Every violation found in a
//! submission is collected into [`ValidationErrors`].

use std::fmt;

use thiserror::Error;

/// A single violation found while validating a submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Answer references no question of the current form
    #[error("Question not found: {0}")]
    UnknownQuestion(String),

    /// Required question answered with an empty or whitespace value
    #[error("Answer is required for: {0}")]
    MissingRequiredValue(String),

    /// Value is not one of the question's options
    #[error("Invalid value '{value}' for question: {question_text}. Valid options: {}", .options.join(", "))]
    InvalidOption {
        question_text: String,
        value: String,
        options: Vec<String>,
    },

    /// Required question has no answer at all
    #[error("Missing answer for required question: {0}")]
    MissingRequiredQuestion(String),
}

impl ValidationError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::UnknownQuestion(_) => "FORM_UNKNOWN_QUESTION",
            ValidationError::MissingRequiredValue(_) => "FORM_MISSING_REQUIRED_VALUE",
            ValidationError::InvalidOption { .. } => "FORM_INVALID_OPTION",
            ValidationError::MissingRequiredQuestion(_) => "FORM_MISSING_REQUIRED_QUESTION",
        }
    }

    /// Returns the question text the violation refers to
    pub fn question_text(&self) -> &str {
        match self {
            ValidationError::UnknownQuestion(text)
            | ValidationError::MissingRequiredValue(text)
            | ValidationError::MissingRequiredQuestion(text) => text,
            ValidationError::InvalidOption { question_text, .. } => question_text,
        }
    }
}

/// Every violation found in one submission, in discovery order.
///
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// Wraps a list of violations, or returns None if there are none
    pub fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }

    /// One human-readable message per violation
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("\n"))
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Structural problems with a form definition itself
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormDefinitionError {
    #[error("At least one question is required")]
    NoQuestions,

    #[error("Question at position {position} has no text")]
    BlankQuestionText { position: usize },

    #[error("Two questions normalize to the same text: '{0}'")]
    DuplicateQuestion(String),

    #[error("Choice question '{0}' has no options")]
    MissingOptions(String),

    #[error("Default value '{default_value}' of question '{question_text}' is not one of its options")]
    DefaultNotAnOption {
        question_text: String,
        default_value: String,
    },
}

/// Result type for submission validation
pub type FormResult<T> = Result<T, ValidationErrors>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ValidationError::UnknownQuestion("X".into()).code(),
            "FORM_UNKNOWN_QUESTION"
        );
        assert_eq!(
            ValidationError::MissingRequiredValue("X".into()).code(),
            "FORM_MISSING_REQUIRED_VALUE"
        );
        assert_eq!(
            ValidationError::MissingRequiredQuestion("X".into()).code(),
            "FORM_MISSING_REQUIRED_QUESTION"
        );
    }

    #[test]
    fn test_invalid_option_message_lists_options() {
        let err = ValidationError::InvalidOption {
            question_text: "Color".into(),
            value: "green".into(),
            options: vec!["red".into(), "blue".into()],
        };
        assert_eq!(
            err.to_string(),
            "Invalid value 'green' for question: Color. Valid options: red, blue"
        );
        assert_eq!(err.question_text(), "Color");
    }

    #[test]
    fn test_empty_list_is_not_an_error() {
        assert!(ValidationErrors::from_vec(Vec::new()).is_none());
    }

    #[test]
    fn test_display_joins_with_newlines() {
        let errors = ValidationErrors::from_vec(vec![
            ValidationError::UnknownQuestion("X".into()),
            ValidationError::MissingRequiredQuestion("Email".into()),
        ])
        .unwrap();

        assert_eq!(
            errors.to_string(),
            "Question not found: X\nMissing answer for required question: Email"
        );
        assert_eq!(errors.len(), 2);
    }
}
