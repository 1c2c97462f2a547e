//! Form type definitions
//!
//! A form is an ordered list of questions. Answers refer to questions by
//! their text, never by an identifier; the join goes through [`QuestionKey`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::errors::FormDefinitionError;

/// Well-known question type tags.
///
/// The set is open: any other tag is stored and echoed unchanged.
pub mod question_type {
    /// Free text
    pub const TEXT: &str = "text";
    /// Single choice from a dropdown
    pub const DROPDOWN: &str = "dropdown";
    /// Multiple choice
    pub const MCQ: &str = "mcq";
    /// Image reference
    pub const IMAGE: &str = "image";
    /// Color picker
    pub const COLOR: &str = "color";

    /// Returns true if the tag names a question whose answer must come from its options
    pub fn is_choice(tag: &str) -> bool {
        let tag = tag.trim();
        tag.eq_ignore_ascii_case(DROPDOWN) || tag.eq_ignore_ascii_case(MCQ)
    }
}

fn default_question_type() -> String {
    question_type::TEXT.to_string()
}

/// Normalized question text.
///
/// This is a soft reference, not an identifier: renaming a question in a form
/// orphans every answer stored under the old text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuestionKey(String);

impl QuestionKey {
    /// Normalize raw question text (trim, lower-case)
    pub fn of(text: &str) -> Self {
        Self(text.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Blank text never matches a well-formed question
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for QuestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One question of a registration form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSpec {
    /// Human-readable label, also the join key for answers
    pub question_text: String,

    /// Opaque type tag, e.g. "text", "dropdown", "mcq", "image", "color"
    #[serde(default = "default_question_type")]
    pub question_type: String,

    /// Allowed values; empty means unconstrained
    #[serde(default)]
    pub options: Vec<String>,

    /// Image shown with image-based questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    #[serde(default)]
    pub is_required: bool,
}

impl QuestionSpec {
    /// Create an optional free-text question
    pub fn text(question_text: impl Into<String>) -> Self {
        Self {
            question_text: question_text.into(),
            question_type: question_type::TEXT.to_string(),
            options: Vec::new(),
            image_url: None,
            default_value: None,
            is_required: false,
        }
    }

    /// Create an optional single-choice question
    pub fn dropdown<I, S>(question_text: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            question_type: question_type::DROPDOWN.to_string(),
            options: options.into_iter().map(Into::into).collect(),
            ..Self::text(question_text)
        }
    }

    /// Mark the question as required
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn with_type(mut self, question_type: impl Into<String>) -> Self {
        self.question_type = question_type.into();
        self
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    pub fn key(&self) -> QuestionKey {
        QuestionKey::of(&self.question_text)
    }

    /// Returns true if answers must be one of `options`
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}

/// Ordered list of questions describing one registration form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormDefinition {
    questions: Vec<QuestionSpec>,
}

impl FormDefinition {
    pub fn new(questions: Vec<QuestionSpec>) -> Self {
        Self { questions }
    }

    pub fn questions(&self) -> &[QuestionSpec] {
        &self.questions
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Maps each normalized key to the index of the spec that answers resolve to.
    ///
    /// When two specs share a key the later one wins.
    pub(crate) fn key_index(&self) -> HashMap<QuestionKey, usize> {
        let mut index = HashMap::with_capacity(self.questions.len());
        for (i, question) in self.questions.iter().enumerate() {
            index.insert(question.key(), i);
        }
        index
    }

    /// Keys shared by more than one question, in first-seen order
    pub fn colliding_keys(&self) -> Vec<QuestionKey> {
        let mut seen: HashMap<QuestionKey, usize> = HashMap::new();
        let mut colliding = Vec::new();
        for question in &self.questions {
            let count = seen.entry(question.key()).or_insert(0);
            *count += 1;
            if *count == 2 {
                colliding.push(question.key());
            }
        }
        colliding
    }

    /// Validates the form itself (not a submission).
    ///
    /// Used when an administrator defines a custom field. The submission
    /// operations accept any form, including ones that fail this check.
    pub fn validate_structure(&self) -> Result<(), FormDefinitionError> {
        if self.questions.is_empty() {
            return Err(FormDefinitionError::NoQuestions);
        }

        for (position, question) in self.questions.iter().enumerate() {
            if question.question_text.trim().is_empty() {
                return Err(FormDefinitionError::BlankQuestionText { position });
            }

            if question_type::is_choice(&question.question_type) && !question.has_options() {
                return Err(FormDefinitionError::MissingOptions(
                    question.question_text.clone(),
                ));
            }

            if let Some(default) = &question.default_value {
                if question.has_options() && !question.options.contains(default) {
                    return Err(FormDefinitionError::DefaultNotAnOption {
                        question_text: question.question_text.clone(),
                        default_value: default.clone(),
                    });
                }
            }
        }

        if let Some(key) = self.colliding_keys().into_iter().next() {
            return Err(FormDefinitionError::DuplicateQuestion(key.to_string()));
        }

        Ok(())
    }
}

impl From<Vec<QuestionSpec>> for FormDefinition {
    fn from(questions: Vec<QuestionSpec>) -> Self {
        Self::new(questions)
    }
}

/// A submitted (or stored) value for one question.
///
/// Metadata fields are accepted on input but never trusted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(default)]
    pub question_text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_type: Option<String>,

    #[serde(default)]
    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_required: Option<bool>,
}

impl Answer {
    pub fn new(question_text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            question_text: question_text.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn key(&self) -> QuestionKey {
        QuestionKey::of(&self.question_text)
    }

    /// Empty or whitespace-only values count as no value
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// An answer carrying the authoritative metadata of its question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedAnswer {
    pub question_text: String,
    pub question_type: String,
    pub value: String,
    pub options: Vec<String>,
    pub is_required: bool,
}

impl EnrichedAnswer {
    /// Combine a question's metadata with an answer's value
    pub fn from_parts(question: &QuestionSpec, value: &str) -> Self {
        Self {
            question_text: question.question_text.clone(),
            question_type: question.question_type.clone(),
            value: value.to_string(),
            options: question.options.clone(),
            is_required: question.is_required,
        }
    }
}

impl From<EnrichedAnswer> for Answer {
    fn from(enriched: EnrichedAnswer) -> Self {
        Self {
            question_text: enriched.question_text,
            question_type: Some(enriched.question_type),
            value: enriched.value,
            options: Some(enriched.options),
            is_required: Some(enriched.is_required),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_normalization() {
        assert_eq!(QuestionKey::of("  Full Name "), QuestionKey::of("full name"));
        assert_eq!(QuestionKey::of("EMAIL").as_str(), "email");
        assert!(QuestionKey::of("   ").is_blank());
    }

    #[test]
    fn test_key_keeps_inner_whitespace() {
        assert_ne!(QuestionKey::of("Full  Name"), QuestionKey::of("Full Name"));
    }

    #[test]
    fn test_choice_types() {
        assert!(question_type::is_choice("dropdown"));
        assert!(question_type::is_choice(" MCQ "));
        assert!(!question_type::is_choice("text"));
        assert!(!question_type::is_choice("color"));
    }

    #[test]
    fn test_structure_valid() {
        let form = FormDefinition::new(vec![
            QuestionSpec::text("Name").required(),
            QuestionSpec::dropdown("Size", ["S", "M", "L"]).with_default("M"),
        ]);
        assert!(form.validate_structure().is_ok());
    }

    #[test]
    fn test_structure_rejects_empty_form() {
        let form = FormDefinition::default();
        assert_eq!(form.validate_structure(), Err(FormDefinitionError::NoQuestions));
    }

    #[test]
    fn test_structure_rejects_blank_text() {
        let form = FormDefinition::new(vec![QuestionSpec::text("Name"), QuestionSpec::text("  ")]);
        assert_eq!(
            form.validate_structure(),
            Err(FormDefinitionError::BlankQuestionText { position: 1 })
        );
    }

    #[test]
    fn test_structure_rejects_choice_without_options() {
        let form = FormDefinition::new(vec![QuestionSpec::text("Pick").with_type("mcq")]);
        assert!(matches!(
            form.validate_structure(),
            Err(FormDefinitionError::MissingOptions(_))
        ));
    }

    #[test]
    fn test_structure_rejects_default_outside_options() {
        let form = FormDefinition::new(vec![
            QuestionSpec::dropdown("Size", ["S", "M"]).with_default("XL"),
        ]);
        assert!(matches!(
            form.validate_structure(),
            Err(FormDefinitionError::DefaultNotAnOption { .. })
        ));
    }

    #[test]
    fn test_structure_rejects_colliding_keys() {
        let form = FormDefinition::new(vec![
            QuestionSpec::text("Email"),
            QuestionSpec::text(" email "),
        ]);
        assert_eq!(
            form.validate_structure(),
            Err(FormDefinitionError::DuplicateQuestion("email".to_string()))
        );
        assert_eq!(form.colliding_keys(), vec![QuestionKey::of("email")]);
    }

    #[test]
    fn test_key_index_later_wins() {
        let form = FormDefinition::new(vec![
            QuestionSpec::text("Email"),
            QuestionSpec::text("Name"),
            QuestionSpec::text("EMAIL").required(),
        ]);
        let index = form.key_index();
        assert_eq!(index.len(), 2);
        assert_eq!(index[&QuestionKey::of("email")], 2);
    }

    #[test]
    fn test_question_spec_defaults_from_json() {
        let spec: QuestionSpec = serde_json::from_str(r#"{"question_text":"Bio"}"#).unwrap();
        assert_eq!(spec.question_type, "text");
        assert!(spec.options.is_empty());
        assert!(!spec.is_required);
    }

    #[test]
    fn test_answer_without_value_is_blank() {
        let answer: Answer = serde_json::from_str(r#"{"question_text":"Bio"}"#).unwrap();
        assert!(answer.is_blank());
        assert!(Answer::new("Bio", " \t").is_blank());
    }

    #[test]
    fn test_form_serializes_as_list() {
        let form = FormDefinition::new(vec![QuestionSpec::text("Name")]);
        let json = serde_json::to_value(&form).unwrap();
        assert!(json.is_array());
    }
}
