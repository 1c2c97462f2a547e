//! Submission validation and answer enrichment
//!
//! Validation semantics:
//! - Answers match questions by normalized text only
//! - Required questions need a non-blank value
//! - Option-constrained questions need a value from their options (exact match)
//! - Every required question must be answered
//! - All violations are reported together; any violation rejects the whole submission
//!
//! Enrichment replaces client-supplied metadata with the question's own.
//! Output follows form order. Both operations are pure.

use std::collections::{HashMap, HashSet};

use super::errors::{FormResult, ValidationError, ValidationErrors};
use super::types::{Answer, EnrichedAnswer, FormDefinition, QuestionKey};

/// Validates a submission against a form and, if it is clean, returns the
/// answers enriched with the form's metadata.
///
/// # Errors
///
/// Returns every violation found:
/// - answer for a question the form does not have (FORM_UNKNOWN_QUESTION)
/// - blank value for a required question (FORM_MISSING_REQUIRED_VALUE)
/// - value outside the question's options (FORM_INVALID_OPTION)
/// - required question without any answer (FORM_MISSING_REQUIRED_QUESTION)
pub fn validate_and_enrich(
    answers: &[Answer],
    form: &FormDefinition,
) -> FormResult<Vec<EnrichedAnswer>> {
    let questions = form.questions();
    let index = form.key_index();

    let mut errors = Vec::new();
    let mut answered: HashSet<QuestionKey> = HashSet::with_capacity(answers.len());
    let mut accepted: HashMap<QuestionKey, &str> = HashMap::with_capacity(answers.len());

    for answer in answers {
        let key = answer.key();
        if key.is_blank() {
            errors.push(ValidationError::UnknownQuestion(answer.question_text.clone()));
            continue;
        }
        answered.insert(key.clone());

        let question = match index.get(&key) {
            Some(&i) => &questions[i],
            None => {
                errors.push(ValidationError::UnknownQuestion(answer.question_text.clone()));
                continue;
            }
        };

        let mut valid = true;

        if question.is_required && answer.is_blank() {
            errors.push(ValidationError::MissingRequiredValue(
                question.question_text.clone(),
            ));
            valid = false;
        }

        if question.has_options()
            && !answer.is_blank()
            && !question.options.contains(&answer.value)
        {
            errors.push(ValidationError::InvalidOption {
                question_text: question.question_text.clone(),
                value: answer.value.clone(),
                options: question.options.clone(),
            });
            valid = false;
        }

        if valid {
            // A repeated answer for the same question never overrides the first
            accepted.entry(key).or_insert(answer.value.as_str());
        }
    }

    for question in questions {
        if question.is_required && !answered.contains(&question.key()) {
            errors.push(ValidationError::MissingRequiredQuestion(
                question.question_text.clone(),
            ));
        }
    }

    if let Some(errors) = ValidationErrors::from_vec(errors) {
        return Err(errors);
    }

    Ok(enrich(form, &index, &accepted))
}

/// Re-attaches the form's current metadata to previously stored answers.
///
/// No validation happens here. Stored answers whose question no longer exists
/// are dropped; questions without a stored answer contribute nothing.
pub fn enrich_for_read(stored_answers: &[Answer], form: &FormDefinition) -> Vec<EnrichedAnswer> {
    let index = form.key_index();

    let mut stored: HashMap<QuestionKey, &str> = HashMap::with_capacity(stored_answers.len());
    for answer in stored_answers {
        let key = answer.key();
        if !key.is_blank() {
            stored.entry(key).or_insert(answer.value.as_str());
        }
    }

    enrich(form, &index, &stored)
}

/// Walks the form in order and emits one enriched answer per resolved question.
///
/// A question whose key was taken over by a later question is skipped, so
/// each key yields at most one answer. Blank questions never resolve.
fn enrich(
    form: &FormDefinition,
    index: &HashMap<QuestionKey, usize>,
    values: &HashMap<QuestionKey, &str>,
) -> Vec<EnrichedAnswer> {
    form.questions()
        .iter()
        .enumerate()
        .filter_map(|(i, question)| {
            let key = question.key();
            if key.is_blank() || index.get(&key) != Some(&i) {
                return None;
            }
            values
                .get(&key)
                .map(|value| EnrichedAnswer::from_parts(question, value))
        })
        .collect()
}
