//! Registration form subsystem
//!
//! A custom field carries a form: an ordered list of questions. Participants
//! submit answers; this module decides whether a submission is acceptable and
//! attaches the authoritative question metadata to what gets stored.
//!
//! # Design Principles
//!
//! - Answers join questions by normalized text only (trim + lower-case)
//! - Client-supplied metadata is never trusted
//! - All violations reported together, any violation rejects the submission
//! - Pure functions, no state between calls

mod errors;
mod types;
mod validator;

pub use errors::{FormDefinitionError, FormResult, ValidationError, ValidationErrors};
pub use types::{question_type, Answer, EnrichedAnswer, FormDefinition, QuestionKey, QuestionSpec};
pub use validator::{enrich_for_read, validate_and_enrich};
