//! Dynamic form schema model
//!
//! The canonical in-memory representation of a form instance: field list,
//! per-field validation hints, answer values, and the fixed fallback schema
//! used when inference is unavailable.

mod answers;
mod fallback;
mod types;

pub use answers::{companion_key, AnswerSet, FieldAnswer, COMPANION_SUFFIX};
pub use fallback::fallback_schema;
pub use types::{ChoiceOption, DynamicFormSchema, Field, FieldKind, FieldValidation};
