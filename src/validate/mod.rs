//! Validation rule compiler
//!
//! Turns a [`DynamicFormSchema`](crate::schema::DynamicFormSchema) into a
//! reusable validator over answer sets. Compilation fails loudly on
//! defective schemas (bad regex, duplicate ids); validation itself only
//! ever reports per-field, user-correctable errors.

mod compiler;

pub use compiler::{FormValidator, SchemaError, ValidationErrors};
