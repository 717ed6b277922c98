//! Schema-to-validator compiler
//!
//! One compiled check set per field, derived once per schema. Values are
//! trimmed before evaluation; pattern and format checks only apply to
//! non-empty values, so an optional empty field never blocks submission.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::schema::{companion_key, AnswerSet, DynamicFormSchema, FieldKind};

static DATE_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").expect("date format regex"));

const MSG_REQUIRED: &str = "Required";
const MSG_INVALID_FORMAT: &str = "Invalid format";
const MSG_DATE_FORMAT: &str = "Use dd.mm.yyyy";
const MSG_INVALID_CHOICE: &str = "Invalid choice";

/// Fatal schema defects found at compile time
///
/// These indicate an upstream schema-generation bug, not bad user input,
/// and must surface immediately instead of producing a half-working
/// validator.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("duplicate field id '{0}'")]
    DuplicateFieldId(String),
    #[error("duplicate option label '{label}' in field '{field}'")]
    DuplicateOptionLabel { field: String, label: String },
    #[error("invalid pattern for field '{field}': {message}")]
    InvalidPattern { field: String, message: String },
}

/// Per-field (or companion-key) error messages, keyed for display
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    fn record(&mut self, key: impl Into<String>, message: &str) {
        self.errors.entry(key.into()).or_insert_with(|| message.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

struct CompiledChoice {
    labels: Vec<String>,
    /// Labels whose selection expects a companion date
    date_labels: Vec<String>,
}

struct CompiledField {
    field_id: String,
    required: bool,
    pattern: Option<Regex>,
    /// True for `date` fields declaring the dd.mm.yyyy format
    date_format: bool,
    choice: Option<CompiledChoice>,
}

/// A validator compiled from one schema
pub struct FormValidator {
    fields: Vec<CompiledField>,
}

impl FormValidator {
    /// Compile the schema into per-field validators
    pub fn compile(schema: &DynamicFormSchema) -> Result<Self, SchemaError> {
        let mut seen_ids = HashSet::new();
        let mut fields = Vec::with_capacity(schema.fields.len());

        for field in &schema.fields {
            if !seen_ids.insert(field.field_id.as_str()) {
                return Err(SchemaError::DuplicateFieldId(field.field_id.clone()));
            }

            let validation = field.validation.as_ref();
            let pattern = validation
                .and_then(|v| v.pattern.as_deref())
                .map(|pat| {
                    // Full-match semantics: anchor the declared pattern.
                    Regex::new(&format!("^(?:{pat})$")).map_err(|e| SchemaError::InvalidPattern {
                        field: field.field_id.clone(),
                        message: e.to_string(),
                    })
                })
                .transpose()?;

            let date_format = field.kind == FieldKind::Date
                && validation.and_then(|v| v.format.as_deref()) == Some("dd.mm.yyyy");

            let choice = match &field.kind {
                FieldKind::SingleChoice { options } => {
                    let mut labels = Vec::with_capacity(options.len());
                    let mut date_labels = Vec::new();
                    for option in options {
                        if labels.contains(&option.label) {
                            return Err(SchemaError::DuplicateOptionLabel {
                                field: field.field_id.clone(),
                                label: option.label.clone(),
                            });
                        }
                        if option.requires_date() {
                            date_labels.push(option.label.clone());
                        }
                        labels.push(option.label.clone());
                    }
                    Some(CompiledChoice { labels, date_labels })
                }
                FieldKind::Text | FieldKind::Date => None,
            };

            fields.push(CompiledField {
                field_id: field.field_id.clone(),
                required: field.is_required(),
                pattern,
                date_format,
                choice,
            });
        }

        Ok(Self { fields })
    }

    /// Check an answer set against the compiled rules
    pub fn validate(&self, answers: &AnswerSet) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        for field in &self.fields {
            let value = answers.value_of(&field.field_id).unwrap_or("").trim();

            match &field.choice {
                Some(choice) => {
                    if value.is_empty() {
                        if field.required {
                            errors.record(&field.field_id, MSG_REQUIRED);
                        }
                    } else if !choice.labels.iter().any(|l| l == value) {
                        errors.record(&field.field_id, MSG_INVALID_CHOICE);
                    } else if choice.date_labels.iter().any(|l| l == value) {
                        // The companion date is format-checked but never
                        // hard-required, even when the parent field is.
                        let companion = answers.companion_of(&field.field_id).unwrap_or("").trim();
                        if !companion.is_empty() && !DATE_FORMAT.is_match(companion) {
                            errors.record(companion_key(&field.field_id), MSG_DATE_FORMAT);
                        }
                    }
                }
                None => {
                    if value.is_empty() {
                        if field.required {
                            errors.record(&field.field_id, MSG_REQUIRED);
                        }
                        continue;
                    }
                    if let Some(pattern) = &field.pattern {
                        if !pattern.is_match(value) {
                            errors.record(&field.field_id, MSG_INVALID_FORMAT);
                            continue;
                        }
                    }
                    if field.date_format && !DATE_FORMAT.is_match(value) {
                        errors.record(&field.field_id, MSG_DATE_FORMAT);
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
