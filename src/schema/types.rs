//! Schema types
//!
//! Serializes to the wire shape produced by the schema inference service:
//! a flat object with a `fields` array whose entries are discriminated by
//! their `type` string (`text` | `date` | `single_choice`).

use serde::{Deserialize, Serialize};

/// A complete form schema for one administrative form instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicFormSchema {
    /// Opaque stable identifier for the form type
    pub form_id: String,
    /// Locale tag used for label/help text generation
    pub language: String,
    pub title: String,
    pub summary: String,
    /// Ordered field list; field ids must be unique within a schema
    pub fields: Vec<Field>,
}

/// A single form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Unique key used for value storage and for PDF-field mapping
    pub field_id: String,
    /// Human-readable prompt
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl Field {
    /// Whether this field must be answered before submission
    pub fn is_required(&self) -> bool {
        self.validation
            .as_ref()
            .and_then(|v| v.required)
            .unwrap_or(false)
    }
}

/// Field variant, discriminated by the `type` string on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Date,
    SingleChoice {
        /// Ordered option list; labels are the field's valid value set
        options: Vec<ChoiceOption>,
    },
}

/// Validation hints attached to a field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Regular expression the trimmed value must fully match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Named format hint, e.g. `iban`, `email`, `dd.mm.yyyy`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// One option of a `single_choice` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub label: String,
    /// When true, selecting this option expects a companion date value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_date: Option<bool>,
}

impl ChoiceOption {
    pub fn requires_date(&self) -> bool {
        self.requires_date.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_roundtrips_through_tagged_json() {
        let json = serde_json::json!({
            "field_id": "familienstand",
            "label": "Familienstand",
            "type": "single_choice",
            "options": [
                { "label": "Ledig" },
                { "label": "Verheiratet", "requires_date": true }
            ],
            "validation": { "required": true }
        });

        let field: Field = serde_json::from_value(json.clone()).unwrap();
        assert!(field.is_required());
        match &field.kind {
            FieldKind::SingleChoice { options } => {
                assert_eq!(options.len(), 2);
                assert!(!options[0].requires_date());
                assert!(options[1].requires_date());
            }
            other => panic!("expected single_choice, got {:?}", other),
        }

        let back = serde_json::to_value(&field).unwrap();
        assert_eq!(back, json);
    }

    #[test]
    fn test_text_field_minimal_shape() {
        let field: Field = serde_json::from_value(serde_json::json!({
            "field_id": "iban",
            "label": "IBAN",
            "type": "text"
        }))
        .unwrap();

        assert_eq!(field.kind, FieldKind::Text);
        assert!(!field.is_required());
        assert_eq!(
            serde_json::to_value(&field).unwrap(),
            serde_json::json!({ "field_id": "iban", "label": "IBAN", "type": "text" })
        );
    }
}
