//! Fallback schema
//!
//! A fixed, locale-aware child benefit application used whenever the
//! inference provider is unavailable, fails, or returns a schema that
//! cannot be compiled into a validator.

use super::types::{ChoiceOption, DynamicFormSchema, Field, FieldKind, FieldValidation};

fn choice(label: &str, requires_date: bool) -> ChoiceOption {
    ChoiceOption {
        label: label.to_string(),
        requires_date: requires_date.then_some(true),
    }
}

/// Build the fallback schema for the given locale tag
pub fn fallback_schema(locale: &str) -> DynamicFormSchema {
    let german = locale.starts_with("de");
    let pick = |de: &str, en: &str| if german { de.to_string() } else { en.to_string() };

    DynamicFormSchema {
        form_id: "antrag_kindergeld".to_string(),
        language: locale.to_string(),
        title: pick("Kindergeld Antrag", "Child Benefit Application"),
        summary: pick(
            "Dieses Formular dient der Beantragung von Kindergeld.",
            "This form is for applying for child benefit in Germany.",
        ),
        fields: vec![
            Field {
                field_id: "familienstand".to_string(),
                label: pick("Familienstand", "Family Status"),
                help_text: Some(pick(
                    "Wählen Sie Ihren aktuellen Familienstand. Falls nicht ledig, geben Sie das Beginndatum an.",
                    "Select your current family status. If not single, provide the date your current status began.",
                )),
                validation: Some(FieldValidation {
                    required: Some(true),
                    ..Default::default()
                }),
                kind: FieldKind::SingleChoice {
                    options: vec![
                        choice("Ledig", false),
                        choice("Verheiratet", true),
                        choice("Verpartnert", true),
                        choice("Geschieden", true),
                        choice("Verwitwet", true),
                        choice("Getrennt lebend", true),
                    ],
                },
            },
            Field {
                field_id: "iban".to_string(),
                label: "IBAN".to_string(),
                help_text: Some(pick(
                    "Ihre IBAN von der Bankkarte.",
                    "Your bank account number, found on your bank card.",
                )),
                validation: Some(FieldValidation {
                    required: Some(true),
                    pattern: Some("^[A-Z]{2}\\d{2}[A-Z0-9]{1,30}$".to_string()),
                    format: Some("iban".to_string()),
                }),
                kind: FieldKind::Text,
            },
            Field {
                field_id: "kind_vorname".to_string(),
                label: pick("Vorname des Kindes", "Child's First Name"),
                help_text: None,
                validation: Some(FieldValidation {
                    required: Some(true),
                    ..Default::default()
                }),
                kind: FieldKind::Text,
            },
            Field {
                field_id: "kind_geburtsdatum".to_string(),
                label: pick("Geburtsdatum des Kindes", "Child's Date of Birth"),
                help_text: None,
                validation: Some(FieldValidation {
                    required: Some(true),
                    format: Some("dd.mm.yyyy".to_string()),
                    ..Default::default()
                }),
                kind: FieldKind::Date,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_locale_aware() {
        let de = fallback_schema("de-DE");
        assert_eq!(de.title, "Kindergeld Antrag");
        assert_eq!(de.language, "de-DE");

        let en = fallback_schema("en");
        assert_eq!(en.title, "Child Benefit Application");
        assert_eq!(en.fields.len(), 4);
    }

    #[test]
    fn test_fallback_field_ids_are_unique() {
        let schema = fallback_schema("de");
        let mut ids: Vec<_> = schema.fields.iter().map(|f| &f.field_id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), schema.fields.len());
    }
}
