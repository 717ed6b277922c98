//! Answer sets
//!
//! User-entered values keyed by field id. A `single_choice` field whose
//! selected option requires a date carries exactly one extra value slot,
//! the companion date, stored on the same entry rather than as a loose
//! dictionary key. On the wire the set is a flat string map where the
//! companion travels under `<field_id>__start`.

use std::collections::BTreeMap;

/// Wire suffix for the companion date slot of a `single_choice` answer
pub const COMPANION_SUFFIX: &str = "__start";

/// Flat-map key under which a field's companion date travels
pub fn companion_key(field_id: &str) -> String {
    format!("{field_id}{COMPANION_SUFFIX}")
}

/// Both value slots of one answered field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldAnswer {
    /// The field's own value; `None` when the key was never submitted
    pub value: Option<String>,
    /// Companion date for `requires_date` choice options
    pub companion: Option<String>,
}

/// All answers for one form submission
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerSet {
    entries: BTreeMap<String, FieldAnswer>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the flat wire map, splitting off `__start` companion keys
    pub fn from_flat(flat: BTreeMap<String, String>) -> Self {
        let mut entries: BTreeMap<String, FieldAnswer> = BTreeMap::new();
        for (key, value) in flat {
            match key.strip_suffix(COMPANION_SUFFIX) {
                Some(base) if !base.is_empty() => {
                    entries.entry(base.to_string()).or_default().companion = Some(value);
                }
                _ => {
                    entries.entry(key).or_default().value = Some(value);
                }
            }
        }
        Self { entries }
    }

    /// Flatten back to the wire map; slots that were never set do not appear
    pub fn flatten(&self) -> BTreeMap<String, String> {
        let mut flat = BTreeMap::new();
        for (field_id, answer) in &self.entries {
            if let Some(value) = &answer.value {
                flat.insert(field_id.clone(), value.clone());
            }
            if let Some(companion) = &answer.companion {
                flat.insert(companion_key(field_id), companion.clone());
            }
        }
        flat
    }

    pub fn insert(&mut self, field_id: impl Into<String>, value: impl Into<String>) {
        self.entries.entry(field_id.into()).or_default().value = Some(value.into());
    }

    pub fn insert_companion(&mut self, field_id: impl Into<String>, date: impl Into<String>) {
        self.entries.entry(field_id.into()).or_default().companion = Some(date.into());
    }

    pub fn value_of(&self, field_id: &str) -> Option<&str> {
        self.entries.get(field_id).and_then(|a| a.value.as_deref())
    }

    pub fn companion_of(&self, field_id: &str) -> Option<&str> {
        self.entries
            .get(field_id)
            .and_then(|a| a.companion.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_companion_key_split_and_roundtrip() {
        let input = flat(&[
            ("familienstand", "Verheiratet"),
            ("familienstand__start", "01.01.2020"),
            ("iban", "DE89370400440532013000"),
        ]);

        let answers = AnswerSet::from_flat(input.clone());
        assert_eq!(answers.len(), 2);
        assert_eq!(answers.value_of("familienstand"), Some("Verheiratet"));
        assert_eq!(answers.companion_of("familienstand"), Some("01.01.2020"));
        assert_eq!(answers.companion_of("iban"), None);
        assert_eq!(answers.flatten(), input);
    }

    #[test]
    fn test_companion_without_base_value_is_preserved() {
        let input = flat(&[("familienstand__start", "01.01.2020")]);
        let answers = AnswerSet::from_flat(input.clone());

        assert_eq!(answers.value_of("familienstand"), None);
        assert_eq!(answers.companion_of("familienstand"), Some("01.01.2020"));
        // The missing base value must not materialize on the way back out.
        assert_eq!(answers.flatten(), input);
    }
}
