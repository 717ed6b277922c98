//! Field name normalization and auto-mapping
//!
//! Proposes a correspondence between schema field ids and a PDF's field
//! names. The proposal is a heuristic the user may override; nothing here
//! touches the schema or the document.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::schema::{AnswerSet, DynamicFormSchema};

/// Schema field id → PDF field name, possibly partial
///
/// Built once per (schema, document) pair and discarded after the fill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping {
    entries: BTreeMap<String, String>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field_id: impl Into<String>, pdf_name: impl Into<String>) {
        self.entries.insert(field_id.into(), pdf_name.into());
    }

    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.entries.get(field_id).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Translate one answer key: its mapped PDF name, or the key itself
    pub fn resolve(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Re-key the flattened answers by PDF field name
    ///
    /// An empty mapping is the identity fallback: answer keys are used as
    /// PDF field names directly. Keys without a mapping entry also pass
    /// through as themselves and simply match no field at fill time.
    pub fn apply(&self, answers: &AnswerSet) -> BTreeMap<String, String> {
        let flat = answers.flatten();
        if self.entries.is_empty() {
            return flat;
        }
        flat.into_iter()
            .map(|(key, value)| (self.resolve(&key), value))
            .collect()
    }
}

/// Lowercase, then strip everything that is not an ASCII letter or digit
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Propose a mapping by normalized name equality
///
/// Per schema field, the first PDF name (document order) matching the
/// normalized field id wins, then the first matching the normalized label.
/// A PDF name claimed by an earlier schema field is not reused; fields
/// without a match stay unmapped.
pub fn auto_map(schema: &DynamicFormSchema, pdf_fields: &[String]) -> FieldMapping {
    let mut mapping = FieldMapping::new();
    let mut claimed: HashSet<usize> = HashSet::new();

    for field in &schema.fields {
        let by_id = normalize(&field.field_id);
        let by_label = normalize(&field.label);
        let hit = find_unclaimed(pdf_fields, &claimed, &by_id)
            .or_else(|| find_unclaimed(pdf_fields, &claimed, &by_label));
        if let Some(index) = hit {
            claimed.insert(index);
            mapping.insert(field.field_id.clone(), pdf_fields[index].clone());
        }
    }

    mapping
}

fn find_unclaimed(names: &[String], claimed: &HashSet<usize>, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    names
        .iter()
        .enumerate()
        .find(|(index, name)| !claimed.contains(index) && normalize(name) == needle)
        .map(|(index, _)| index)
}
