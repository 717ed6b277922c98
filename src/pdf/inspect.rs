//! PDF field introspection
//!
//! Read-only answers to "does this document have a fillable form, and what
//! are its field names". Every parse failure — corrupt bytes, non-PDF
//! input, encryption — degrades to "not editable" / empty list so callers
//! always have a safe fallback path.

use lopdf::Document;
use serde::{Deserialize, Serialize};

use super::acroform::collect_fields;

/// Two-state document model: either the form layer is usable or it is not
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Interactive form with at least one field
    Fillable,
    /// No form layer, zero fields, or unreadable document
    Flat,
}

impl DocumentKind {
    pub fn of(bytes: &[u8]) -> Self {
        if is_editable(bytes) {
            Self::Fillable
        } else {
            Self::Flat
        }
    }
}

fn load(bytes: &[u8]) -> Option<Document> {
    let doc = Document::load_mem(bytes).ok()?;
    if doc.is_encrypted() {
        return None;
    }
    Some(doc)
}

/// True only if the bytes parse as a PDF exposing at least one fillable field
pub fn is_editable(bytes: &[u8]) -> bool {
    load(bytes)
        .map(|doc| !collect_fields(&doc).is_empty())
        .unwrap_or(false)
}

/// Fully-qualified field names in document order; empty on any parse failure
pub fn list_field_names(bytes: &[u8]) -> Vec<String> {
    load(bytes)
        .map(|doc| collect_fields(&doc).into_iter().map(|f| f.name).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_pdf_bytes_are_not_editable() {
        let bytes = b"this is definitely not a pdf";
        assert!(!is_editable(bytes));
        assert_eq!(list_field_names(bytes), Vec::<String>::new());
        assert_eq!(DocumentKind::of(bytes), DocumentKind::Flat);
    }

    #[test]
    fn test_empty_input() {
        assert!(!is_editable(&[]));
        assert!(list_field_names(&[]).is_empty());
    }
}
