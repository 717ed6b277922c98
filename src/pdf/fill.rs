//! Fill engine
//!
//! Writes confirmed values into a document's text fields and serializes a
//! fresh byte buffer. Fields with no incoming value are left untouched,
//! never cleared; non-text field kinds are skipped. Appearance streams are
//! invalidated (`/AP` dropped, `NeedAppearances` set) so viewers render the
//! new values. A document without a form passes through as a no-op fill.

use std::collections::BTreeMap;

use lopdf::{Document, Object};
use thiserror::Error;

use super::acroform::{collect_fields, encode_text, FieldType};

/// Fatal fill pipeline failures; no partial document is ever produced
#[derive(Debug, Error)]
pub enum FillError {
    #[error("could not parse PDF document: {0}")]
    Parse(String),
    #[error("could not serialize filled document: {0}")]
    Serialize(String),
}

/// Fill the document's text fields from a map keyed by PDF field name
pub fn fill_form(bytes: &[u8], values: &BTreeMap<String, String>) -> Result<Vec<u8>, FillError> {
    let mut doc = Document::load_mem(bytes).map_err(|e| FillError::Parse(e.to_string()))?;
    if doc.is_encrypted() {
        return Err(FillError::Parse("document is encrypted".to_string()));
    }

    let fields = collect_fields(&doc);
    let mut written = 0usize;

    for field in &fields {
        let Some(value) = values.get(&field.name) else {
            continue;
        };
        if field.field_type != FieldType::Text {
            tracing::debug!(field = %field.name, "skipping non-text field");
            continue;
        }
        if let Ok(dict) = doc.get_object_mut(field.id).and_then(|o| o.as_dict_mut()) {
            dict.set("V", encode_text(value));
            // Stale appearance streams would keep showing the old value.
            dict.remove(b"AP");
            written += 1;
        }
    }

    if written > 0 {
        set_need_appearances(&mut doc);
    }
    tracing::debug!(total = fields.len(), written, "filled form fields");

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| FillError::Serialize(e.to_string()))?;
    Ok(out)
}

/// Ask viewers to regenerate field appearances on open
fn set_need_appearances(doc: &mut Document) {
    let Some(root_id) = doc
        .trailer
        .get(b"Root")
        .ok()
        .and_then(|o| o.as_reference().ok())
    else {
        return;
    };

    // The AcroForm entry may be an indirect reference or an inline dict.
    let acro_id = doc
        .get_object(root_id)
        .ok()
        .and_then(|o| o.as_dict().ok())
        .and_then(|d| d.get(b"AcroForm").ok())
        .and_then(|o| o.as_reference().ok());

    match acro_id {
        Some(id) => {
            if let Ok(dict) = doc.get_object_mut(id).and_then(|o| o.as_dict_mut()) {
                dict.set("NeedAppearances", true);
            }
        }
        None => {
            if let Ok(catalog) = doc.get_object_mut(root_id).and_then(|o| o.as_dict_mut()) {
                if let Ok(Object::Dictionary(acro)) = catalog.get_mut(b"AcroForm") {
                    acro.set("NeedAppearances", true);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rejects_non_pdf_bytes() {
        let values = BTreeMap::from([("iban_field".to_string(), "DE89".to_string())]);
        assert!(matches!(
            fill_form(b"not a pdf at all", &values),
            Err(FillError::Parse(_))
        ));
    }
}
