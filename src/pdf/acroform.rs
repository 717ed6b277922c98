//! AcroForm traversal
//!
//! Shared walker over a document's interactive form: resolves the field
//! tree under `/AcroForm /Fields`, producing fully-qualified field names in
//! document order together with each terminal field's effective type.

use lopdf::{Dictionary, Document, Object, ObjectId};

/// Effective `/FT` of a terminal field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldType {
    Text,
    Button,
    Choice,
    Signature,
    Unknown,
}

impl FieldType {
    fn from_name(name: &[u8]) -> Self {
        match name {
            b"Tx" => Self::Text,
            b"Btn" => Self::Button,
            b"Ch" => Self::Choice,
            b"Sig" => Self::Signature,
            _ => Self::Unknown,
        }
    }
}

/// One terminal field of the form
#[derive(Debug, Clone)]
pub(crate) struct FormField {
    pub id: ObjectId,
    /// Fully-qualified name, partial names joined with `.`
    pub name: String,
    pub field_type: FieldType,
}

/// Follow one level of indirection if the object is a reference
fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// The document's AcroForm dictionary, if it has one
pub(crate) fn acroform_dict<'a>(doc: &'a Document) -> Option<&'a Dictionary> {
    let root = resolve(doc, doc.trailer.get(b"Root").ok()?)?.as_dict().ok()?;
    resolve(doc, root.get(b"AcroForm").ok()?)?.as_dict().ok()
}

/// All terminal fields in document order
pub(crate) fn collect_fields(doc: &Document) -> Vec<FormField> {
    let mut out = Vec::new();
    let Some(acro) = acroform_dict(doc) else {
        return out;
    };
    let Some(fields) = acro
        .get(b"Fields")
        .ok()
        .and_then(|o| resolve(doc, o))
        .and_then(|o| o.as_array().ok())
    else {
        return out;
    };
    for entry in fields {
        if let Object::Reference(id) = entry {
            collect_field(doc, *id, None, None, &mut out);
        }
    }
    out
}

fn collect_field(
    doc: &Document,
    id: ObjectId,
    parent_name: Option<&str>,
    inherited_type: Option<FieldType>,
    out: &mut Vec<FormField>,
) {
    let Ok(dict) = doc.get_object(id).and_then(|o| o.as_dict()) else {
        return;
    };

    let partial = dict
        .get(b"T")
        .ok()
        .and_then(|o| resolve(doc, o))
        .and_then(|o| match o {
            Object::String(bytes, _) => Some(decode_text(bytes)),
            _ => None,
        });

    let name = match (parent_name, partial.as_deref()) {
        (Some(parent), Some(partial)) => format!("{parent}.{partial}"),
        (Some(parent), None) => parent.to_string(),
        (None, Some(partial)) => partial.to_string(),
        (None, None) => String::new(),
    };

    let field_type = dict
        .get(b"FT")
        .ok()
        .and_then(|o| resolve(doc, o))
        .and_then(|o| match o {
            Object::Name(n) => Some(FieldType::from_name(n)),
            _ => None,
        })
        .or(inherited_type);

    // A /Kids entry that itself carries /T is a child field; kids without
    // /T are widget annotations of this terminal field.
    let child_fields: Vec<ObjectId> = dict
        .get(b"Kids")
        .ok()
        .and_then(|o| resolve(doc, o))
        .and_then(|o| o.as_array().ok())
        .map(|kids| {
            kids.iter()
                .filter_map(|kid| match kid {
                    Object::Reference(kid_id) => {
                        let kid_dict = doc.get_object(*kid_id).and_then(|o| o.as_dict()).ok()?;
                        kid_dict.has(b"T").then_some(*kid_id)
                    }
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    if child_fields.is_empty() {
        if !name.is_empty() {
            out.push(FormField {
                id,
                name,
                field_type: field_type.unwrap_or(FieldType::Unknown),
            });
        }
        return;
    }

    for kid_id in child_fields {
        let parent = if name.is_empty() { None } else { Some(name.as_str()) };
        collect_field(doc, kid_id, parent, field_type, out);
    }
}

/// Decode a PDF text string: UTF-16BE when BOM-prefixed, else UTF-8 with a
/// Latin-1 fallback for legacy PDFDocEncoding bytes
pub(crate) fn decode_text(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks(2)
            .map(|pair| {
                if pair.len() == 2 {
                    u16::from_be_bytes([pair[0], pair[1]])
                } else {
                    u16::from(pair[0])
                }
            })
            .collect();
        String::from_utf16_lossy(&units)
    } else if let Ok(s) = std::str::from_utf8(bytes) {
        s.to_string()
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}

/// Encode a value as a PDF text string object, using UTF-16BE with BOM for
/// anything beyond ASCII
pub(crate) fn encode_text(value: &str) -> Object {
    if value.is_ascii() {
        Object::string_literal(value)
    } else {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in value.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        Object::String(bytes, lopdf::StringFormat::Hexadecimal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf16be_with_bom() {
        let bytes = [0xFE, 0xFF, 0x00, 0x4D, 0x00, 0xFC]; // "Mü"
        assert_eq!(decode_text(&bytes), "Mü");
    }

    #[test]
    fn test_decode_plain_and_latin1() {
        assert_eq!(decode_text(b"iban_field"), "iban_field");
        assert_eq!(decode_text(&[0x4D, 0xFC]), "Mü"); // Latin-1 fallback
    }

    #[test]
    fn test_encode_ascii_stays_literal() {
        match encode_text("DE89") {
            Object::String(bytes, _) => assert_eq!(bytes, b"DE89"),
            other => panic!("unexpected object {:?}", other),
        }
    }

    #[test]
    fn test_encode_non_ascii_gets_bom() {
        match encode_text("Müller") {
            Object::String(bytes, _) => {
                assert_eq!(&bytes[..2], &[0xFE, 0xFF]);
                assert_eq!(decode_text(&bytes), "Müller");
            }
            other => panic!("unexpected object {:?}", other),
        }
    }
}
