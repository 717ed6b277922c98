//! End-to-end pipeline tests
//!
//! Exercises introspect -> map -> validate -> fill against fixture PDFs
//! built in memory, including the flat-document no-op path.

use std::collections::BTreeMap;

use lopdf::{dictionary, Document, Object};

use formular_server::mapping::{auto_map, FieldMapping};
use formular_server::pdf::{fill_form, is_editable, list_field_names, DocumentKind};
use formular_server::schema::{fallback_schema, AnswerSet};
use formular_server::validate::FormValidator;

/// Build a one-page PDF with a text field per name, in the given order
fn fixture_pdf(field_names: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut field_refs = Vec::new();
    for (i, name) in field_names.iter().enumerate() {
        let y = 700 - (i as i64) * 40;
        let field_id = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Widget",
            "FT" => "Tx",
            "T" => Object::string_literal(*name),
            "Rect" => vec![50.into(), y.into(), 300.into(), (y + 20).into()],
        });
        field_refs.push(Object::Reference(field_id));
    }

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        "Annots" => field_refs.clone(),
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        }),
    );

    let acroform_id = doc.add_object(dictionary! {
        "Fields" => field_refs,
    });
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
        "AcroForm" => Object::Reference(acroform_id),
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).expect("serialize fixture");
    out
}

/// A PDF with a page but no AcroForm at all
fn flat_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).expect("serialize fixture");
    out
}

/// Read back the /V of the field named `name` from serialized bytes
fn field_value(bytes: &[u8], name: &str) -> Option<String> {
    let doc = Document::load_mem(bytes).ok()?;
    for (_, object) in doc.objects.iter() {
        let Ok(dict) = object.as_dict() else { continue };
        let matches = match dict.get(b"T") {
            Ok(Object::String(t, _)) => t.as_slice() == name.as_bytes(),
            _ => false,
        };
        if !matches {
            continue;
        }
        return match dict.get(b"V") {
            Ok(Object::String(v, _)) => Some(String::from_utf8_lossy(v).into_owned()),
            _ => None,
        };
    }
    None
}

#[test]
fn test_introspection_reports_fields_in_document_order() {
    let bytes = fixture_pdf(&["Familienstand", "iban_field", "Vorname des Kindes"]);

    assert!(is_editable(&bytes));
    assert_eq!(DocumentKind::of(&bytes), DocumentKind::Fillable);
    assert_eq!(
        list_field_names(&bytes),
        vec!["Familienstand", "iban_field", "Vorname des Kindes"]
    );
}

#[test]
fn test_flat_pdf_is_not_editable_and_fill_is_a_noop() {
    let bytes = flat_pdf();
    assert!(!is_editable(&bytes));
    assert_eq!(DocumentKind::of(&bytes), DocumentKind::Flat);
    assert!(list_field_names(&bytes).is_empty());

    // Same fill algorithm runs and produces a document, just with nothing set.
    let values = BTreeMap::from([("iban_field".to_string(), "DE89".to_string())]);
    let filled = fill_form(&bytes, &values).expect("no-op fill succeeds");
    assert!(!list_field_names(&filled).iter().any(|n| n == "iban_field"));
}

#[test]
fn test_fill_roundtrip_through_mapping() {
    let bytes = fixture_pdf(&["iban_field", "other_field"]);

    let mut mapping = FieldMapping::new();
    mapping.insert("IBAN", "iban_field");

    let mut answers = AnswerSet::new();
    answers.insert("IBAN", "DE89370400440532013000");

    let filled = fill_form(&bytes, &mapping.apply(&answers)).expect("fill succeeds");
    assert_eq!(
        field_value(&filled, "iban_field").as_deref(),
        Some("DE89370400440532013000")
    );
    // Fields without an incoming value stay untouched, never cleared.
    assert_eq!(field_value(&filled, "other_field"), None);
}

#[test]
fn test_identity_fallback_leaves_unrelated_fields_alone() {
    let bytes = fixture_pdf(&["iban", "vermerk"]);

    let mut answers = AnswerSet::new();
    answers.insert("iban", "DE89370400440532013000");
    answers.insert("somewhere_else", "value without a field");

    let filled = fill_form(&bytes, &FieldMapping::new().apply(&answers)).expect("fill succeeds");
    assert_eq!(
        field_value(&filled, "iban").as_deref(),
        Some("DE89370400440532013000")
    );
    assert_eq!(field_value(&filled, "vermerk"), None);
}

#[test]
fn test_unmapped_schema_field_is_silently_skipped() {
    let schema = fallback_schema("de");
    let bytes = fixture_pdf(&["Familienstand", "IBAN"]);

    let names = list_field_names(&bytes);
    let mapping = auto_map(&schema, &names);
    assert_eq!(mapping.get("familienstand"), Some("Familienstand"));
    assert_eq!(mapping.get("iban"), Some("IBAN"));
    // No counterpart in the document: stays unmapped.
    assert_eq!(mapping.get("kind_vorname"), None);

    let mut answers = AnswerSet::new();
    answers.insert("familienstand", "Ledig");
    answers.insert("iban", "DE89370400440532013000");
    answers.insert("kind_vorname", "Mia");

    // The skip must be a skip, not a crash.
    let filled = fill_form(&bytes, &mapping.apply(&answers)).expect("fill succeeds");
    assert_eq!(field_value(&filled, "Familienstand").as_deref(), Some("Ledig"));
    assert_eq!(
        field_value(&filled, "IBAN").as_deref(),
        Some("DE89370400440532013000")
    );
}

#[test]
fn test_end_to_end_companion_date_scenario() {
    let schema = fallback_schema("de");
    let validator = FormValidator::compile(&schema).expect("fallback schema compiles");

    let mut flat = BTreeMap::new();
    flat.insert("familienstand".to_string(), "Verheiratet".to_string());
    flat.insert("iban".to_string(), "DE89370400440532013000".to_string());
    flat.insert("kind_vorname".to_string(), "Mia".to_string());
    flat.insert("kind_geburtsdatum".to_string(), "03.04.2019".to_string());

    // Companion absent: accepted by design.
    assert!(validator.validate(&AnswerSet::from_flat(flat.clone())).is_ok());

    // Companion present but malformed: rejected on the companion key.
    flat.insert("familienstand__start".to_string(), "January 2020".to_string());
    let errors = validator
        .validate(&AnswerSet::from_flat(flat.clone()))
        .unwrap_err();
    assert_eq!(errors.get("familienstand__start"), Some("Use dd.mm.yyyy"));

    // Well-formed companion: accepted and written through to the PDF.
    flat.insert("familienstand__start".to_string(), "01.01.2020".to_string());
    let answers = AnswerSet::from_flat(flat);
    assert!(validator.validate(&answers).is_ok());

    let bytes = fixture_pdf(&["familienstand", "familienstand__start", "iban"]);
    let filled = fill_form(&bytes, &FieldMapping::new().apply(&answers)).expect("fill succeeds");
    assert_eq!(
        field_value(&filled, "familienstand").as_deref(),
        Some("Verheiratet")
    );
    assert_eq!(
        field_value(&filled, "familienstand__start").as_deref(),
        Some("01.01.2020")
    );
}

#[test]
fn test_filled_document_requests_appearance_regeneration() {
    let bytes = fixture_pdf(&["iban_field"]);
    let values = BTreeMap::from([("iban_field".to_string(), "DE89".to_string())]);
    let filled = fill_form(&bytes, &values).expect("fill succeeds");

    let doc = Document::load_mem(&filled).expect("filled output parses");
    let catalog = doc
        .trailer
        .get(b"Root")
        .and_then(|o| o.as_reference())
        .and_then(|id| doc.get_object(id))
        .and_then(|o| o.as_dict())
        .expect("catalog");
    let acroform = catalog
        .get(b"AcroForm")
        .and_then(|o| o.as_reference())
        .and_then(|id| doc.get_object(id))
        .and_then(|o| o.as_dict())
        .expect("acroform");
    assert!(matches!(
        acroform.get(b"NeedAppearances"),
        Ok(Object::Boolean(true))
    ));
}
