//! PDF form layer
//!
//! Read-only introspection of a document's fillable fields and the fill
//! engine that writes confirmed values back. Built on lopdf; only the
//! AcroForm layer is touched, page content is never reconstructed.

mod acroform;
mod fill;
mod inspect;

pub use fill::{fill_form, FillError};
pub use inspect::{is_editable, list_field_names, DocumentKind};
