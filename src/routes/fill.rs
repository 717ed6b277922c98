//! Fill pipeline routes
//!
//! Endpoints:
//! - POST /api/v1/fill/inspect - list a PDF's fillable field names
//! - POST /api/v1/fill/map - propose a schema-to-PDF field mapping
//! - POST /api/v1/fill - validate answers and produce the filled PDF
//!
//! All three accept multipart bodies; the PDF travels in a `document`
//! part, JSON payloads in `schema` / `answers` / `mapping` parts.

use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::Multipart,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;

use super::schema::ValidateResponse;
use crate::error::{AppError, Result};
use crate::mapping::{auto_map, FieldMapping};
use crate::pdf::{self, DocumentKind};
use crate::schema::{AnswerSet, DynamicFormSchema};
use crate::state::AppState;
use crate::validate::FormValidator;

/// Create the fill router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/inspect", post(inspect_document))
        .route("/map", post(propose_mapping))
        .route("/", post(fill_document))
}

#[derive(Serialize)]
pub struct InspectResponse {
    pub kind: DocumentKind,
    pub editable: bool,
    /// Field names in document order
    pub fields: Vec<String>,
}

#[derive(Serialize)]
pub struct MapResponse {
    pub mapping: FieldMapping,
    /// Schema fields with no PDF counterpart, skipped at fill time
    pub unmapped: Vec<String>,
}

/// Collected multipart parts; each route requires a subset
#[derive(Default)]
struct FillParts {
    document: Option<Bytes>,
    schema: Option<DynamicFormSchema>,
    answers: Option<BTreeMap<String, String>>,
    mapping: Option<FieldMapping>,
}

impl FillParts {
    async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut parts = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "document" => parts.document = Some(field.bytes().await?),
                "schema" => {
                    let text = field.text().await?;
                    parts.schema = Some(serde_json::from_str(&text).map_err(|e| {
                        AppError::BadRequest(format!("Invalid 'schema' part: {e}"))
                    })?);
                }
                "answers" => {
                    let text = field.text().await?;
                    parts.answers = Some(serde_json::from_str(&text).map_err(|e| {
                        AppError::BadRequest(format!("Invalid 'answers' part: {e}"))
                    })?);
                }
                "mapping" => {
                    let text = field.text().await?;
                    parts.mapping = Some(serde_json::from_str(&text).map_err(|e| {
                        AppError::BadRequest(format!("Invalid 'mapping' part: {e}"))
                    })?);
                }
                other => {
                    tracing::debug!(part = other, "ignoring unknown multipart part");
                }
            }
        }
        Ok(parts)
    }

    fn document(&self) -> Result<&[u8]> {
        self.document
            .as_deref()
            .ok_or_else(|| AppError::BadRequest("Missing 'document' part".to_string()))
    }

    fn schema(&self) -> Result<&DynamicFormSchema> {
        self.schema
            .as_ref()
            .ok_or_else(|| AppError::BadRequest("Missing 'schema' part".to_string()))
    }

    fn answers(&self) -> Result<&BTreeMap<String, String>> {
        self.answers
            .as_ref()
            .ok_or_else(|| AppError::BadRequest("Missing 'answers' part".to_string()))
    }
}

/// POST /api/v1/fill/inspect
///
/// Parse failures are not errors: corrupt or non-PDF input reports as a
/// flat document with zero fields.
async fn inspect_document(multipart: Multipart) -> Result<Json<InspectResponse>> {
    let parts = FillParts::read(multipart).await?;
    let document = parts.document()?;

    let fields = pdf::list_field_names(document);
    let kind = if fields.is_empty() {
        DocumentKind::Flat
    } else {
        DocumentKind::Fillable
    };

    tracing::info!(?kind, fields = fields.len(), "inspected document");
    Ok(Json(InspectResponse {
        kind,
        editable: kind == DocumentKind::Fillable,
        fields,
    }))
}

/// POST /api/v1/fill/map
///
/// Best-effort proposal by normalized name equality; the client is
/// expected to let the user confirm or override it.
async fn propose_mapping(multipart: Multipart) -> Result<Json<MapResponse>> {
    let parts = FillParts::read(multipart).await?;
    let document = parts.document()?;
    let schema = parts.schema()?;

    let names = pdf::list_field_names(document);
    let mapping = auto_map(schema, &names);
    let unmapped = schema
        .fields
        .iter()
        .filter(|f| mapping.get(&f.field_id).is_none())
        .map(|f| f.field_id.clone())
        .collect();

    Ok(Json(MapResponse { mapping, unmapped }))
}

/// POST /api/v1/fill
///
/// Validates the answers against the schema, re-keys them through the
/// mapping (identity fallback when no mapping part was sent), fills the
/// document, and streams back the new bytes. A flat document passes
/// through the same path as an acknowledged no-op.
async fn fill_document(multipart: Multipart) -> Result<Response> {
    let parts = FillParts::read(multipart).await?;
    let document = parts.document()?;
    let schema = parts.schema()?;
    let answers_flat = parts.answers()?;

    let validator = FormValidator::compile(schema)?;
    let answers = AnswerSet::from_flat(answers_flat.clone());
    if let Err(errors) = validator.validate(&answers) {
        let body = Json(ValidateResponse {
            valid: false,
            errors: Some(errors),
        });
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, body).into_response());
    }

    let mapping = parts.mapping.clone().unwrap_or_default();
    let values = mapping.apply(&answers);

    if DocumentKind::of(document) == DocumentKind::Flat {
        tracing::info!("document has no fillable form, fill pass will be a no-op");
    }

    let filled = pdf::fill_form(document, &values)?;

    let filename = format!(
        "{}_ausgefuellt_{}.pdf",
        schema.form_id,
        Utc::now().format("%Y%m%d%H%M%S")
    );
    tracing::info!(%filename, bytes = filled.len(), "filled document ready");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        filled,
    )
        .into_response())
}
