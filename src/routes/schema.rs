//! Schema API routes
//!
//! Endpoints:
//! - POST /api/v1/schema - infer a form schema from a situation description
//! - POST /api/v1/schema/validate - validate answers against a schema

use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::schema::{AnswerSet, DynamicFormSchema};
use crate::state::AppState;
use crate::validate::{FormValidator, ValidationErrors};

/// Create the schema router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(infer_schema))
        .route("/validate", post(validate_answers))
}

#[derive(Deserialize)]
pub struct SchemaRequest {
    pub situation: String,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Deserialize)]
pub struct ValidateRequest {
    pub schema: DynamicFormSchema,
    /// Flat answer map, companion dates under `<field_id>__start`
    pub answers: BTreeMap<String, String>,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

/// POST /api/v1/schema
///
/// Infers a schema for the described situation; always answers with a
/// usable schema (the locale-aware fallback when inference is down).
async fn infer_schema(
    State(state): State<AppState>,
    Json(request): Json<SchemaRequest>,
) -> Json<DynamicFormSchema> {
    let locale = request.locale.as_deref().unwrap_or("en");
    let request_id = Uuid::new_v4();
    tracing::info!(%request_id, locale, "inferring form schema");

    let schema = state
        .inference()
        .infer_schema(&request.situation, locale)
        .await;
    Json(schema)
}

/// POST /api/v1/schema/validate
///
/// Per-field validation errors are a 422 payload, not a server error;
/// a schema that cannot compile is a 400.
async fn validate_answers(Json(request): Json<ValidateRequest>) -> Result<impl IntoResponse> {
    let validator = FormValidator::compile(&request.schema)?;
    let answers = AnswerSet::from_flat(request.answers);

    Ok(match validator.validate(&answers) {
        Ok(()) => (
            StatusCode::OK,
            Json(ValidateResponse {
                valid: true,
                errors: None,
            }),
        ),
        Err(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidateResponse {
                valid: false,
                errors: Some(errors),
            }),
        ),
    })
}
