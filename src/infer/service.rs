//! Inference service
//!
//! Wraps a provider with the fallback policy: the caller always gets a
//! schema that compiles into a validator, never an error.

use std::sync::Arc;

use super::provider::{DisabledProvider, InferenceProvider, OpenAiProvider};
use crate::config::InferenceConfig;
use crate::schema::{fallback_schema, DynamicFormSchema};
use crate::validate::FormValidator;

/// Never-failing schema source
#[derive(Clone)]
pub struct InferenceService {
    provider: Arc<dyn InferenceProvider>,
}

impl InferenceService {
    pub fn new(provider: Arc<dyn InferenceProvider>) -> Self {
        Self { provider }
    }

    /// Pick the provider from configuration
    pub fn from_config(config: &InferenceConfig) -> Self {
        match &config.api_key {
            Some(key) => Self::new(Arc::new(OpenAiProvider::new(
                key,
                &config.model,
                &config.base_url,
            ))),
            None => {
                tracing::info!("No inference API key configured, serving fallback schemas only");
                Self::new(Arc::new(DisabledProvider))
            }
        }
    }

    /// Infer a schema, substituting the locale-aware fallback when the
    /// provider fails or produces a schema the validator rejects
    pub async fn infer_schema(&self, situation: &str, locale: &str) -> DynamicFormSchema {
        match self.provider.infer(situation, locale).await {
            Ok(schema) => match FormValidator::compile(&schema) {
                Ok(_) => {
                    tracing::info!(
                        provider = self.provider.provider_name(),
                        form_id = %schema.form_id,
                        fields = schema.fields.len(),
                        "inferred form schema"
                    );
                    schema
                }
                Err(e) => {
                    tracing::warn!(
                        provider = self.provider.provider_name(),
                        "inferred schema rejected ({e}), using fallback"
                    );
                    fallback_schema(locale)
                }
            },
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.provider_name(),
                    "schema inference failed ({e}), using fallback"
                );
                fallback_schema(locale)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infer::provider::MockProvider;
    use crate::schema::{Field, FieldKind};

    fn service_with(schema: Result<DynamicFormSchema, &'static str>) -> InferenceService {
        InferenceService::new(Arc::new(MockProvider { schema }))
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back() {
        let service = service_with(Err("connection refused"));
        let schema = service.infer_schema("Ich brauche Kindergeld", "de").await;
        assert_eq!(schema.form_id, "antrag_kindergeld");
        assert_eq!(schema.language, "de");
    }

    #[tokio::test]
    async fn test_uncompilable_schema_falls_back() {
        let broken = DynamicFormSchema {
            form_id: "broken".to_string(),
            language: "de".to_string(),
            title: String::new(),
            summary: String::new(),
            fields: vec![
                Field {
                    field_id: "x".to_string(),
                    label: "X".to_string(),
                    help_text: None,
                    validation: None,
                    kind: FieldKind::Text,
                },
                Field {
                    field_id: "x".to_string(),
                    label: "X again".to_string(),
                    help_text: None,
                    validation: None,
                    kind: FieldKind::Text,
                },
            ],
        };

        let service = service_with(Ok(broken));
        let schema = service.infer_schema("irrelevant", "en").await;
        assert_eq!(schema.form_id, "antrag_kindergeld");
    }

    #[tokio::test]
    async fn test_good_schema_passes_through() {
        let good = fallback_schema("en");
        let mut custom = good.clone();
        custom.form_id = "custom_form".to_string();

        let service = service_with(Ok(custom));
        let schema = service.infer_schema("irrelevant", "en").await;
        assert_eq!(schema.form_id, "custom_form");
    }
}
