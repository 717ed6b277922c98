//! Inference providers
//!
//! Defines the provider trait and implementations for schema inference
//! backends.

use async_trait::async_trait;

use super::types::InferenceError;
use crate::schema::DynamicFormSchema;

const SYSTEM_PROMPT: &str = "You create JSON form schemas for German public authority forms. \
Use fields: field_id, label, type (text|date|single_choice), options (for single_choice with \
requires_date boolean), validation (required, pattern, format), help_text. Return strictly JSON.";

/// Schema inference provider trait
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Short name for logging
    fn provider_name(&self) -> &'static str;

    /// Infer a form schema from a free-text situation description
    async fn infer(
        &self,
        situation: &str,
        locale: &str,
    ) -> Result<DynamicFormSchema, InferenceError>;
}

/// OpenAI chat-completions provider
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: &str, model: &str, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl InferenceProvider for OpenAiProvider {
    fn provider_name(&self) -> &'static str {
        "openai"
    }

    async fn infer(
        &self,
        situation: &str,
        locale: &str,
    ) -> Result<DynamicFormSchema, InferenceError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = serde_json::json!({
            "model": self.model,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": format!("Locale: {locale}. Situation: {situation}") }
            ]
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| InferenceError::Api(format!("failed to call OpenAI: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Api(format!(
                "OpenAI returned {status}: {body}"
            )));
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(format!("failed to parse response: {e}")))?;

        let content = result["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| InferenceError::InvalidResponse("missing message content".to_string()))?;

        serde_json::from_str(content).map_err(|e| {
            InferenceError::InvalidResponse(format!("response is not a form schema: {e}"))
        })
    }
}

/// Provider used when no API key is configured; always defers to the
/// fallback schema
pub struct DisabledProvider;

#[async_trait]
impl InferenceProvider for DisabledProvider {
    fn provider_name(&self) -> &'static str {
        "disabled"
    }

    async fn infer(
        &self,
        _situation: &str,
        _locale: &str,
    ) -> Result<DynamicFormSchema, InferenceError> {
        Err(InferenceError::NotConfigured)
    }
}

/// Mock provider for testing
#[cfg(test)]
pub struct MockProvider {
    pub schema: Result<DynamicFormSchema, &'static str>,
}

#[cfg(test)]
#[async_trait]
impl InferenceProvider for MockProvider {
    fn provider_name(&self) -> &'static str {
        "mock"
    }

    async fn infer(
        &self,
        _situation: &str,
        _locale: &str,
    ) -> Result<DynamicFormSchema, InferenceError> {
        self.schema
            .clone()
            .map_err(|e| InferenceError::Api(e.to_string()))
    }
}
