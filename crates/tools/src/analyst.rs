//! Shared plumbing for the analyst-backed actions.
//!
//! Each analysis action sends one system prompt + the code under review to
//! the analyst model and returns the raw response text (expected to be a
//! JSON object string, but never parsed here; the summary action is the
//! parsing boundary).

use codecritic_core::error::ActionError;
use codecritic_core::message::Message;
use codecritic_core::provider::{Provider, ProviderRequest};
use std::sync::Arc;
use tracing::debug;

/// A handle to the analyst model tier, shared by the analysis actions.
#[derive(Clone)]
pub struct AnalystClient {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
}

impl AnalystClient {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
        }
    }

    /// Run one analysis call. `action` is used for logging and error context.
    pub async fn analyze(
        &self,
        action: &str,
        system_prompt: &str,
        user_prompt: String,
    ) -> Result<String, ActionError> {
        debug!(action, model = %self.model, "Running analysis call");

        let request = ProviderRequest {
            model: self.model.clone(),
            messages: vec![Message::system(system_prompt), Message::user(user_prompt)],
            temperature: self.temperature,
            max_tokens: None,
            actions: vec![],
        };

        let response = self.provider.complete(request).await.map_err(|e| {
            ActionError::ExecutionFailed {
                action: action.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(response.message.content)
    }
}

/// Extract the required `code` argument shared by the analysis actions.
pub(crate) fn code_argument(arguments: &serde_json::Value) -> Result<String, ActionError> {
    arguments["code"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ActionError::InvalidArguments("Missing 'code' argument".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::CannedProvider;

    #[tokio::test]
    async fn analyze_returns_model_text() {
        let provider = Arc::new(CannedProvider::new(r#"{"issues": []}"#));
        let client = AnalystClient::new(provider, "llama3-70b-8192", 0.7);

        let output = client
            .analyze("check_for_common_errors", "system", "user".into())
            .await
            .unwrap();
        assert_eq!(output, r#"{"issues": []}"#);
    }

    #[tokio::test]
    async fn analyze_wraps_provider_failure() {
        let provider = Arc::new(CannedProvider::failing("connection refused"));
        let client = AnalystClient::new(provider, "llama3-70b-8192", 0.7);

        let err = client
            .analyze("assess_code_quality", "system", "user".into())
            .await
            .unwrap_err();
        match err {
            ActionError::ExecutionFailed { action, reason } => {
                assert_eq!(action, "assess_code_quality");
                assert!(reason.contains("connection refused"));
            }
            other => panic!("Expected ExecutionFailed, got {other:?}"),
        }
    }

    #[test]
    fn code_argument_missing() {
        let err = code_argument(&serde_json::json!({})).unwrap_err();
        assert!(matches!(err, ActionError::InvalidArguments(_)));
    }
}
