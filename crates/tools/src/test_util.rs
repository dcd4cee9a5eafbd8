//! Shared test helpers for action tests.

use async_trait::async_trait;
use codecritic_core::error::ProviderError;
use codecritic_core::message::Message;
use codecritic_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};

/// A provider that always returns the same canned text, or always fails.
pub struct CannedProvider {
    response: Option<String>,
    failure: Option<String>,
}

impl CannedProvider {
    pub fn new(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
            failure: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            response: None,
            failure: Some(reason.to_string()),
        }
    }
}

#[async_trait]
impl Provider for CannedProvider {
    fn name(&self) -> &str {
        "canned"
    }

    async fn complete(
        &self,
        _request: ProviderRequest,
    ) -> Result<ProviderResponse, ProviderError> {
        if let Some(reason) = &self.failure {
            return Err(ProviderError::Network(reason.clone()));
        }
        Ok(ProviderResponse {
            message: Message::assistant(self.response.clone().unwrap_or_default()),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "mock-model".into(),
        })
    }
}
