//! Decision step — one call to the orchestrator model per iteration.
//!
//! Takes the full conversation, invokes the reasoning provider exactly
//! once with the fixed action set bound, and returns the decision message.
//! Pure with respect to local state: the loop controller appends the
//! result, not this step.

use codecritic_core::error::ProviderError;
use codecritic_core::message::{Conversation, Message};
use codecritic_core::provider::{ActionDefinition, Provider, ProviderRequest};
use std::sync::Arc;
use tracing::{debug, info};

/// The decision step over a reasoning provider.
pub struct DecisionStep {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    definitions: Vec<ActionDefinition>,
}

impl DecisionStep {
    /// Create a decision step binding `definitions` as the only actions the
    /// model may request.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        definitions: Vec<ActionDefinition>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            definitions,
        }
    }

    /// Set the maximum tokens per decision response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Obtain the next decision. The returned message either carries action
    /// requests or is the final report.
    pub async fn decide(&self, conversation: &Conversation) -> Result<Message, ProviderError> {
        info!(model = %self.model, "Reviewer is thinking");

        let request = ProviderRequest {
            model: self.model.clone(),
            messages: conversation.messages.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            actions: self.definitions.clone(),
        };

        let response = self.provider.complete(request).await?;

        debug!(
            requested = response.message.action_requests.len(),
            "Reviewer made a decision"
        );

        Ok(response.message)
    }
}
