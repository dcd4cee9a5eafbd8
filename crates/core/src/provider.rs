//! Provider trait — the abstraction over the reasoning component.
//!
//! A Provider knows how to send a conversation to a model and get a
//! response back. The same trait serves both tiers of the system: the
//! orchestrator (decision step, with the action set bound) and the
//! lighter-weight analyst calls made from inside action bodies.

use crate::error::ProviderError;
use crate::message::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Configuration for a provider request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "llama3-70b-8192")
    pub model: String,

    /// The conversation messages
    pub messages: Vec<Message>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Actions the model may request. Empty for analyst calls; the fixed
    /// review set for decision calls.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ActionDefinition>,
}

fn default_temperature() -> f32 {
    0.0
}

/// An action definition sent to the model so it knows what it can request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDefinition {
    /// The action name
    pub name: String,

    /// Description of what the action does
    pub description: String,

    /// JSON Schema describing the action's parameters
    pub parameters: serde_json::Value,
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The generated message
    pub message: Message,

    /// Token usage statistics
    pub usage: Option<Usage>,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// Every model backend (Groq, OpenAI, a scripted mock) implements this.
/// The decision step and the analyst actions call `complete()` without
/// knowing which backend is in use.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "groq").
    fn name(&self) -> &str;

    /// Send a request and wait for the complete response.
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError>;
}
