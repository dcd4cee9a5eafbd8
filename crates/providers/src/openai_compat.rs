//! OpenAI-compatible provider implementation.
//!
//! Works with: Groq, OpenAI, Ollama, vLLM, and any other endpoint exposing
//! an OpenAI-compatible `/v1/chat/completions` route. Supports chat
//! completions with tool use, which is how the decision model requests
//! review actions.

use async_trait::async_trait;
use codecritic_core::error::ProviderError;
use codecritic_core::message::{ActionRequest, Message, Role};
use codecritic_core::provider::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// An OpenAI-compatible model provider.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a new OpenAI-compatible provider.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Create a Groq provider (convenience constructor).
    pub fn groq(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Self::new("groq", "https://api.groq.com/openai/v1", api_key)
    }

    /// Create an OpenAI provider (convenience constructor).
    pub fn openai(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Self::new("openai", "https://api.openai.com/v1", api_key)
    }

    /// Convert our Message types to OpenAI API format.
    fn to_api_messages(messages: &[Message]) -> Vec<ApiMessage> {
        messages
            .iter()
            .map(|m| ApiMessage {
                role: match m.role {
                    Role::User => "user".into(),
                    Role::Assistant => "assistant".into(),
                    Role::System => "system".into(),
                    Role::Action => "tool".into(),
                },
                content: Some(m.content.clone()),
                tool_calls: if m.action_requests.is_empty() {
                    None
                } else {
                    Some(
                        m.action_requests
                            .iter()
                            .map(|ar| ApiToolCall {
                                id: ar.id.clone(),
                                r#type: "function".into(),
                                function: ApiFunction {
                                    name: ar.name.clone(),
                                    arguments: ar.arguments.clone(),
                                },
                            })
                            .collect(),
                    )
                },
                tool_call_id: m.result_of.clone(),
            })
            .collect()
    }

    /// Convert action definitions to OpenAI API tool format.
    fn to_api_tools(actions: &[ActionDefinition]) -> Vec<ApiToolDefinition> {
        actions
            .iter()
            .map(|a| ApiToolDefinition {
                r#type: "function".into(),
                function: ApiToolFunction {
                    name: a.name.clone(),
                    description: a.description.clone(),
                    parameters: a.parameters.clone(),
                },
            })
            .collect()
    }
}

#[async_trait]
impl codecritic_core::Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": Self::to_api_messages(&request.messages),
            "temperature": request.temperature,
            "stream": false,
        });

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        if !request.actions.is_empty() {
            body["tools"] = serde_json::json!(Self::to_api_tools(&request.actions));
        }

        debug!(provider = %self.name, model = %request.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        let choice =
            api_response
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| ProviderError::ApiError {
                    status_code: 200,
                    message: "No choices in response".into(),
                })?;

        let action_requests: Vec<ActionRequest> = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ActionRequest {
                id: tc.id,
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        let mut message = Message::assistant(choice.message.content.unwrap_or_default());
        message.action_requests = action_requests;

        let usage = api_response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(ProviderResponse {
            message,
            usage,
            model: api_response.model,
        })
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ApiToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolCall {
    id: String,
    r#type: String,
    function: ApiFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolDefinition {
    r#type: String,
    function: ApiToolFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    model: String,
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use codecritic_core::Provider;

    #[test]
    fn groq_constructor() {
        let provider = OpenAiCompatProvider::groq("gsk-test").unwrap();
        assert_eq!(provider.name(), "groq");
        assert!(provider.base_url.contains("api.groq.com"));
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let provider =
            OpenAiCompatProvider::new("local", "http://localhost:11434/v1/", "key").unwrap();
        assert_eq!(provider.base_url, "http://localhost:11434/v1");
    }

    #[test]
    fn message_conversion() {
        let messages = vec![
            Message::system("You are an expert code analyst"),
            Message::user("Please analyze the following code"),
        ];
        let api_messages = OpenAiCompatProvider::to_api_messages(&messages);
        assert_eq!(api_messages.len(), 2);
        assert_eq!(api_messages[0].role, "system");
        assert_eq!(api_messages[1].role, "user");
    }

    #[test]
    fn message_conversion_with_action_requests() {
        let mut msg = Message::assistant("");
        msg.action_requests = vec![ActionRequest {
            id: "call_1".into(),
            name: "read_code_file".into(),
            arguments: r#"{"file_path":"sample.py"}"#.into(),
        }];
        let api_msgs = OpenAiCompatProvider::to_api_messages(&[msg]);
        assert_eq!(api_msgs.len(), 1);
        let tc = api_msgs[0].tool_calls.as_ref().unwrap();
        assert_eq!(tc.len(), 1);
        assert_eq!(tc[0].function.name, "read_code_file");
        assert_eq!(tc[0].r#type, "function");
    }

    #[test]
    fn message_conversion_action_result() {
        let msg = Message::action_result("call_1", "def fibonaci(n): ...");
        let api_msgs = OpenAiCompatProvider::to_api_messages(&[msg]);
        assert_eq!(api_msgs[0].role, "tool");
        assert_eq!(api_msgs[0].tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn action_definition_conversion() {
        let actions = vec![ActionDefinition {
            name: "assess_code_quality".into(),
            description: "Assess overall code quality".into(),
            parameters: serde_json::json!({"type": "object"}),
        }];
        let api_tools = OpenAiCompatProvider::to_api_tools(&actions);
        assert_eq!(api_tools.len(), 1);
        assert_eq!(api_tools[0].function.name, "assess_code_quality");
        assert_eq!(api_tools[0].r#type, "function");
    }

    #[test]
    fn parse_completion_with_tool_calls() {
        let data = r#"{
            "model": "llama3-70b-8192",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {
                            "name": "read_code_file",
                            "arguments": "{\"file_path\": \"sample.py\"}"
                        }
                    }]
                }
            }],
            "usage": {"prompt_tokens": 120, "completion_tokens": 24, "total_tokens": 144}
        }"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        assert_eq!(parsed.model, "llama3-70b-8192");
        let tc = parsed.choices[0].message.tool_calls.as_ref().unwrap();
        assert_eq!(tc[0].id, "call_abc");
        assert_eq!(tc[0].function.name, "read_code_file");
        assert_eq!(parsed.usage.as_ref().unwrap().total_tokens, 144);
    }

    #[test]
    fn parse_completion_text_only() {
        let data = r##"{
            "model": "llama3-70b-8192",
            "choices": [{
                "message": {"role": "assistant", "content": "# Code Review Summary"}
            }],
            "usage": null
        }"##;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        assert!(parsed.choices[0].message.tool_calls.is_none());
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("# Code Review Summary")
        );
    }
}
