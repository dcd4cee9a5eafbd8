//! Suggest-improvements action — refactoring suggestions via the analyst model.

use async_trait::async_trait;
use codecritic_core::action::{Action, ActionResult};
use codecritic_core::error::ActionError;

use crate::analyst::{AnalystClient, code_argument};

const SYSTEM_PROMPT: &str = "You are a helpful coding assistant. Your goal is to provide \
    specific, actionable suggestions to improve the given code. Focus on refactoring for \
    clarity, performance, and simplicity. Provide your findings as a JSON object with a \
    key 'suggestions' containing a list of strings.";

/// Produces concrete refactoring suggestions for the code.
pub struct SuggestImprovementsAction {
    client: AnalystClient,
}

impl SuggestImprovementsAction {
    pub fn new(client: AnalystClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Action for SuggestImprovementsAction {
    fn name(&self) -> &str {
        crate::SUGGEST_IMPROVEMENTS
    }

    fn description(&self) -> &str {
        "Provides specific, actionable suggestions for improving and refactoring the \
         code. Use this tool to get concrete examples of how the code could be made \
         better. Returns a JSON object with a key 'suggestions' containing a list of \
         improvement descriptions."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "code": {
                    "type": "string",
                    "description": "The code content to improve"
                }
            },
            "required": ["code"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ActionResult, ActionError> {
        let code = code_argument(&arguments)?;
        let user_prompt =
            format!("Please provide improvement suggestions for this code:\n\n```\n{code}\n```");

        let report = self
            .client
            .analyze(self.name(), SYSTEM_PROMPT, user_prompt)
            .await?;

        Ok(ActionResult {
            call_id: String::new(),
            success: true,
            output: report,
        })
    }
}
