//! Detect-errors action — static analysis pass via the analyst model.

use async_trait::async_trait;
use codecritic_core::action::{Action, ActionResult};
use codecritic_core::error::ActionError;

use crate::analyst::{AnalystClient, code_argument};

const SYSTEM_PROMPT: &str = "You are an expert code analyst. Your task is to identify \
    potential bugs, syntax errors, and style violations in the provided code. Focus on \
    correctness and adherence to established style conventions. Provide your findings as \
    a JSON object with a key 'issues' containing a list of strings, where each string is \
    a specific issue found.";

/// Analyzes the code for bugs and style violations.
pub struct DetectErrorsAction {
    client: AnalystClient,
}

impl DetectErrorsAction {
    pub fn new(client: AnalystClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Action for DetectErrorsAction {
    fn name(&self) -> &str {
        crate::CHECK_FOR_COMMON_ERRORS
    }

    fn description(&self) -> &str {
        "Analyzes the code to identify common errors, bugs, and style violations. \
         Use this tool to perform a static analysis of the code. \
         Returns a JSON string with a list of identified issues."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "code": {
                    "type": "string",
                    "description": "The code content to analyze"
                }
            },
            "required": ["code"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ActionResult, ActionError> {
        let code = code_argument(&arguments)?;
        let user_prompt = format!("Please analyze the following code:\n\n```\n{code}\n```");

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
