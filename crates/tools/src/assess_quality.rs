//! Assess-quality action — high-level quality scoring via the analyst model.

use async_trait::async_trait;
use codecritic_core::action::{Action, ActionResult};
use codecritic_core::error::ActionError;

use crate::analyst::{AnalystClient, code_argument};

const SYSTEM_PROMPT: &str = "You are a principal software engineer. Assess the provided \
    code for overall quality. Evaluate its readability, maintainability, and efficiency. \
    Provide a score from 1 (poor) to 10 (excellent) for each category, along with a brief \
    justification. Return the result as a JSON object.";

/// Assesses readability, maintainability, and efficiency of the code.
pub struct AssessQualityAction {
    client: AnalystClient,
}

impl AssessQualityAction {
    pub fn new(client: AnalystClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Action for AssessQualityAction {
    fn name(&self) -> &str {
        crate::ASSESS_CODE_QUALITY
    }

    fn description(&self) -> &str {
        "Assesses the overall quality of the code, focusing on readability, \
         maintainability, and efficiency. Use this tool to get a high-level assessment \
         of the code's architecture and design. Returns a JSON object with keys \
         'readability', 'maintainability', and 'efficiency', each with a score (1-10) \
         and a brief justification."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "code": {
                    "type": "string",
                    "description": "The code content to assess"
                }
            },
            "required": ["code"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ActionResult, ActionError> {
        let code = code_argument(&arguments)?;
        let user_prompt = format!("Please assess this code:\n\n```\n{code}\n```");

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::CannedProvider;
    use std::sync::Arc;

    #[tokio::test]
    async fn returns_analyst_report() {
        let report = r#"{"readability": {"score": 7, "justification": "clear loop"}}"#;
        let provider = Arc::new(CannedProvider::new(report));
        let action =
            AssessQualityAction::new(AnalystClient::new(provider, "llama3-70b-8192", 0.7));

        let result = action
            .execute(serde_json::json!({"code": "def fibonaci(n): ..."}))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.output, report);
    }

    #[test]
    fn action_definition() {
        let provider = Arc::new(CannedProvider::new("{}"));
        let action =
            AssessQualityAction::new(AnalystClient::new(provider, "llama3-70b-8192", 0.7));
        assert_eq!(action.name(), "assess_code_quality");
        assert_eq!(
            action.parameters_schema()["required"],
            serde_json::json!(["code"])
        );
    }
}
