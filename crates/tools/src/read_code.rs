//! Read-code action — loads the file under review.

use async_trait::async_trait;
use codecritic_core::action::{Action, ActionResult};
use codecritic_core::error::ActionError;

/// Reads the content of the code file the review targets.
///
/// A missing file is an expected failure mode: the result text is a
/// sentinel the decision model can react to, not an error.
pub struct ReadCodeAction;

#[async_trait]
impl Action for ReadCodeAction {
    fn name(&self) -> &str {
        crate::READ_CODE_FILE
    }

    fn description(&self) -> &str {
        "Reads the content of a code file from the given file path. \
         This should be the first step in the code review process."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "The path to the code file to be reviewed"
                }
            },
            "required": ["file_path"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ActionResult, ActionError> {
        let path = arguments["file_path"]
            .as_str()
            .ok_or_else(|| ActionError::InvalidArguments("Missing 'file_path' argument".into()))?;

        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(ActionResult {
                call_id: String::new(),
                success: true,
                output: content,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ActionResult {
                call_id: String::new(),
                success: false,
                output: format!("Error: The file at {path} was not found."),
            }),
            Err(e) => Ok(ActionResult {
                call_id: String::new(),
                success: false,
                output: format!("An error occurred while reading the file: {e}"),
            }),
        }
    }
}
