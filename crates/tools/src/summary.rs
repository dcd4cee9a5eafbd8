//! Generate-summary action — synthesizes the three reports into markdown.
//!
//! This is the parsing boundary for the structured reports. A report that
//! fails to parse produces a textual "Error decoding" result so the
//! decision model can retry or explain, never a hard abort.

use async_trait::async_trait;
use codecritic_core::action::{Action, ActionResult};
use codecritic_core::error::ActionError;
use serde::Deserialize;

/// Synthesizes the error, quality, and suggestion reports into the final
/// markdown review summary.
pub struct GenerateSummaryAction;

#[derive(Debug, Default, Deserialize)]
struct ErrorReport {
    #[serde(default)]
    issues: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct QualityReport {
    #[serde(default)]
    readability: CategoryScore,
    #[serde(default)]
    maintainability: CategoryScore,
    #[serde(default)]
    efficiency: CategoryScore,
}

#[derive(Debug, Default, Deserialize)]
struct CategoryScore {
    score: Option<serde_json::Value>,
    justification: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SuggestionReport {
    #[serde(default)]
    suggestions: Vec<String>,
}

impl CategoryScore {
    fn score_text(&self) -> String {
        match &self.score {
            Some(serde_json::Value::Number(n)) => n.to_string(),
            Some(serde_json::Value::String(s)) => s.clone(),
            _ => "N/A".into(),
        }
    }

    fn justification_text(&self) -> &str {
        self.justification.as_deref().unwrap_or("")
    }
}

/// Parse the three serialized reports, failing on the first malformed one.
fn parse_reports(
    error_report: &str,
    quality_assessment: &str,
    improvement_suggestions: &str,
) -> Result<(ErrorReport, QualityReport, SuggestionReport), ActionError> {
    let errors: ErrorReport =
        serde_json::from_str(error_report).map_err(|e| ActionError::MalformedReport(e.to_string()))?;
    let quality: QualityReport = serde_json::from_str(quality_assessment)
        .map_err(|e| ActionError::MalformedReport(e.to_string()))?;
    let suggestions: SuggestionReport = serde_json::from_str(improvement_suggestions)
        .map_err(|e| ActionError::MalformedReport(e.to_string()))?;
    Ok((errors, quality, suggestions))
}

/// Build the final report in markdown format.
fn render_summary(
    errors: &ErrorReport,
    quality: &QualityReport,
    suggestions: &SuggestionReport,
) -> String {
    let mut summary = String::from("# Code Review Summary\n\n");

    summary.push_str("## 1. Code Quality Assessment\n");
    for (label, category) in [
        ("Readability", &quality.readability),
        ("Maintainability", &quality.maintainability),
        ("Efficiency", &quality.efficiency),
    ] {
        summary.push_str(&format!(
            "- **{label}:** {}/10 - *{}*\n",
            category.score_text(),
            category.justification_text()
        ));
    }
    summary.push('\n');

    summary.push_str("## 2. Issues and Bugs Found\n");
    if errors.issues.is_empty() {
        summary.push_str("- No major issues found.\n");
    } else {
        for issue in &errors.issues {
            summary.push_str(&format!("- {issue}\n"));
        }
    }
    summary.push('\n');

    summary.push_str("## 3. Suggested Improvements\n");
    if suggestions.suggestions.is_empty() {
        summary.push_str("- No specific improvements suggested.\n");
    } else {
        for suggestion in &suggestions.suggestions {
            summary.push_str(&format!("- {suggestion}\n"));
        }
    }

    summary
}

#[async_trait]
impl Action for GenerateSummaryAction {
    fn name(&self) -> &str {
        crate::GENERATE_REVIEW_SUMMARY
    }

    fn description(&self) -> &str {
        "Synthesizes all analysis reports into a final, structured code review summary. \
         This is the final step. Use this tool after all other analyses are complete. \
         The inputs should be the JSON string outputs from the other tools."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "error_report": {
                    "type": "string",
                    "description": "JSON output of check_for_common_errors"
                },
                "quality_assessment": {
                    "type": "string",
                    "description": "JSON output of assess_code_quality"
                },
                "improvement_suggestions": {
                    "type": "string",
                    "description": "JSON output of suggest_improvements"
                }
            },
            "required": ["error_report", "quality_assessment", "improvement_suggestions"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ActionResult, ActionError> {
        let mut inputs = Vec::with_capacity(3);
        for key in ["error_report", "quality_assessment", "improvement_suggestions"] {
            let value = arguments[key].as_str().ok_or_else(|| {
                ActionError::InvalidArguments(format!("Missing '{key}' argument"))
            })?;
            inputs.push(value.to_string());
        }

        match parse_reports(&inputs[0], &inputs[1], &inputs[2]) {
            Ok((errors, quality, suggestions)) => Ok(ActionResult {
                call_id: String::new(),
                success: true,
                output: render_summary(&errors, &quality, &suggestions),
            }),
            // Malformed reports stay inside the action boundary as text.
            Err(e @ ActionError::MalformedReport(_)) => Ok(ActionResult {
                call_id: String::new(),
                success: false,
                output: e.to_string(),
            }),
            Err(e) => Err(e),
        }
    }
}
