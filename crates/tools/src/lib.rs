//! The built-in review actions for codecritic.
//!
//! Five actions cover the whole review sequence: read the code file, run
//! the three analyses (errors, quality, improvements), and synthesize the
//! final summary. The three analysis actions each make one call to the
//! analyst model; reading and summarizing are local.

pub mod analyst;
pub mod assess_quality;
pub mod detect_errors;
pub mod read_code;
pub mod suggest_improvements;
pub mod summary;

use codecritic_core::action::ActionRegistry;
use codecritic_core::provider::Provider;
use std::sync::Arc;

use crate::analyst::AnalystClient;

/// The fixed action-name set the decision model may request.
pub const READ_CODE_FILE: &str = "read_code_file";
pub const CHECK_FOR_COMMON_ERRORS: &str = "check_for_common_errors";
pub const ASSESS_CODE_QUALITY: &str = "assess_code_quality";
pub const SUGGEST_IMPROVEMENTS: &str = "suggest_improvements";
pub const GENERATE_REVIEW_SUMMARY: &str = "generate_review_summary";

/// Create the review registry with all five actions.
///
/// `provider`, `model` and `temperature` configure the analyst tier used by
/// the three analysis actions; the other two actions are purely local.
pub fn review_registry(
    provider: Arc<dyn Provider>,
    model: impl Into<String>,
    temperature: f32,
) -> ActionRegistry {
    let client = AnalystClient::new(provider, model, temperature);

    let mut registry = ActionRegistry::new();
    registry.register(Box::new(read_code::ReadCodeAction));
    registry.register(Box::new(detect_errors::DetectErrorsAction::new(
        client.clone(),
    )));
    registry.register(Box::new(assess_quality::AssessQualityAction::new(
        client.clone(),
    )));
    registry.register(Box::new(
        suggest_improvements::SuggestImprovementsAction::new(client),
    ));
    registry.register(Box::new(summary::GenerateSummaryAction));
    registry
}

#[cfg(test)]
pub(crate) mod test_util;
