//! Seed instructions for a review run.

use codecritic_tools::{
    ASSESS_CODE_QUALITY, CHECK_FOR_COMMON_ERRORS, GENERATE_REVIEW_SUMMARY, READ_CODE_FILE,
    SUGGEST_IMPROVEMENTS,
};

/// Build the seed instructions that kick off a review of `file_path`.
///
/// The steps are strictly ordered; the orchestrator model is told to finish
/// each one before moving on and to call the summary action last, feeding it
/// the outputs of the three analyses.
pub fn seed_instructions(file_path: &str) -> String {
    format!(
        "You are a senior developer performing a code review. Follow these steps strictly \
         and sequentially. Do not move to the next step until the previous one is complete.\n\
         1. **Read the code:** Use the `{READ_CODE_FILE}` tool to get the content of the file.\n\
         2. **Analyze for Errors:** Take the code content from step 1 and use the \
         `{CHECK_FOR_COMMON_ERRORS}` tool to find any bugs.\n\
         3. **Assess Quality:** Take the code content from step 1 and use the \
         `{ASSESS_CODE_QUALITY}` tool.\n\
         4. **Suggest Improvements:** Take the code content from step 1 and use the \
         `{SUGGEST_IMPROVEMENTS}` tool.\n\
         5. **Synthesize Final Report:** Once you have the results from steps 2, 3, and 4, \
         and ONLY then, call the `{GENERATE_REVIEW_SUMMARY}` tool. You MUST provide the \
         outputs from the previous steps as arguments for `error_report`, \
         `quality_assessment`, and `improvement_suggestions`.\n\n\
         Begin the review for the file located at: {file_path}"
    )
}
