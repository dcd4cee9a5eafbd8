//! Shared state slots for a single review run.
//!
//! Each slot holds one action's textual output so later steps can reuse it
//! after the conversation copy has been compacted to a confirmation token.
//! Slots are created empty at loop start, written by the result router, and
//! discarded when the run terminates.

use codecritic_tools::{
    ASSESS_CODE_QUALITY, CHECK_FOR_COMMON_ERRORS, GENERATE_REVIEW_SUMMARY, READ_CODE_FILE,
    SUGGEST_IMPROVEMENTS,
};
use serde::{Deserialize, Serialize};

/// The closed set of action kinds the loop knows about.
///
/// Anything else the model requests is an unknown action: it still executes
/// through the registry (which answers with an error text), and the router
/// passes its result through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    ReadCode,
    DetectErrors,
    AssessQuality,
    SuggestImprovements,
    Summarize,
}

impl ActionKind {
    /// Map an action name to its kind. `None` means unknown.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            READ_CODE_FILE => Some(Self::ReadCode),
            CHECK_FOR_COMMON_ERRORS => Some(Self::DetectErrors),
            ASSESS_CODE_QUALITY => Some(Self::AssessQuality),
            SUGGEST_IMPROVEMENTS => Some(Self::SuggestImprovements),
            GENERATE_REVIEW_SUMMARY => Some(Self::Summarize),
            _ => None,
        }
    }

    /// The slot this action's output lands in. The summary action has no
    /// slot: its output stays in the conversation for the final decision.
    pub fn slot(&self) -> Option<Slot> {
        match self {
            Self::ReadCode => Some(Slot::CodeContent),
            Self::DetectErrors => Some(Slot::ErrorReport),
            Self::AssessQuality => Some(Slot::QualityAssessment),
            Self::SuggestImprovements => Some(Slot::ImprovementSuggestions),
            Self::Summarize => None,
        }
    }
}

/// The fixed set of slot names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    CodeContent,
    ErrorReport,
    QualityAssessment,
    ImprovementSuggestions,
}

impl Slot {
    pub const ALL: [Slot; 4] = [
        Slot::CodeContent,
        Slot::ErrorReport,
        Slot::QualityAssessment,
        Slot::ImprovementSuggestions,
    ];

    /// The slot's name as it appears in state and events.
    pub fn name(&self) -> &'static str {
        match self {
            Slot::CodeContent => "code_content",
            Slot::ErrorReport => "error_report",
            Slot::QualityAssessment => "quality_assessment",
            Slot::ImprovementSuggestions => "improvement_suggestions",
        }
    }

    /// The short fixed confirmation token the router substitutes for the
    /// full result text in conversation history.
    pub fn confirmation(&self) -> &'static str {
        match self {
            Slot::CodeContent => "Code content stored in shared state.",
            Slot::ErrorReport => "Error report stored in shared state.",
            Slot::QualityAssessment => "Quality assessment stored in shared state.",
            Slot::ImprovementSuggestions => "Improvement suggestions stored in shared state.",
        }
    }

    /// Whether `text` is one of the confirmation tokens.
    pub fn is_confirmation(text: &str) -> bool {
        Self::ALL.iter().any(|s| s.confirmation() == text)
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The shared state of one review run: four optional text slots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewSlots {
    pub code_content: Option<String>,
    pub error_report: Option<String>,
    pub quality_assessment: Option<String>,
    pub improvement_suggestions: Option<String>,
}

impl ReviewSlots {
    /// Create the empty slot set for a new run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a slot.
    pub fn get(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::CodeContent => self.code_content.as_deref(),
            Slot::ErrorReport => self.error_report.as_deref(),
            Slot::QualityAssessment => self.quality_assessment.as_deref(),
            Slot::ImprovementSuggestions => self.improvement_suggestions.as_deref(),
        }
    }

    /// Write a slot. Overwrite is permitted but not expected in a
    /// well-formed run.
    pub fn set(&mut self, slot: Slot, value: String) {
        let target = match slot {
            Slot::CodeContent => &mut self.code_content,
            Slot::ErrorReport => &mut self.error_report,
            Slot::QualityAssessment => &mut self.quality_assessment,
            Slot::ImprovementSuggestions => &mut self.improvement_suggestions,
        };
        *target = Some(value);
    }

    /// Number of populated slots.
    pub fn filled_count(&self) -> usize {
        Slot::ALL.iter().filter(|s| self.get(**s).is_some()).count()
    }

    /// Whether every slot has been written.
    pub fn is_fully_populated(&self) -> bool {
        self.filled_count() == Slot::ALL.len()
    }

    /// Whether no slot has been written.
    pub fn is_empty(&self) -> bool {
        self.filled_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_kind_mapping() {
        assert_eq!(
            ActionKind::from_name("read_code_file"),
            Some(ActionKind::ReadCode)
        );
        assert_eq!(
            ActionKind::from_name("generate_review_summary"),
            Some(ActionKind::Summarize)
        );
        assert_eq!(ActionKind::from_name("launch_missiles"), None);
    }

    #[test]
    fn summary_action_has_no_slot() {
        assert_eq!(ActionKind::Summarize.slot(), None);
        assert_eq!(ActionKind::DetectErrors.slot(), Some(Slot::ErrorReport));
    }

    #[test]
    fn slots_start_empty() {
        let slots = ReviewSlots::new();
        assert!(slots.is_empty());
        assert!(!slots.is_fully_populated());
    }

    #[test]
    fn set_and_get() {
        let mut slots = ReviewSlots::new();
        slots.set(Slot::CodeContent, "def fibonaci(n): ...".into());
        assert_eq!(slots.get(Slot::CodeContent), Some("def fibonaci(n): ..."));
        assert_eq!(slots.filled_count(), 1);
    }

    #[test]
    fn fully_populated_after_all_four() {
        let mut slots = ReviewSlots::new();
        for slot in Slot::ALL {
            slots.set(slot, "text".into());
        }
        assert!(slots.is_fully_populated());
    }

    #[test]
    fn confirmation_tokens_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for slot in Slot::ALL {
            assert!(seen.insert(slot.confirmation()));
            assert!(Slot::is_confirmation(slot.confirmation()));
        }
        assert!(!Slot::is_confirmation("some action output"));
    }
}
