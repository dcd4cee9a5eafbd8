//! Result router — moves action outputs into shared state slots.
//!
//! After an acting phase, the conversation tail holds one result message
//! per requested action. The router matches each result back to its
//! originating request by call id (recovering the action name), writes the
//! body into the matching slot, and rewrites the stored conversation text
//! to a short confirmation token so history stays small.
//!
//! Unknown action names pass through unmodified. Re-routing an
//! already-routed conversation is a no-op.

use codecritic_core::message::Conversation;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::slots::{ActionKind, ReviewSlots, Slot};

/// One slot write performed during routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotWrite {
    pub slot: Slot,
    pub action: String,
}

/// The summary of one routing pass.
#[derive(Debug, Clone, Default)]
pub struct RoutingOutcome {
    pub writes: Vec<SlotWrite>,
}

impl RoutingOutcome {
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Routes the most recent batch of action results into `ReviewSlots`.
pub struct ResultRouter;

impl ResultRouter {
    /// Process every action result appended after the most recent
    /// request-carrying message.
    ///
    /// If no request-carrying message exists the router performs no work
    /// and returns an empty outcome; that is a defensive no-op, not a
    /// failure.
    pub fn route(conversation: &mut Conversation, slots: &mut ReviewSlots) -> RoutingOutcome {
        let Some(batch_index) = conversation.last_request_index() else {
            debug!("No action-requesting message found; nothing to route");
            return RoutingOutcome::default();
        };

        // call id -> action name, for the current batch only
        let names_by_id: HashMap<String, String> = conversation.messages[batch_index]
            .action_requests
            .iter()
            .map(|req| (req.id.clone(), req.name.clone()))
            .collect();

        let mut outcome = RoutingOutcome::default();

        for message in conversation.messages[batch_index + 1..].iter_mut() {
            let Some(call_id) = message.result_of.as_deref() else {
                continue;
            };
            let Some(action) = names_by_id.get(call_id) else {
                warn!(call_id, "Action result does not answer the current batch");
                continue;
            };
            let Some(slot) = ActionKind::from_name(action).and_then(|k| k.slot()) else {
                // Unknown action or the summary action: pass through.
                continue;
            };

            // Already routed: the stored text is the confirmation token.
            if message.content == slot.confirmation() {
                continue;
            }

            debug!(action, slot = %slot, "Routing action result into slot");
            slots.set(slot, std::mem::take(&mut message.content));
            message.content = slot.confirmation().to_string();
            outcome.writes.push(SlotWrite {
                slot,
                action: action.clone(),
            });
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codecritic_core::message::{ActionRequest, Message};

    fn request(id: &str, name: &str) -> ActionRequest {
        ActionRequest {
            id: id.into(),
            name: name.into(),
            arguments: "{}".into(),
        }
    }

    fn conversation_with_batch(
        requests: Vec<ActionRequest>,
        results: Vec<(&str, &str)>,
    ) -> Conversation {
        let mut conv = Conversation::seeded("seed");
        let mut decision = Message::assistant("");
        decision.action_requests = requests;
        conv.push(decision);
        for (call_id, output) in results {
            conv.push(Message::action_result(call_id, output));
        }
        conv
    }

    #[test]
    fn routes_result_into_slot_and_substitutes_confirmation() {
        let mut conv = conversation_with_batch(
            vec![request("call_1", "read_code_file")],
            vec![("call_1", "def fibonaci(n): ...")],
        );
        let mut slots = ReviewSlots::new();

        let outcome = ResultRouter::route(&mut conv, &mut slots);

        assert_eq!(outcome.writes.len(), 1);
        assert_eq!(outcome.writes[0].slot, Slot::CodeContent);
        assert_eq!(slots.get(Slot::CodeContent), Some("def fibonaci(n): ..."));
        assert_eq!(
            conv.messages.last().unwrap().content,
            Slot::CodeContent.confirmation()
        );
    }

    #[test]
    fn routes_whole_batch_by_call_id() {
        let mut conv = conversation_with_batch(
            vec![
                request("call_a", "check_for_common_errors"),
                request("call_b", "assess_code_quality"),
            ],
            // Results in reverse order: association is by call id, not position
            vec![
                ("call_b", r#"{"readability": {}}"#),
                ("call_a", r#"{"issues": []}"#),
            ],
        );
        let mut slots = ReviewSlots::new();

        let outcome = ResultRouter::route(&mut conv, &mut slots);

        assert_eq!(outcome.writes.len(), 2);
        assert_eq!(slots.get(Slot::ErrorReport), Some(r#"{"issues": []}"#));
        assert_eq!(
            slots.get(Slot::QualityAssessment),
            Some(r#"{"readability": {}}"#)
        );
    }

    #[test]
    fn routing_is_idempotent() {
        let mut conv = conversation_with_batch(
            vec![request("call_1", "suggest_improvements")],
            vec![("call_1", r#"{"suggestions": ["rename"]}"#)],
        );
        let mut slots = ReviewSlots::new();

        let first = ResultRouter::route(&mut conv, &mut slots);
        assert_eq!(first.writes.len(), 1);

        let second = ResultRouter::route(&mut conv, &mut slots);
        assert!(second.is_empty());
        // The slot still holds the original body, not the confirmation token
        assert_eq!(
            slots.get(Slot::ImprovementSuggestions),
            Some(r#"{"suggestions": ["rename"]}"#)
        );
    }

    #[test]
    fn unknown_action_passes_through() {
        let mut conv = conversation_with_batch(
            vec![request("call_1", "format_harddrive")],
            vec![("call_1", "Error: unknown action")],
        );
        let mut slots = ReviewSlots::new();

        let outcome = ResultRouter::route(&mut conv, &mut slots);

        assert!(outcome.is_empty());
        assert!(slots.is_empty());
        assert_eq!(conv.messages.last().unwrap().content, "Error: unknown action");
    }

    #[test]
    fn summary_result_passes_through() {
        let mut conv = conversation_with_batch(
            vec![request("call_1", "generate_review_summary")],
            vec![("call_1", "# Code Review Summary\n...")],
        );
        let mut slots = ReviewSlots::new();

        let outcome = ResultRouter::route(&mut conv, &mut slots);

        assert!(outcome.is_empty());
        assert_eq!(
            conv.messages.last().unwrap().content,
            "# Code Review Summary\n..."
        );
    }

    #[test]
    fn no_request_message_is_a_noop() {
        let mut conv = Conversation::seeded("seed");
        let mut slots = ReviewSlots::new();

        let outcome = ResultRouter::route(&mut conv, &mut slots);

        assert!(outcome.is_empty());
        assert!(slots.is_empty());
    }

    #[test]
    fn only_the_latest_batch_is_considered() {
        let mut conv = conversation_with_batch(
            vec![request("call_1", "read_code_file")],
            vec![("call_1", "content")],
        );
        let mut slots = ReviewSlots::new();
        ResultRouter::route(&mut conv, &mut slots);

        // A later batch with a different action
        let mut decision = Message::assistant("");
        decision.action_requests = vec![request("call_2", "check_for_common_errors")];
        conv.push(decision);
        conv.push(Message::action_result("call_2", r#"{"issues": []}"#));

        let outcome = ResultRouter::route(&mut conv, &mut slots);
        assert_eq!(outcome.writes.len(), 1);
        assert_eq!(outcome.writes[0].slot, Slot::ErrorReport);
        // First batch's slot is untouched
        assert_eq!(slots.get(Slot::CodeContent), Some("content"));
    }
}
