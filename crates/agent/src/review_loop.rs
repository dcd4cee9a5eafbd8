//! The loop controller — a four-state machine driving one review run.
//!
//! States: `Deciding`, `Acting`, `Routing`, `Done`. One run owns its
//! conversation and its slots; nothing is shared across runs. The loop
//! terminates when a decision carries no action requests (that text is the
//! final report) or aborts on a provider failure, an unmatched request, or
//! the iteration limit.

use codecritic_core::action::{ActionCall, ActionRegistry};
use codecritic_core::error::{Error, OrchestrationError};
use codecritic_core::event::{EventBus, ReviewEvent};
use codecritic_core::message::{ActionRequest, Conversation, Message};
use codecritic_core::provider::Provider;
use codecritic_tools::GENERATE_REVIEW_SUMMARY;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::decision::DecisionStep;
use crate::router::ResultRouter;
use crate::slots::{ReviewSlots, Slot};

/// The states of one review run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting on the orchestrator model for the next decision
    Deciding,
    /// Executing the requested action batch
    Acting,
    /// Moving action results into shared state slots
    Routing,
    /// Terminal; the final report has been produced
    Done,
}

/// The result of a completed run.
#[derive(Debug)]
pub struct ReviewOutcome {
    /// The final report text (the last no-request decision)
    pub report: String,

    /// The shared state slots as the run left them
    pub slots: ReviewSlots,

    /// Decision iterations used
    pub iterations: u32,

    /// Total actions executed
    pub actions_executed: usize,
}

/// The review orchestration loop.
pub struct ReviewLoop {
    decision: DecisionStep,
    actions: Arc<ActionRegistry>,
    event_bus: Arc<EventBus>,
    max_iterations: u32,
}

impl ReviewLoop {
    /// Create a new review loop. The registry's definitions are bound into
    /// the decision step as the only actions the model may request.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        actions: Arc<ActionRegistry>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let decision = DecisionStep::new(provider, model, temperature, actions.definitions());
        Self {
            decision,
            actions,
            event_bus,
            max_iterations: 16,
        }
    }

    /// Set the maximum number of decision iterations.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set the maximum tokens per decision response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.decision = self.decision.with_max_tokens(max);
        self
    }

    /// Run one review to completion.
    ///
    /// Blocking from the caller's perspective: returns only when the run
    /// reaches `Done` or aborts. Progress is published on the event bus.
    pub async fn run(&self, seed_instructions: &str) -> Result<ReviewOutcome, Error> {
        let mut conversation = Conversation::seeded(seed_instructions);
        let mut slots = ReviewSlots::new();
        let mut phase = Phase::Deciding;
        let mut iterations = 0u32;
        let mut actions_executed = 0usize;
        let mut pending: Vec<ActionRequest> = Vec::new();
        let mut report = String::new();

        info!(conversation_id = %conversation.id, "Review run starting");

        loop {
            match phase {
                Phase::Deciding => {
                    if iterations >= self.max_iterations {
                        warn!(limit = self.max_iterations, "Decision limit reached");
                        return Err(OrchestrationError::IterationLimit {
                            limit: self.max_iterations,
                        }
                        .into());
                    }
                    iterations += 1;

                    let message = self.decision.decide(&conversation).await?;

                    self.event_bus.publish(ReviewEvent::DecisionMade {
                        iteration: iterations,
                        requested_actions: message.action_requests.len(),
                        timestamp: chrono::Utc::now(),
                    });

                    pending = message.action_requests.clone();
                    if pending.is_empty() {
                        report = message.content.clone();
                    }
                    let next = if pending.is_empty() {
                        Phase::Done
                    } else {
                        Phase::Acting
                    };
                    conversation.push(message);
                    phase = next;
                }

                Phase::Acting => {
                    for request in &pending {
                        let output = self.execute_request(request, &slots).await;
                        actions_executed += 1;
                        conversation.push(Message::action_result(&request.id, output));
                    }

                    verify_batch_matched(&conversation, &pending)?;
                    phase = Phase::Routing;
                }

                Phase::Routing => {
                    let outcome = ResultRouter::route(&mut conversation, &mut slots);
                    for write in &outcome.writes {
                        self.event_bus.publish(ReviewEvent::SlotFilled {
                            slot: write.slot.name().to_string(),
                            action: write.action.clone(),
                            timestamp: chrono::Utc::now(),
                        });
                    }
                    phase = Phase::Deciding;
                }

                Phase::Done => {
                    info!(
                        iterations,
                        actions_executed, "Review run completed"
                    );
                    self.event_bus.publish(ReviewEvent::ReviewCompleted {
                        iterations,
                        actions_executed,
                        timestamp: chrono::Utc::now(),
                    });
                    return Ok(ReviewOutcome {
                        report,
                        slots,
                        iterations,
                        actions_executed,
                    });
                }
            }
        }
    }

    /// Execute one action request and return the text to append as its
    /// result. Expected action-layer failures (unknown action, bad
    /// arguments, analyst transport errors) come back as `Error: ...` text
    /// the decision model can react to; they never abort the run.
    async fn execute_request(&self, request: &ActionRequest, slots: &ReviewSlots) -> String {
        let mut arguments: serde_json::Value =
            serde_json::from_str(&request.arguments).unwrap_or_default();

        if request.name == GENERATE_REVIEW_SUMMARY {
            resolve_summary_arguments(&mut arguments, slots);
        }

        let call = ActionCall {
            id: request.id.clone(),
            name: request.name.clone(),
            arguments,
        };

        debug!(action = %request.name, call_id = %request.id, "Executing action");

        let start = std::time::Instant::now();
        let result = self.actions.execute(&call).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(action_result) => {
                self.event_bus.publish(ReviewEvent::ActionExecuted {
                    action: request.name.clone(),
                    success: action_result.success,
                    duration_ms,
                    timestamp: chrono::Utc::now(),
                });
                action_result.output
            }
            Err(e) => {
                warn!(action = %request.name, error = %e, "Action execution failed");
                self.event_bus.publish(ReviewEvent::ActionExecuted {
                    action: request.name.clone(),
                    success: false,
                    duration_ms,
                    timestamp: chrono::Utc::now(),
                });
                format!("Error: {e}")
            }
        }
    }
}

/// Substitute slot contents for summary arguments the model could not
/// supply itself. After routing, the model only ever saw confirmation
/// tokens, so an absent, empty, or token-valued argument is resolved from
/// the corresponding slot.
fn resolve_summary_arguments(arguments: &mut serde_json::Value, slots: &ReviewSlots) {
    const KEYS: [(&str, Slot); 3] = [
        ("error_report", Slot::ErrorReport),
        ("quality_assessment", Slot::QualityAssessment),
        ("improvement_suggestions", Slot::ImprovementSuggestions),
    ];

    if !arguments.is_object() {
        *arguments = serde_json::json!({});
    }

    for (key, slot) in KEYS {
        let needs_slot = match arguments[key].as_str() {
            None => true,
            Some(text) => text.is_empty() || Slot::is_confirmation(text),
        };
        if needs_slot {
            if let Some(stored) = slots.get(slot) {
                debug!(key, slot = %slot, "Resolving summary argument from slot");
                arguments[key] = serde_json::Value::String(stored.to_string());
            }
        }
    }
}

/// Check the acting invariant: every request in the batch has a result with
/// a matching call id. An unmatched request is fatal, never ignored.
fn verify_batch_matched(
    conversation: &Conversation,
    requests: &[ActionRequest],
) -> Result<(), OrchestrationError> {
    let batch_index = conversation.last_request_index().unwrap_or(0);
    for request in requests {
        let matched = conversation.messages[batch_index..]
            .iter()
            .any(|m| m.result_of.as_deref() == Some(request.id.as_str()));
        if !matched {
            return Err(OrchestrationError::UnmatchedRequest {
                call_id: request.id.clone(),
                action: request.name.clone(),
            });
        }
    }
    Ok(())
}
