//! Action trait — the closed set of review capabilities.
//!
//! The decision model can only request actions from this fixed set
//! (read the code file, run the three analyses, synthesize the summary).
//! Each action declares its input contract as a JSON Schema so the
//! provider layer can bind the set when asking for a decision.

use crate::error::ActionError;
use crate::provider::ActionDefinition;
use async_trait::async_trait;
use std::collections::HashMap;

/// A request to execute one action, with parsed arguments.
#[derive(Debug, Clone)]
pub struct ActionCall {
    /// Unique call ID (matches the decision message's request id)
    pub id: String,

    /// Name of the action to execute
    pub name: String,

    /// Arguments as a JSON value
    pub arguments: serde_json::Value,
}

/// The result of an action execution.
#[derive(Debug, Clone)]
pub struct ActionResult {
    /// The call ID this result answers
    pub call_id: String,

    /// Whether the action completed as intended. A `false` result still
    /// carries usable text (e.g. the file-not-found sentinel) that the
    /// decision model is expected to react to.
    pub success: bool,

    /// The output text
    pub output: String,
}

/// The core Action trait.
///
/// Implementations live in the tools crate. The loop controller executes
/// actions through the registry and never calls implementations directly.
#[async_trait]
pub trait Action: Send + Sync {
    /// The unique name of this action (e.g., "read_code_file").
    fn name(&self) -> &str;

    /// A description of what this action does (sent to the decision model).
    fn description(&self) -> &str;

    /// JSON Schema describing this action's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the action with the given arguments.
    async fn execute(&self, arguments: serde_json::Value) -> Result<ActionResult, ActionError>;

    /// Convert this action into a definition for the decision model.
    fn to_definition(&self) -> ActionDefinition {
        ActionDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of available actions.
///
/// The loop controller uses this to:
/// 1. Get action definitions to bind into decision requests
/// 2. Look up and execute actions when the model requests them
pub struct ActionRegistry {
    actions: HashMap<String, Box<dyn Action>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Register an action. Replaces any existing action with the same name.
    pub fn register(&mut self, action: Box<dyn Action>) {
        let name = action.name().to_string();
        self.actions.insert(name, action);
    }

    /// Get an action by name.
    pub fn get(&self, name: &str) -> Option<&dyn Action> {
        self.actions.get(name).map(|a| a.as_ref())
    }

    /// Get all action definitions (for binding into decision requests).
    pub fn definitions(&self) -> Vec<ActionDefinition> {
        self.actions.values().map(|a| a.to_definition()).collect()
    }

    /// Execute an action call. The returned result always carries the
    /// call id of the request, whatever the action body set.
    pub async fn execute(&self, call: &ActionCall) -> Result<ActionResult, ActionError> {
        let action = self
            .actions
            .get(&call.name)
            .ok_or_else(|| ActionError::Unknown(call.name.clone()))?;
        let mut result = action.execute(call.arguments.clone()).await?;
        result.call_id = call.id.clone();
        Ok(result)
    }

    /// List all registered action names.
    pub fn names(&self) -> Vec<&str> {
        self.actions.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple test action for unit tests.
    struct EchoAction;

    #[async_trait]
    impl Action for EchoAction {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes back the input"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" }
                },
                "required": ["text"]
            })
        }
        async fn execute(
            &self,
            arguments: serde_json::Value,
        ) -> Result<ActionResult, ActionError> {
            let text = arguments["text"].as_str().unwrap_or("").to_string();
            Ok(ActionResult {
                call_id: String::new(),
                success: true,
                output: text,
            })
        }
    }

    #[test]
    fn registry_register_and_lookup() {
        let mut registry = ActionRegistry::new();
        registry.register(Box::new(EchoAction));
        assert!(registry.get("echo").is_some());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn registry_definitions() {
        let mut registry = ActionRegistry::new();
        registry.register(Box::new(EchoAction));
        let defs = registry.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "echo");
    }

    #[tokio::test]
    async fn registry_execute_sets_call_id() {
        let mut registry = ActionRegistry::new();
        registry.register(Box::new(EchoAction));

        let call = ActionCall {
            id: "call_1".into(),
            name: "echo".into(),
            arguments: serde_json::json!({"text": "hello world"}),
        };
        let result = registry.execute(&call).await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, "hello world");
        assert_eq!(result.call_id, "call_1");
    }

    #[tokio::test]
    async fn registry_execute_unknown_action() {
        let registry = ActionRegistry::new();
        let call = ActionCall {
            id: "call_1".into(),
            name: "nonexistent".into(),
            arguments: serde_json::json!({}),
        };
        let err = registry.execute(&call).await.unwrap_err();
        assert!(matches!(err, ActionError::Unknown(_)));
    }
}
