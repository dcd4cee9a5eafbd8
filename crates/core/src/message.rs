//! Message and Conversation domain types.
//!
//! These are the value objects the loop controller owns for the duration of
//! a run: the seed instruction goes in, decision messages and action results
//! are appended, and the last no-request decision carries the final report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a review conversation (one run).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The seed instruction (and nothing else at this scale)
    User,
    /// The reasoning component's decisions
    Assistant,
    /// System prompts for the analyst calls
    System,
    /// An action execution result
    Action,
}

/// A request for one action invocation, embedded in a decision message.
///
/// Produced only by the decision step; matched back to its result by `id`.
/// Arguments are kept as the JSON string the wire delivers; the executor
/// parses them when the action runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRequest {
    /// Unique call ID pairing this request to its result
    pub id: String,

    /// Name of the action to invoke
    pub name: String,

    /// Arguments as a JSON object string
    pub arguments: String,
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Action requests carried by a decision message (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub action_requests: Vec<ActionRequest>,

    /// If this is an action result, the call id it answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_of: Option<String>,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    /// Create a new assistant (decision) message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    /// Create an action result message answering `call_id`.
    pub fn action_result(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        let mut msg = Self::with_role(Role::Action, content);
        msg.result_of = Some(call_id.into());
        msg
    }

    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            action_requests: Vec::new(),
            result_of: None,
            timestamp: Utc::now(),
        }
    }

    /// Whether this message asks for any actions to be executed.
    pub fn requests_actions(&self) -> bool {
        !self.action_requests.is_empty()
    }
}

/// An append-only ordered sequence of messages for a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation ID
    pub id: ConversationId,

    /// Ordered messages
    pub messages: Vec<Message>,

    /// When this conversation was created
    pub created_at: DateTime<Utc>,

    /// When the last message was added
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new empty conversation.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::new(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a conversation seeded with a single user instruction.
    pub fn seeded(instructions: impl Into<String>) -> Self {
        let mut conv = Self::new();
        conv.push(Message::user(instructions));
        conv
    }

    /// Add a message to the conversation.
    pub fn push(&mut self, message: Message) {
        self.updated_at = Utc::now();
        self.messages.push(message);
    }

    /// Index of the most recent message that carries action requests.
    pub fn last_request_index(&self) -> Option<usize> {
        self.messages.iter().rposition(Message::requests_actions)
    }

    /// Get the total token count estimate (rough: 4 chars ≈ 1 token).
    pub fn estimated_tokens(&self) -> usize {
        self.messages.iter().map(|m| m.content.len() / 4).sum()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
