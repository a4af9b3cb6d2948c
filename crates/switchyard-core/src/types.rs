//! Workflow data model: decisions, requests, audit steps and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of classification, or an internal workflow signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// Evaluate an arithmetic expression
    MathAgent,
    /// Answer from the documentation index
    KnowledgeAgent,
    /// Reject: the query is not English or Portuguese
    UnsupportedLanguage,
    /// Reply with the generic failure message
    Error,
    /// Internal signal for the conversion stage; never produced by the router
    ResponseConversion,
}

impl Decision {
    /// Labels the classifier may emit, in match priority order
    pub const CLASSIFIER_LABELS: [Decision; 4] = [
        Decision::MathAgent,
        Decision::KnowledgeAgent,
        Decision::UnsupportedLanguage,
        Decision::Error,
    ];

    /// Canonical label
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::MathAgent => "MathAgent",
            Decision::KnowledgeAgent => "KnowledgeAgent",
            Decision::UnsupportedLanguage => "UnsupportedLanguage",
            Decision::Error => "Error",
            Decision::ResponseConversion => "ResponseConversion",
        }
    }

    /// Exact label lookup; `None` for anything unrecognised
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "MathAgent" => Some(Decision::MathAgent),
            "KnowledgeAgent" => Some(Decision::KnowledgeAgent),
            "UnsupportedLanguage" => Some(Decision::UnsupportedLanguage),
            "Error" => Some(Decision::Error),
            "ResponseConversion" => Some(Decision::ResponseConversion),
            _ => None,
        }
    }

    /// Whether this agent's output gets a conversational rewrite
    #[must_use]
    pub fn is_convertible(&self) -> bool {
        matches!(self, Decision::MathAgent)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decision::from_label(s).ok_or_else(|| format!("unknown decision: {s}"))
    }
}

/// Incoming chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Raw user text
    pub message: String,
    /// Caller identity
    pub user_id: String,
    /// Conversation the message belongs to
    pub conversation_id: String,
}

impl ChatRequest {
    /// Build a request
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        user_id: impl Into<String>,
        conversation_id: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            user_id: user_id.into(),
            conversation_id: conversation_id.into(),
        }
    }
}

/// One audit record per executed stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStep {
    /// Agent or component that ran
    pub agent: String,
    /// What it did
    pub action: String,
    /// Outcome
    pub result: String,
}

impl WorkflowStep {
    /// Build a step
    #[must_use]
    pub fn new(
        agent: impl Into<String>,
        action: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            agent: agent.into(),
            action: action.into(),
            result: result.into(),
        }
    }
}

/// Workflow result returned to the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Echoed caller identity
    pub user_id: String,
    /// Echoed conversation id
    pub conversation_id: String,
    /// Label of the routing decision
    pub router_decision: String,
    /// Final, possibly converted, reply
    pub response: String,
    /// Reply of the selected agent before conversion
    pub source_agent_response: String,
    /// Ordered audit trail (route, process, convert)
    pub workflow_history: Vec<WorkflowStep>,
}

/// One persisted conversation turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    /// When the turn was stored
    pub timestamp: DateTime<Utc>,
    /// Caller identity
    pub user_id: String,
    /// User text (sanitised)
    pub user_message: String,
    /// Agent reply before conversion
    pub agent_response: String,
    /// Decision label that produced the reply
    pub agent: String,
}

/// History read model for a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationHistory {
    /// Conversation id
    pub conversation_id: String,
    /// Number of stored turns
    pub message_count: usize,
    /// Turns, oldest first
    pub history: Vec<ConversationRecord>,
}

impl ConversationHistory {
    /// History with no turns
    #[must_use]
    pub fn empty(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            message_count: 0,
            history: Vec::new(),
        }
    }
}

/// Conversation index read model for a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConversations {
    /// User id
    pub user_id: String,
    /// Number of conversations
    pub conversation_count: usize,
    /// Conversation ids, ascending
    pub conversation_ids: Vec<String>,
}

impl UserConversations {
    /// Build from ids, sorting them ascending
    #[must_use]
    pub fn new(user_id: impl Into<String>, mut conversation_ids: Vec<String>) -> Self {
        conversation_ids.sort();
        Self {
            user_id: user_id.into(),
            conversation_count: conversation_ids.len(),
            conversation_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_labels_roundtrip() {
        for decision in [
            Decision::MathAgent,
            Decision::KnowledgeAgent,
            Decision::UnsupportedLanguage,
            Decision::Error,
            Decision::ResponseConversion,
        ] {
            assert_eq!(Decision::from_label(decision.as_str()), Some(decision));
        }
        assert_eq!(Decision::from_label("mathagent"), None);
        assert!("Calculator".parse::<Decision>().is_err());
    }

    #[test]
    fn test_decision_serializes_as_label() {
        let json = serde_json::to_string(&Decision::KnowledgeAgent).unwrap();
        assert_eq!(json, "\"KnowledgeAgent\"");
    }

    #[test]
    fn test_only_math_is_convertible() {
        assert!(Decision::MathAgent.is_convertible());
        assert!(!Decision::KnowledgeAgent.is_convertible());
        assert!(!Decision::UnsupportedLanguage.is_convertible());
    }

    #[test]
    fn test_user_conversations_sorted() {
        let uc = UserConversations::new("u1", vec!["c3".into(), "c1".into(), "c2".into()]);
        assert_eq!(uc.conversation_ids, vec!["c1", "c2", "c3"]);
        assert_eq!(uc.conversation_count, 3);
    }

    #[test]
    fn test_chat_response_json_field_names() {
        let response = ChatResponse {
            user_id: "u1".into(),
            conversation_id: "c1".into(),
            router_decision: "MathAgent".into(),
            response: "The answer is 4.".into(),
            source_agent_response: "4".into(),
            workflow_history: vec![WorkflowStep::new("RouterAgent", "route_query", "MathAgent")],
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["workflow_history"][0]["agent"], "RouterAgent");
        assert_eq!(value["source_agent_response"], "4");
    }
}
