use chrono::{DateTime, Utc};

use super::identity::UserId;

const SYSTEM_SENDER_LABEL: &str = "system";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessagePriority {
    #[default]
    Normal,
}

impl MessagePriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
        }
    }
}

/// Kind of a message as reported by the chat service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Html,
    TopicUpdated,
    ParticipantAdded,
    ParticipantRemoved,
    Other(String),
}

impl MessageKind {
    pub fn from_wire(value: &str) -> Self {
        match value {
            "text" => Self::Text,
            "html" => Self::Html,
            "topicUpdated" => Self::TopicUpdated,
            "participantAdded" => Self::ParticipantAdded,
            "participantRemoved" => Self::ParticipantRemoved,
            other => Self::Other(other.to_owned()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: String,
    pub kind: MessageKind,
    /// Absent for messages generated by the service itself.
    pub sender_id: Option<UserId>,
    pub sender_display_name: Option<String>,
    pub content: String,
    pub created_on: Option<DateTime<Utc>>,
}

impl ChatMessage {
    pub fn sender_label(&self) -> &str {
        self.sender_id
            .as_ref()
            .map(UserId::as_str)
            .unwrap_or(SYSTEM_SENDER_LABEL)
    }
}

/// A message about to be sent to a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub content: String,
    pub priority: MessagePriority,
    pub sender_display_name: Option<String>,
}
