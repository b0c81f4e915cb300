use chrono::{DateTime, Utc};

use super::identity::UserId;

/// Local handle to a remote chat thread. Creating one performs no network call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThreadRef {
    id: String,
}

impl ThreadRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatThread {
    pub id: String,
    pub topic: String,
    pub created_on: Option<DateTime<Utc>>,
}

impl ChatThread {
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn handle(&self) -> ThreadRef {
        ThreadRef::new(self.id.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadMember {
    pub user_id: UserId,
    pub display_name: String,
}

/// One entry of the thread listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadSummary {
    pub id: String,
    pub topic: String,
    pub last_message_received_on: Option<DateTime<Utc>>,
    pub deleted_on: Option<DateTime<Utc>>,
}
