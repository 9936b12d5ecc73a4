use std::fmt;

use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Which side of the marketplace an identity belongs to. User and provider
/// ids live in separate collections, so `(id, role)` is the atomic identity
/// everywhere; `id` alone is ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Provider,
}

impl ChatRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Provider => "provider",
        }
    }

    /// Direct chat is strictly cross-role, so the counterparty role is
    /// always the opposite one.
    pub fn opposite(self) -> Self {
        match self {
            ChatRole::User => ChatRole::Provider,
            ChatRole::Provider => ChatRole::User,
        }
    }

    /// Parses the role string carried in access tokens.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(ChatRole::User),
            "provider" => Some(ChatRole::Provider),
            _ => None,
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only: a message is never edited or deleted once inserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub content: String,
    pub sender_id: ObjectId,
    pub sender_role: ChatRole,
    pub receiver_id: ObjectId,
    pub receiver_role: ChatRole,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl ChatMessage {
    pub const COLLECTION: &'static str = "chat_messages";
}
