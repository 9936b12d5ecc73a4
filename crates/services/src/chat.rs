use bson::oid::ObjectId;
use mongodb::Database;
use thiserror::Error;

use pawcare_db::models::{ChatMessage, ChatRole};

use crate::dao::base::DaoError;
use crate::dao::chat::{ChatContact, ChatDao, ConversationSummary};
use crate::dao::PaginatedResult;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Invalid participant id")]
    InvalidParticipantId,

    #[error("Direct chat must be between a user and a provider")]
    SameRolePairing,

    #[error("Message content is required")]
    EmptyContent,

    #[error(transparent)]
    Dao(#[from] DaoError),
}

/// Validation boundary in front of the chat store. Every input is checked
/// here before any collection is touched, so a rejected request leaves no
/// trace in the database.
pub struct ChatService {
    pub dao: ChatDao,
}

impl ChatService {
    pub fn new(db: &Database) -> Self {
        Self {
            dao: ChatDao::new(db),
        }
    }

    pub async fn create_message(
        &self,
        sender_id: ObjectId,
        sender_role: ChatRole,
        participant_id: &str,
        participant_role: ChatRole,
        content: &str,
    ) -> Result<ChatMessage, ChatError> {
        let receiver_id = parse_participant_id(participant_id)?;
        if participant_role == sender_role {
            return Err(ChatError::SameRolePairing);
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(ChatError::EmptyContent);
        }

        let message = self
            .dao
            .create_message(
                content.to_string(),
                sender_id,
                sender_role,
                receiver_id,
                participant_role,
            )
            .await?;
        Ok(message)
    }

    pub async fn find_conversation_messages(
        &self,
        current_id: ObjectId,
        current_role: ChatRole,
        participant_id: &str,
        participant_role: ChatRole,
        page: u64,
        limit: u64,
    ) -> Result<PaginatedResult<ChatMessage>, ChatError> {
        let participant_id = parse_participant_id(participant_id)?;
        if participant_role == current_role {
            return Err(ChatError::SameRolePairing);
        }

        let messages = self
            .dao
            .find_conversation_messages(
                current_id,
                current_role,
                participant_id,
                participant_role,
                page,
                limit,
            )
            .await?;
        Ok(messages)
    }

    pub async fn find_conversations(
        &self,
        current_id: ObjectId,
        current_role: ChatRole,
        page: u64,
        limit: u64,
    ) -> Result<PaginatedResult<ConversationSummary>, ChatError> {
        let conversations = self
            .dao
            .find_conversations(current_id, current_role, page, limit)
            .await?;
        Ok(conversations)
    }

    pub async fn find_contacts(
        &self,
        current_id: ObjectId,
        current_role: ChatRole,
    ) -> Result<Vec<ChatContact>, ChatError> {
        let contacts = self.dao.find_contacts(current_id, current_role).await?;
        Ok(contacts)
    }
}

fn parse_participant_id(raw: &str) -> Result<ObjectId, ChatError> {
    ObjectId::parse_str(raw).map_err(|_| ChatError::InvalidParticipantId)
}
