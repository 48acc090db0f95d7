use std::sync::Arc;

use agora_types::api::RecipientRef;
use agora_types::{Conversation, ConversationId, DomainError, Message, UserId, UserLookup};
use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::ports::{ConversationInsertError, ConversationStore, MessageStore};

/// Conversation operations over the two stores. The relational store holds
/// the side-records, the document store holds the bodies, and every check
/// neither store can make across that gap lives here.
#[derive(Clone)]
pub struct MessengerService {
    conversations: Arc<dyn ConversationStore>,
    messages: Arc<dyn MessageStore>,
    users: Arc<dyn UserLookup>,
}

impl MessengerService {
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        messages: Arc<dyn MessageStore>,
        users: Arc<dyn UserLookup>,
    ) -> Self {
        Self {
            conversations,
            messages,
            users,
        }
    }

    /// Open a conversation from `owner` to the referenced recipient.
    ///
    /// Writes two side-records, one per participant, each naming the other as
    /// recipient. There is no transaction spanning the two inserts: if the
    /// mirror write fails, the first record is deleted again and the failure
    /// propagates, so no half-pair survives. A repeated start trips the
    /// `(owner, recipient)` uniqueness constraint on the first insert.
    pub fn start_conversation(
        &self,
        owner: UserId,
        recipient: &RecipientRef,
    ) -> Result<Conversation, DomainError> {
        let owner_user = self
            .users
            .by_id(owner)?
            .ok_or_else(|| DomainError::not_found("user not found"))?;
        let recipient_user = match recipient {
            RecipientRef::Id(id) => self.users.by_id(*id)?,
            RecipientRef::Username(name) => self.users.by_username(name)?,
        }
        .ok_or_else(|| DomainError::not_found("recipient not found"))?;
        if owner_user.id == recipient_user.id {
            return Err(DomainError::SameParticipant);
        }

        let own = self
            .conversations
            .insert(owner_user.id, recipient_user.id)
            .map_err(map_insert)?;
        if let Err(err) = self.conversations.insert(recipient_user.id, owner_user.id) {
            if let Err(cleanup) = self.conversations.delete(own.id) {
                warn!(
                    "failed to roll back conversation side-record {}: {cleanup:#}",
                    own.id
                );
            }
            return Err(map_insert(err));
        }
        Ok(own)
    }

    /// Only the caller's own side-records; the mirrors belong to the other
    /// participants.
    pub fn list_conversations(&self, owner: UserId) -> Result<Vec<Conversation>, DomainError> {
        Ok(self.conversations.list_for_owner(owner)?)
    }

    /// Remove one side-record. The mirror stays, so the other participant
    /// keeps their view and history; the deleted side's messages remain in
    /// the document store but are unreachable, because every message path
    /// starts from a live side-record.
    pub fn delete_conversation(&self, conversation: ConversationId) -> Result<(), DomainError> {
        if self.conversations.delete(conversation)? {
            Ok(())
        } else {
            Err(DomainError::not_found("conversation not found"))
        }
    }

    /// Append a message under a live side-record. The server assigns id and
    /// timestamp; the body is stored against this side's id only and never
    /// copied to the mirror.
    pub fn send_message(
        &self,
        conversation: ConversationId,
        text: &str,
    ) -> Result<Message, DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::validation("message text must not be blank"));
        }
        self.live(conversation)?;
        let message = Message {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation,
            text: text.to_owned(),
            timestamp: Utc::now(),
        };
        self.messages.append(&message)?;
        Ok(message)
    }

    /// Messages of one side-record, oldest first.
    pub fn list_messages(&self, conversation: ConversationId) -> Result<Vec<Message>, DomainError> {
        self.live(conversation)?;
        let mut messages = self.messages.list(conversation)?;
        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }

    /// Preview text of the newest message, if any.
    pub fn last_message(&self, conversation: ConversationId) -> Result<Option<String>, DomainError> {
        self.live(conversation)?;
        Ok(self.messages.last_text(conversation)?)
    }

    pub fn find_message(
        &self,
        conversation: ConversationId,
        message: &str,
    ) -> Result<Message, DomainError> {
        self.live(conversation)?;
        self.messages
            .find(conversation, message)?
            .ok_or_else(|| DomainError::not_found("message not found"))
    }

    // The document store cannot know whether a side-record is alive, so every
    // message path checks the relational side first. Orphaned bodies fail
    // here.
    fn live(&self, conversation: ConversationId) -> Result<Conversation, DomainError> {
        self.conversations
            .find(conversation)?
            .ok_or_else(|| DomainError::not_found("conversation not found"))
    }
}

fn map_insert(err: ConversationInsertError) -> DomainError {
    match err {
        ConversationInsertError::AlreadyExists => {
            DomainError::AlreadyExists("conversation with this recipient already exists".into())
        }
        ConversationInsertError::Store(e) => DomainError::Store(e),
    }
}
