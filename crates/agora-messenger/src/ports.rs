use agora_types::{Conversation, ConversationId, Message, UserId};
use thiserror::Error;

/// Insert failure split out so a fired uniqueness constraint reaches the
/// service as a type, not as a string to sniff.
#[derive(Debug, Error)]
pub enum ConversationInsertError {
    #[error("conversation already exists for this pair")]
    AlreadyExists,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Side-record storage. `insert` writes exactly one side; pairing the two
/// sides of a conversation is the service's job, not the store's.
pub trait ConversationStore: Send + Sync {
    fn insert(
        &self,
        owner: UserId,
        recipient: UserId,
    ) -> Result<Conversation, ConversationInsertError>;

    fn find(&self, id: ConversationId) -> anyhow::Result<Option<Conversation>>;

    fn list_for_owner(&self, owner: UserId) -> anyhow::Result<Vec<Conversation>>;

    /// Returns whether a record was actually removed.
    fn delete(&self, id: ConversationId) -> anyhow::Result<bool>;
}

/// Message-body storage, keyed by the conversation side-record id. `list`
/// returns append order; presentation ordering is the service's concern.
pub trait MessageStore: Send + Sync {
    fn append(&self, message: &Message) -> anyhow::Result<()>;

    fn list(&self, conversation: ConversationId) -> anyhow::Result<Vec<Message>>;

    fn last_text(&self, conversation: ConversationId) -> anyhow::Result<Option<String>>;

    fn find(&self, conversation: ConversationId, message: &str)
    -> anyhow::Result<Option<Message>>;
}
