use agora_types::{CommentId, ConversationId, LikeId, PhotoId, PostId, UserId};

/// Owner-bearing slice of a post row. The owning username rides along from a
/// single JOINed read because one predicate compares usernames, not ids.
#[derive(Debug, Clone, PartialEq)]
pub struct PostRef {
    pub id: PostId,
    pub owner_id: UserId,
    pub owner_username: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommentRef {
    pub id: CommentId,
    pub post_id: PostId,
    pub owner_id: UserId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LikeRef {
    pub id: LikeId,
    pub post_id: PostId,
    pub owner_id: UserId,
}

/// Photos carry no owner of their own; they belong to whoever owns the post.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoRef {
    pub id: PhotoId,
    pub post_id: PostId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversationRef {
    pub id: ConversationId,
    pub owner_id: UserId,
    pub recipient_id: UserId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageRef {
    pub id: String,
    pub conversation_id: ConversationId,
}

/// Read-only view of the relational graph the engine walks chains through.
pub trait OwnershipLookup: Send + Sync {
    fn post_ref(&self, id: PostId) -> anyhow::Result<Option<PostRef>>;
    fn comment_ref(&self, id: CommentId) -> anyhow::Result<Option<CommentRef>>;
    fn like_ref(&self, id: LikeId) -> anyhow::Result<Option<LikeRef>>;
    fn photo_ref(&self, id: PhotoId) -> anyhow::Result<Option<PhotoRef>>;
    fn conversation_ref(&self, id: ConversationId) -> anyhow::Result<Option<ConversationRef>>;
}

/// Resolves a message id within one conversation's document-store records.
pub trait MessageLookup: Send + Sync {
    fn message_ref(
        &self,
        conversation: ConversationId,
        message: &str,
    ) -> anyhow::Result<Option<MessageRef>>;
}
