use agora_types::{CommentId, ConversationId, LikeId, PhotoId, PostId};

/// A resource as addressed by a request path: the leaf entity plus every
/// container the caller claimed on the way down. The engine verifies the
/// claimed containment; it never trusts the path.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Post { post: PostId },
    Comment { post: PostId, comment: CommentId },
    Like { post: PostId, like: LikeId },
    Photo { post: PostId, photo: PhotoId },
    Conversation { conversation: ConversationId },
    Message { conversation: ConversationId, message: String },
}
