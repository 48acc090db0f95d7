pub mod api;
pub mod error;
pub mod lookup;
pub mod models;

pub use error::DomainError;
pub use lookup::UserLookup;
pub use models::{
    Comment, CommentId, Conversation, ConversationId, Like, LikeId, Message, Photo, PhotoId, Post,
    PostId, Principal, Role, User, UserId,
};
