//! Ownership-chain authorization for Agora.
//!
//! Every guarded operation maps to one entry in a fixed predicate catalogue.
//! A predicate walks the containment chain of the addressed resource (post →
//! comment, conversation → message, …) through read-only lookup ports and
//! compares owner ids level by level. There is no policy language and no rule
//! storage; the catalogue is code.

pub mod engine;
pub mod ports;
pub mod resource;

pub use engine::{ChainOutcome, ChainOwners, Engine};
pub use ports::{
    CommentRef, ConversationRef, LikeRef, MessageLookup, MessageRef, OwnershipLookup, PhotoRef,
    PostRef,
};
pub use resource::Resource;
