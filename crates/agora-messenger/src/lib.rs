//! The conversation model: mirrored side-records in the relational store,
//! message bodies in the document store, and the service that keeps the two
//! honest across the gap no transaction covers.

pub mod ports;
pub mod service;

pub use ports::{ConversationInsertError, ConversationStore, MessageStore};
pub use service::MessengerService;
