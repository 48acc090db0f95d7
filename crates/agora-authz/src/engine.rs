use std::sync::Arc;

use agora_types::{
    CommentId, ConversationId, DomainError, LikeId, PhotoId, PostId, Principal, UserId,
};

use crate::ports::{MessageLookup, OwnershipLookup};
use crate::resource::Resource;

/// Owner ids collected while walking a resolved chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainOwners {
    /// Owner of the root container (post or conversation side-record).
    pub root: UserId,
    /// Username of the root owner; only posts carry it.
    pub root_username: Option<String>,
    /// Owner of the leaf entity, for leaves that have one (comments, likes).
    pub leaf: Option<UserId>,
}

/// Result of one chain walk. Walks stop at the first hop that fails, so a
/// foreign root reports before the leaf is ever read.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainOutcome {
    Resolved(ChainOwners),
    /// Root exists but is not owned by the claimed owner.
    RootForeign,
    /// A hop was missing or not contained where the path claimed; carries the
    /// name of the level that failed.
    Gone(&'static str),
}

/// The predicate catalogue. One instance is shared by every request; lookups
/// go through injected read-only ports so tests can count and fail them.
#[derive(Clone)]
pub struct Engine {
    lookup: Arc<dyn OwnershipLookup>,
    messages: Arc<dyn MessageLookup>,
}

impl Engine {
    pub fn new(lookup: Arc<dyn OwnershipLookup>, messages: Arc<dyn MessageLookup>) -> Self {
        Self { lookup, messages }
    }

    /// Walk the containment chain of `resource`, verifying each claimed hop.
    ///
    /// With `claimed` set, the root must be owned by that id; `None` skips the
    /// ownership comparison and checks existence and containment only (the
    /// administrator traversal). Hops are sequential: the walk returns at the
    /// first failing level without touching the ones below it.
    pub fn owner_chain(
        &self,
        claimed: Option<UserId>,
        resource: &Resource,
    ) -> anyhow::Result<ChainOutcome> {
        match resource {
            Resource::Post { post } => {
                let Some(root) = self.lookup.post_ref(*post)? else {
                    return Ok(ChainOutcome::Gone("post"));
                };
                if claimed.is_some_and(|c| c != root.owner_id) {
                    return Ok(ChainOutcome::RootForeign);
                }
                Ok(ChainOutcome::Resolved(ChainOwners {
                    root: root.owner_id,
                    root_username: Some(root.owner_username),
                    leaf: None,
                }))
            }
            Resource::Comment { post, comment } => {
                let owners = match self.owner_chain(claimed, &Resource::Post { post: *post })? {
                    ChainOutcome::Resolved(owners) => owners,
                    other => return Ok(other),
                };
                let Some(leaf) = self.lookup.comment_ref(*comment)? else {
                    return Ok(ChainOutcome::Gone("comment"));
                };
                if leaf.post_id != *post {
                    return Ok(ChainOutcome::Gone("comment"));
                }
                Ok(ChainOutcome::Resolved(ChainOwners {
                    leaf: Some(leaf.owner_id),
                    ..owners
                }))
            }
            Resource::Like { post, like } => {
                let owners = match self.owner_chain(claimed, &Resource::Post { post: *post })? {
                    ChainOutcome::Resolved(owners) => owners,
                    other => return Ok(other),
                };
                let Some(leaf) = self.lookup.like_ref(*like)? else {
                    return Ok(ChainOutcome::Gone("like"));
                };
                if leaf.post_id != *post {
                    return Ok(ChainOutcome::Gone("like"));
                }
                Ok(ChainOutcome::Resolved(ChainOwners {
                    leaf: Some(leaf.owner_id),
                    ..owners
                }))
            }
            Resource::Photo { post, photo } => {
                let owners = match self.owner_chain(claimed, &Resource::Post { post: *post })? {
                    ChainOutcome::Resolved(owners) => owners,
                    other => return Ok(other),
                };
                let Some(leaf) = self.lookup.photo_ref(*photo)? else {
                    return Ok(ChainOutcome::Gone("photo"));
                };
                if leaf.post_id != *post {
                    return Ok(ChainOutcome::Gone("photo"));
                }
                Ok(ChainOutcome::Resolved(owners))
            }
            Resource::Conversation { conversation } => {
                let Some(root) = self.lookup.conversation_ref(*conversation)? else {
                    return Ok(ChainOutcome::Gone("conversation"));
                };
                if claimed.is_some_and(|c| c != root.owner_id) {
                    return Ok(ChainOutcome::RootForeign);
                }
                Ok(ChainOutcome::Resolved(ChainOwners {
                    root: root.owner_id,
                    root_username: None,
                    leaf: None,
                }))
            }
            Resource::Message {
                conversation,
                message,
            } => {
                let owners = match self.owner_chain(
                    claimed,
                    &Resource::Conversation {
                        conversation: *conversation,
                    },
                )? {
                    ChainOutcome::Resolved(owners) => owners,
                    other => return Ok(other),
                };
                if self.messages.message_ref(*conversation, message)?.is_none() {
                    return Ok(ChainOutcome::Gone("message"));
                }
                Ok(ChainOutcome::Resolved(owners))
            }
        }
    }

    // -- Raw predicates --
    //
    // The building blocks, with no administrator bypass and no error
    // shaping. A missing or foreign hop is simply `false`.

    /// `post` exists and is owned by `claimed`.
    pub fn owns_post(&self, claimed: UserId, post: PostId) -> anyhow::Result<bool> {
        self.resolves(Some(claimed), &Resource::Post { post })
    }

    /// `comment` lives under `post`, which `claimed` owns.
    pub fn comment_in_post(
        &self,
        claimed: UserId,
        post: PostId,
        comment: CommentId,
    ) -> anyhow::Result<bool> {
        self.resolves(Some(claimed), &Resource::Comment { post, comment })
    }

    /// [`Self::comment_in_post`] and the comment was written by `author`.
    pub fn authored_comment_in_post(
        &self,
        author: UserId,
        claimed: UserId,
        post: PostId,
        comment: CommentId,
    ) -> anyhow::Result<bool> {
        match self.owner_chain(Some(claimed), &Resource::Comment { post, comment })? {
            ChainOutcome::Resolved(owners) => Ok(owners.leaf == Some(author)),
            _ => Ok(false),
        }
    }

    /// `like` lives under `post`, which `claimed` owns.
    pub fn like_in_post(
        &self,
        claimed: UserId,
        post: PostId,
        like: LikeId,
    ) -> anyhow::Result<bool> {
        self.resolves(Some(claimed), &Resource::Like { post, like })
    }

    /// [`Self::like_in_post`] and the like was placed by `placer`.
    pub fn placed_like_in_post(
        &self,
        placer: UserId,
        claimed: UserId,
        post: PostId,
        like: LikeId,
    ) -> anyhow::Result<bool> {
        match self.owner_chain(Some(claimed), &Resource::Like { post, like })? {
            ChainOutcome::Resolved(owners) => Ok(owners.leaf == Some(placer)),
            _ => Ok(false),
        }
    }

    /// `photo` lives under `post`, which `claimed` owns.
    pub fn photo_in_post(
        &self,
        claimed: UserId,
        post: PostId,
        photo: PhotoId,
    ) -> anyhow::Result<bool> {
        self.resolves(Some(claimed), &Resource::Photo { post, photo })
    }

    /// [`Self::photo_in_post`] and the post owner's username is `username`.
    /// Deliberately stricter than the id comparison the other predicates use.
    pub fn photo_deletable_by(
        &self,
        username: &str,
        claimed: UserId,
        post: PostId,
        photo: PhotoId,
    ) -> anyhow::Result<bool> {
        match self.owner_chain(Some(claimed), &Resource::Photo { post, photo })? {
            ChainOutcome::Resolved(owners) => Ok(owners.root_username.as_deref() == Some(username)),
            _ => Ok(false),
        }
    }

    /// `conversation` exists as `claimed`'s own side-record.
    pub fn owns_conversation(
        &self,
        claimed: UserId,
        conversation: ConversationId,
    ) -> anyhow::Result<bool> {
        self.resolves(Some(claimed), &Resource::Conversation { conversation })
    }

    /// [`Self::owns_conversation`] and `message` was written under that
    /// side-record's id.
    pub fn message_in_conversation(
        &self,
        claimed: UserId,
        conversation: ConversationId,
        message: &str,
    ) -> anyhow::Result<bool> {
        self.resolves(
            Some(claimed),
            &Resource::Message {
                conversation,
                message: message.to_owned(),
            },
        )
    }

    fn resolves(&self, claimed: Option<UserId>, resource: &Resource) -> anyhow::Result<bool> {
        Ok(matches!(
            self.owner_chain(claimed, resource)?,
            ChainOutcome::Resolved(_)
        ))
    }

    // -- Endpoint guards --
    //
    // One per guarded operation. Administrators bypass ownership but not
    // existence: a dead id is still reported to them, because they were
    // entitled to reach it. Everyone else gets the fixed denial, so guarded
    // ids never leak whether they exist.

    /// Creating or listing under `/users/{owner_id}/...`: self or admin.
    pub fn allow_owner_scope(&self, who: &Principal, owner_id: UserId) -> Result<(), DomainError> {
        if who.is_admin() || who.is_self(owner_id) {
            Ok(())
        } else {
            Err(DomainError::AccessDenied)
        }
    }

    pub fn allow_post(
        &self,
        who: &Principal,
        owner_id: UserId,
        post: PostId,
    ) -> Result<(), DomainError> {
        if who.is_admin() {
            return self.admit_existing(&Resource::Post { post });
        }
        self.admit(self.owns_post(owner_id, post)?)
    }

    pub fn allow_comment_view(
        &self,
        who: &Principal,
        owner_id: UserId,
        post: PostId,
        comment: CommentId,
    ) -> Result<(), DomainError> {
        if who.is_admin() {
            return self.admit_existing(&Resource::Comment { post, comment });
        }
        self.admit(self.comment_in_post(owner_id, post, comment)?)
    }

    pub fn allow_comment_mutation(
        &self,
        who: &Principal,
        owner_id: UserId,
        post: PostId,
        comment: CommentId,
    ) -> Result<(), DomainError> {
        if who.is_admin() {
            return self.admit_existing(&Resource::Comment { post, comment });
        }
        self.admit(self.authored_comment_in_post(who.id, owner_id, post, comment)?)
    }

    pub fn allow_like_view(
        &self,
        who: &Principal,
        owner_id: UserId,
        post: PostId,
        like: LikeId,
    ) -> Result<(), DomainError> {
        if who.is_admin() {
            return self.admit_existing(&Resource::Like { post, like });
        }
        self.admit(self.like_in_post(owner_id, post, like)?)
    }

    pub fn allow_like_mutation(
        &self,
        who: &Principal,
        owner_id: UserId,
        post: PostId,
        like: LikeId,
    ) -> Result<(), DomainError> {
        if who.is_admin() {
            return self.admit_existing(&Resource::Like { post, like });
        }
        self.admit(self.placed_like_in_post(who.id, owner_id, post, like)?)
    }

    pub fn allow_photo_view(
        &self,
        who: &Principal,
        owner_id: UserId,
        post: PostId,
        photo: PhotoId,
    ) -> Result<(), DomainError> {
        if who.is_admin() {
            return self.admit_existing(&Resource::Photo { post, photo });
        }
        self.admit(self.photo_in_post(owner_id, post, photo)?)
    }

    pub fn allow_photo_delete(
        &self,
        who: &Principal,
        owner_id: UserId,
        post: PostId,
        photo: PhotoId,
    ) -> Result<(), DomainError> {
        if who.is_admin() {
            return self.admit_existing(&Resource::Photo { post, photo });
        }
        self.admit(self.photo_deletable_by(&who.username, owner_id, post, photo)?)
    }

    /// Creating or listing conversations under `/users/{owner_id}/...`.
    /// Messengers are personal: no administrator bypass anywhere in this
    /// family.
    pub fn allow_messenger_scope(
        &self,
        who: &Principal,
        owner_id: UserId,
    ) -> Result<(), DomainError> {
        if who.is_self(owner_id) {
            Ok(())
        } else {
            Err(DomainError::AccessDenied)
        }
    }

    pub fn allow_conversation(
        &self,
        who: &Principal,
        owner_id: UserId,
        conversation: ConversationId,
    ) -> Result<(), DomainError> {
        self.allow_messenger_scope(who, owner_id)?;
        self.entitled_chain(owner_id, &Resource::Conversation { conversation })
    }

    pub fn allow_message(
        &self,
        who: &Principal,
        owner_id: UserId,
        conversation: ConversationId,
        message: &str,
    ) -> Result<(), DomainError> {
        self.allow_messenger_scope(who, owner_id)?;
        self.entitled_chain(
            owner_id,
            &Resource::Message {
                conversation,
                message: message.to_owned(),
            },
        )
    }

    /// Reading, updating or deleting a user row: self or admin.
    pub fn allow_user(&self, who: &Principal, target: UserId) -> Result<(), DomainError> {
        if who.is_admin() || who.is_self(target) {
            Ok(())
        } else {
            Err(DomainError::AccessDenied)
        }
    }

    /// Update addressed by username: the path must be the caller (or the
    /// caller is admin), and the body must repeat the path exactly.
    pub fn allow_user_by_username(
        &self,
        who: &Principal,
        path: &str,
        body: &str,
    ) -> Result<(), DomainError> {
        if !(who.is_admin() || who.username == path) {
            return Err(DomainError::AccessDenied);
        }
        if path != body {
            return Err(DomainError::AccessDenied);
        }
        Ok(())
    }

    /// Update addressed by email; same shape as the username variant.
    pub fn allow_user_by_email(
        &self,
        who: &Principal,
        path: &str,
        body: &str,
    ) -> Result<(), DomainError> {
        if !(who.is_admin() || who.email == path) {
            return Err(DomainError::AccessDenied);
        }
        if path != body {
            return Err(DomainError::AccessDenied);
        }
        Ok(())
    }

    fn admit(&self, allowed: bool) -> Result<(), DomainError> {
        if allowed {
            Ok(())
        } else {
            Err(DomainError::AccessDenied)
        }
    }

    // Admin path: ownership is bypassed, existence and containment are not.
    fn admit_existing(&self, resource: &Resource) -> Result<(), DomainError> {
        match self.owner_chain(None, resource)? {
            ChainOutcome::Gone(what) => Err(DomainError::not_found(format!("{what} not found"))),
            _ => Ok(()),
        }
    }

    // Caller already proved entitled to the scope, so a dead hop is reported
    // as missing rather than masked by the fixed denial.
    fn entitled_chain(&self, claimed: UserId, resource: &Resource) -> Result<(), DomainError> {
        match self.owner_chain(Some(claimed), resource)? {
            ChainOutcome::Resolved(_) => Ok(()),
            ChainOutcome::RootForeign => Err(DomainError::AccessDenied),
            ChainOutcome::Gone(what) => Err(DomainError::not_found(format!("{what} not found"))),
        }
    }
}
