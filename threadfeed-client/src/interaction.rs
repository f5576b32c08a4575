use std::collections::HashSet;

use crate::api::{Comment, CommentId, UserId};

/// Comments whose descendants the user chose to hide
///
/// Only ids are stored: visibility is recomputed from the loaded comments on
/// every render, so nothing here needs to know about the tree.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CollapseSet(HashSet<CommentId>);

impl CollapseSet {
    pub fn new() -> CollapseSet {
        CollapseSet(HashSet::new())
    }

    /// Returns whether `id` is now collapsed
    pub fn toggle(&mut self, id: &CommentId) -> bool {
        if self.0.remove(id) {
            false
        } else {
            self.0.insert(id.clone());
            true
        }
    }

    pub fn contains(&self, id: &CommentId) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// What the composer is currently writing
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ReplyDraft {
    replying_to: Option<CommentId>,
    mentioned_users: Vec<UserId>,
    text: String,
}

impl ReplyDraft {
    pub fn new() -> ReplyDraft {
        ReplyDraft::default()
    }

    /// Targets `comment`, mentioning its author
    ///
    /// Only one user is mentioned at a time: starting a reply to another
    /// comment replaces both the target and the mention.
    pub fn start_reply(&mut self, comment: &Comment) {
        self.replying_to = Some(comment.id.clone());
        self.mentioned_users = vec![comment.user_id.clone()];
        self.text = format!("@{} ", comment.author_handle());
    }

    pub fn cancel(&mut self) {
        *self = ReplyDraft::default();
    }

    pub fn set_text(&mut self, text: String) {
        self.text = text;
    }

    pub fn replying_to(&self) -> Option<&CommentId> {
        self.replying_to.as_ref()
    }

    pub fn mentioned_users(&self) -> &[UserId] {
        &self.mentioned_users
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_reply(&self) -> bool {
        self.replying_to.is_some()
    }
}
