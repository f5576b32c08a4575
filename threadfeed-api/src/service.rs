use async_trait::async_trait;

use crate::{Comment, CommentId, Error, NewComment, PostId};

/// Remote side of the comment threads
///
/// Implemented over HTTP by the command-line client, and in-memory by the mock
/// server used in tests.
#[async_trait]
pub trait CommentService {
    /// All comments of a post, whatever their depth
    async fn fetch_comments(&self, post: &PostId) -> Result<Vec<Comment>, Error>;

    /// Replies in the subtree of `anchor`
    async fn fetch_replies(&self, anchor: &CommentId) -> Result<Vec<Comment>, Error>;

    /// Deep replies in the subtree of `anchor`
    async fn fetch_deep_replies(&self, anchor: &CommentId) -> Result<Vec<Comment>, Error>;

    async fn create_comment(&self, c: NewComment) -> Result<Comment, Error>;

    async fn delete_comment(&self, id: &CommentId) -> Result<(), Error>;
}
