use crate::{
    api::{self, Comment, CommentId, CommentService, NewComment},
    Error, ReplyDraft, ViewingContext,
};

/// Builds the comment to send from the composer's draft
///
/// Content is trimmed before validation, and nothing is sent if it fails.
pub fn prepare(ctx: &ViewingContext, draft: &ReplyDraft) -> Result<NewComment, Error> {
    let content = draft.text().trim();
    api::validate_comment_content(content).map_err(Error::Validation)?;
    let new = NewComment {
        post_id: ctx.post().clone(),
        content: String::from(content),
        reply_to: draft.replying_to().cloned(),
        mentioned_users: draft.mentioned_users().to_vec(),
        images: Vec::new(),
        gifs: Vec::new(),
    };
    new.validate().map_err(Error::Validation)?;
    Ok(new)
}

pub async fn submit<S>(service: &S, new: NewComment) -> Result<Comment, Error>
where
    S: CommentService + ?Sized,
{
    service.create_comment(new).await.map_err(|e| {
        if e.is_validation() {
            Error::Validation(e)
        } else {
            Error::Submission(e)
        }
    })
}

pub async fn delete<S>(service: &S, id: &CommentId) -> Result<(), Error>
where
    S: CommentService + ?Sized,
{
    service.delete_comment(id).await.map_err(Error::Delete)
}

/// User-facing message for content that was refused
pub fn validation_message(err: &api::Error) -> String {
    match err {
        api::Error::EmptyContent => String::from("Please enter a comment"),
        api::Error::ContentTooLong { max, .. } => {
            format!("Comment is too long (max {max} characters)")
        }
        api::Error::NullByteInString(_) => String::from("Comment contains invalid characters"),
        _ => String::from("Failed to add comment"),
    }
}
