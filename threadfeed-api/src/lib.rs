use chrono::Utc;

pub type Time = chrono::DateTime<Utc>;

mod comment;
pub use comment::{Comment, CommentId, GifRef, ImageRef, NewComment, NewGif, NewImage, PostId};

mod error;
pub use error::Error;

mod post;
pub use post::NewPost;

mod service;
pub use service::CommentService;

mod user;
pub use user::{UserDetails, UserId};

/// Maximum length of a comment, in characters, after trimming
pub const MAX_COMMENT_LEN: usize = 1000;

/// Maximum length of a post's body, in characters
pub const MAX_POST_CONTENT_LEN: usize = 1800;

/// Maximum length of a post's title and body together, in characters
pub const MAX_POST_TOTAL_LEN: usize = 2000;

// The validate functions are used both client-side, to refuse sending content
// the server would reject, and by servers to refuse content from clients.

pub fn validate_string(s: &str) -> Result<(), Error> {
    if s.contains('\0') {
        return Err(Error::NullByteInString(String::from(s)));
    }
    Ok(())
}

/// Validates the (already trimmed) content of a comment
pub fn validate_comment_content(content: &str) -> Result<(), Error> {
    validate_string(content)?;
    if content.is_empty() {
        return Err(Error::EmptyContent);
    }
    let length = content.chars().count();
    if length > MAX_COMMENT_LEN {
        return Err(Error::ContentTooLong {
            length,
            max: MAX_COMMENT_LEN,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_content_bounds() {
        assert_eq!(validate_comment_content(""), Err(Error::EmptyContent));
        assert_eq!(validate_comment_content("hi"), Ok(()));
        assert_eq!(validate_comment_content(&"a".repeat(1000)), Ok(()));
        assert_eq!(
            validate_comment_content(&"a".repeat(1001)),
            Err(Error::ContentTooLong {
                length: 1001,
                max: 1000
            }),
        );
    }

    #[test]
    fn comment_content_counts_characters() {
        // 1000 multi-byte characters are still 1000 characters
        assert_eq!(validate_comment_content(&"é".repeat(1000)), Ok(()));
    }

    #[test]
    fn null_bytes_are_refused() {
        assert_eq!(
            validate_comment_content("a\0b"),
            Err(Error::NullByteInString(String::from("a\0b"))),
        );
    }
}
