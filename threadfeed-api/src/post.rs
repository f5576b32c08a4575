use crate::{Error, UserId, MAX_POST_CONTENT_LEN, MAX_POST_TOTAL_LEN};

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewPost {
    pub community_id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub mentioned_users: Vec<UserId>,
}

impl NewPost {
    /// Title and body must both be non-blank. The total is counted on the raw
    /// text, before trimming, as that is what the user sees in the form.
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.community_id)?;
        crate::validate_string(&self.title)?;
        crate::validate_string(&self.content)?;
        crate::validate_string(&self.link)?;
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(Error::EmptyContent);
        }
        let content_len = self.content.chars().count();
        if content_len > MAX_POST_CONTENT_LEN {
            return Err(Error::ContentTooLong {
                length: content_len,
                max: MAX_POST_CONTENT_LEN,
            });
        }
        let total_len = self.title.chars().count() + content_len;
        if total_len > MAX_POST_TOTAL_LEN {
            return Err(Error::ContentTooLong {
                length: total_len,
                max: MAX_POST_TOTAL_LEN,
            });
        }
        Ok(())
    }
}
