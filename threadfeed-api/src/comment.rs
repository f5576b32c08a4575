use serde::{Deserialize, Deserializer, Serializer};

use crate::{Error, Time, UserDetails, UserId};

#[derive(
    Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(transparent)]
pub struct CommentId(pub String);

impl CommentId {
    pub fn stub() -> CommentId {
        CommentId(String::from("stub-comment"))
    }
}

impl std::fmt::Display for CommentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(
    Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(transparent)]
pub struct PostId(pub String);

impl PostId {
    pub fn stub() -> PostId {
        PostId(String::from("stub-post"))
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ImageRef {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub preview_url: String,
    #[serde(default)]
    pub blur: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct GifRef {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub preview_url: String,
}

/// A comment node, as returned by the server
///
/// Comments come as a flat list: the tree shape is only given by `reply_to`
/// and `depth_level`, both computed server-side.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub user_id: UserId,

    /// Parent comment, None for comments directly under the post
    #[serde(default, with = "reply_to_format")]
    pub reply_to: Option<CommentId>,

    pub content: String,

    /// 0 for top-level comments, parent's depth + 1 otherwise
    pub depth_level: u32,

    /// Total number of descendants on the server, not only direct children
    #[serde(default)]
    pub child_count: u32,

    #[serde(with = "time_format")]
    pub created_at: Time,

    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub mentioned_users: Vec<UserId>,

    #[serde(default, deserialize_with = "skip_nulls")]
    pub images: Vec<ImageRef>,
    #[serde(default, deserialize_with = "skip_nulls")]
    pub gifs: Vec<GifRef>,

    #[serde(default)]
    pub user_details: Option<UserDetails>,
}

impl Comment {
    pub fn stub(id: &str) -> Comment {
        Comment {
            id: CommentId(String::from(id)),
            post_id: PostId::stub(),
            user_id: UserId::stub(),
            reply_to: None,
            content: String::new(),
            depth_level: 0,
            child_count: 0,
            created_at: Time::default(),
            score: 0,
            status: String::new(),
            is_deleted: false,
            path: String::new(),
            mentioned_users: Vec::new(),
            images: Vec::new(),
            gifs: Vec::new(),
            user_details: None,
        }
    }

    /// Handle to use when mentioning the author, falling back to the raw user id
    pub fn author_handle(&self) -> &str {
        match &self.user_details {
            Some(u) if !u.user_handle.is_empty() => &u.user_handle,
            _ => &self.user_id.0,
        }
    }

    pub fn author_display_name(&self) -> &str {
        match &self.user_details {
            Some(u) if !u.display_name.is_empty() => &u.display_name,
            _ => self.author_handle(),
        }
    }

    pub fn has_media(&self) -> bool {
        !self.images.is_empty() || !self.gifs.is_empty()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewImage {
    pub id: String,
    pub url: String,
    pub preview_url: String,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewGif {
    pub url: String,
    pub slug: String,
    pub preview_url: String,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewComment {
    pub post_id: PostId,
    pub content: String,
    #[serde(default, with = "reply_to_format")]
    pub reply_to: Option<CommentId>,
    #[serde(default)]
    pub mentioned_users: Vec<UserId>,
    #[serde(default)]
    pub images: Vec<NewImage>,
    #[serde(default)]
    pub gifs: Vec<NewGif>,
}

impl NewComment {
    // See comments on other `validate` functions throughout threadfeed-api
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.post_id.0)?;
        if let Some(parent) = &self.reply_to {
            crate::validate_string(&parent.0)?;
        }
        for u in &self.mentioned_users {
            crate::validate_string(&u.0)?;
        }
        crate::validate_comment_content(self.content.trim())
    }
}

mod reply_to_format {
    use super::*;

    pub fn serialize<S: Serializer>(v: &Option<CommentId>, s: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(id) => s.serialize_str(&id.0),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<CommentId>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        Ok(raw.filter(|s| !s.is_empty()).map(CommentId))
    }
}

mod time_format {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::de::Error as _;

    use super::*;

    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum RawTime {
        Millis(i64),
        FloatMillis(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(t: &Time, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(t.timestamp_millis())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Time, D::Error> {
        let millis = match RawTime::deserialize(d)? {
            RawTime::Millis(ms) => ms,
            RawTime::FloatMillis(ms) => ms as i64,
            RawTime::Text(s) => {
                return DateTime::parse_from_rfc3339(&s)
                    .map(|t| t.with_timezone(&Utc))
                    .map_err(|e| D::Error::custom(format!("invalid timestamp {s:?}: {e}")))
            }
        };
        Utc.timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| D::Error::custom(format!("timestamp {millis} is out of range")))
    }
}

// The server sometimes sends `null` entries in media lists
fn skip_nulls<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items: Option<Vec<Option<T>>> = Option::deserialize(d)?;
    Ok(items.unwrap_or_default().into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;

    fn wire_comment() -> serde_json::Value {
        json!({
            "id": "c1",
            "post_id": "p1",
            "user_id": "u1",
            "reply_to": "",
            "content": "hello",
            "depth_level": 0,
            "child_count": 3,
            "created_at": 1700000000000i64,
            "score": 2,
            "status": "active",
            "is_deleted": false,
            "mentioned_users": ["u2"],
            "images": [null, {"url": "https://img", "preview_url": "https://img/p", "blur": false}],
            "gifs": null,
            "user_details": {"id": "u1", "user_handle": "alice", "display_name": "Alice"},
            "openai_thread_id": "ignored",
        })
    }

    #[test]
    fn parses_server_comment() {
        let c: Comment = serde_json::from_value(wire_comment()).unwrap();
        assert_eq!(c.id, CommentId(String::from("c1")));
        assert_eq!(c.reply_to, None);
        assert_eq!(c.child_count, 3);
        assert_eq!(c.created_at, Utc.timestamp_millis_opt(1700000000000).unwrap());
        assert_eq!(c.images.len(), 1);
        assert!(c.gifs.is_empty());
        assert!(c.has_media());
        assert_eq!(c.author_handle(), "alice");
        assert_eq!(c.author_display_name(), "Alice");
    }

    #[test]
    fn created_at_accepts_rfc3339() {
        let mut v = wire_comment();
        v["created_at"] = json!("2023-11-14T22:13:20Z");
        let c: Comment = serde_json::from_value(v).unwrap();
        assert_eq!(c.created_at, Utc.timestamp_millis_opt(1700000000000).unwrap());

        let mut v = wire_comment();
        v["created_at"] = json!("yesterday");
        assert!(serde_json::from_value::<Comment>(v).is_err());
    }

    #[test]
    fn reply_to_maps_empty_string_to_none() {
        let mut v = wire_comment();
        v["reply_to"] = json!("c0");
        let c: Comment = serde_json::from_value(v).unwrap();
        assert_eq!(c.reply_to, Some(CommentId(String::from("c0"))));

        let mut v = wire_comment();
        v.as_object_mut().unwrap().remove("reply_to");
        let c: Comment = serde_json::from_value(v).unwrap();
        assert_eq!(c.reply_to, None);
    }

    #[test]
    fn new_comment_sends_empty_reply_to() {
        let new = NewComment {
            post_id: PostId(String::from("p1")),
            content: String::from("hi"),
            reply_to: None,
            mentioned_users: vec![],
            images: vec![],
            gifs: vec![],
        };
        let v = serde_json::to_value(&new).unwrap();
        assert_eq!(v["reply_to"], json!(""));
        assert_eq!(v["images"], json!([]));
    }

    #[test]
    fn author_falls_back_to_user_id() {
        let c = Comment::stub("c");
        assert_eq!(c.author_handle(), "stub-user");
        assert_eq!(c.author_display_name(), "stub-user");
    }

    #[test]
    fn new_comment_validation_trims() {
        let mut new = NewComment {
            post_id: PostId::stub(),
            content: String::from("   "),
            reply_to: None,
            mentioned_users: vec![],
            images: vec![],
            gifs: vec![],
        };
        assert_eq!(new.validate(), Err(Error::EmptyContent));
        new.content = format!("  {}  ", "x".repeat(1000));
        assert_eq!(new.validate(), Ok(()));
    }
}
