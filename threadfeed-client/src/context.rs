use crate::{
    api::{CommentId, PostId},
    Error, Tier,
};

/// What a comment screen is showing: a post, at one tier, under one anchor
///
/// Fields are private so that the anchor invariant (deeper tiers always have
/// one, the main tier never does) holds for every value.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ViewingContext {
    post: PostId,
    tier: Tier,
    anchor: Option<CommentId>,
}

impl ViewingContext {
    pub fn main(post: PostId) -> ViewingContext {
        ViewingContext {
            post,
            tier: Tier::Main,
            anchor: None,
        }
    }

    pub fn new(
        post: PostId,
        tier: Tier,
        anchor: Option<CommentId>,
    ) -> Result<ViewingContext, Error> {
        match (tier.needs_anchor(), &anchor) {
            (true, None) => Err(Error::InvalidContext(format!(
                "comment level {tier} requires a parent comment"
            ))),
            (false, Some(a)) => Err(Error::InvalidContext(format!(
                "comment level {tier} cannot be anchored under {a}"
            ))),
            _ => Ok(ViewingContext { post, tier, anchor }),
        }
    }

    /// Builds a context from navigation parameters
    ///
    /// A missing level means the main tier, but an unknown one is an error.
    pub fn from_params(
        post: &str,
        level: Option<&str>,
        parent: Option<&str>,
    ) -> Result<ViewingContext, Error> {
        let tier = match level {
            None => Tier::Main,
            Some(l) => l.parse()?,
        };
        let anchor = parent
            .filter(|p| !p.is_empty())
            .map(|p| CommentId(String::from(p)));
        ViewingContext::new(PostId(String::from(post)), tier, anchor)
    }

    /// Context reached by drilling down into `comment`
    pub fn drill_down(&self, comment: CommentId) -> ViewingContext {
        ViewingContext {
            post: self.post.clone(),
            tier: self.tier.next(),
            anchor: Some(comment),
        }
    }

    pub fn post(&self) -> &PostId {
        &self.post
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn anchor(&self) -> Option<&CommentId> {
        self.anchor.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_invariant() {
        let post = PostId::stub();
        assert!(ViewingContext::new(post.clone(), Tier::Main, None).is_ok());
        assert!(ViewingContext::new(post.clone(), Tier::Main, Some(CommentId::stub())).is_err());
        assert!(ViewingContext::new(post.clone(), Tier::Replies, None).is_err());
        assert!(ViewingContext::new(post.clone(), Tier::DeepReplies, None).is_err());
        assert!(ViewingContext::new(post, Tier::DeepReplies, Some(CommentId::stub())).is_ok());
    }

    #[test]
    fn params_default_to_main_and_reject_unknown() {
        let ctx = ViewingContext::from_params("p", None, None).unwrap();
        assert_eq!(ctx.tier(), Tier::Main);
        assert_eq!(ctx.anchor(), None);

        let ctx = ViewingContext::from_params("p", Some("replies"), Some("c4")).unwrap();
        assert_eq!(ctx.tier(), Tier::Replies);
        assert_eq!(ctx.anchor(), Some(&CommentId(String::from("c4"))));

        assert!(ViewingContext::from_params("p", Some("deeper"), Some("c4")).is_err());
        assert!(ViewingContext::from_params("p", Some("replies"), Some("")).is_err());
    }

    #[test]
    fn drill_down_advances_tier() {
        let main = ViewingContext::main(PostId::stub());
        let replies = main.drill_down(CommentId(String::from("c4")));
        assert_eq!(replies.tier(), Tier::Replies);
        assert_eq!(replies.post(), main.post());
        assert_eq!(replies.anchor(), Some(&CommentId(String::from("c4"))));

        let deep = replies.drill_down(CommentId(String::from("c8")));
        assert_eq!(deep.tier(), Tier::DeepReplies);
        assert_eq!(deep.drill_down(CommentId(String::from("c12"))).tier(), Tier::DeepReplies);
    }
}
