use std::sync::Arc;

use crate::{
    api::{Comment, CommentService},
    Error, Tier, ViewingContext,
};

/// Fetches the comments of a viewing context, restricted to its tier
pub struct CommentFetcher<S> {
    service: Arc<S>,
}

impl<S> Clone for CommentFetcher<S> {
    fn clone(&self) -> Self {
        CommentFetcher {
            service: self.service.clone(),
        }
    }
}

impl<S: CommentService> CommentFetcher<S> {
    pub fn new(service: Arc<S>) -> CommentFetcher<S> {
        CommentFetcher { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Does not touch any screen: the caller decides what to do with the result
    pub async fn fetch(&self, ctx: &ViewingContext) -> Result<Vec<Comment>, Error> {
        let fetched = match (ctx.tier(), ctx.anchor()) {
            (Tier::Main, _) => self.service.fetch_comments(ctx.post()).await,
            (Tier::Replies, Some(anchor)) => self.service.fetch_replies(anchor).await,
            (Tier::DeepReplies, Some(anchor)) => self.service.fetch_deep_replies(anchor).await,
            (tier, None) => {
                return Err(Error::InvalidContext(format!(
                    "comment level {tier} has no parent comment"
                )))
            }
        };
        let fetched = fetched.map_err(Error::Fetch)?;
        Ok(filter_to_tier(fetched, ctx.tier()))
    }
}

/// Keeps only the comments whose depth is in the tier's band
///
/// The tier-specific endpoints are expected to already scope by depth, but the
/// tree may have grown between the server computing depths and answering.
pub fn filter_to_tier(comments: Vec<Comment>, tier: Tier) -> Vec<Comment> {
    let band = tier.info().depth_band;
    let total = comments.len();
    let res = comments
        .into_iter()
        .filter(|c| band.contains(&c.depth_level))
        .collect::<Vec<_>>();
    if res.len() != total {
        tracing::debug!(
            %tier,
            dropped = total - res.len(),
            "dropped fetched comments outside of the tier's depth band"
        );
    }
    res
}

#[cfg(test)]
mod tests {
    use threadfeed_mock_server::{Call, MockServer};

    use super::*;
    use crate::api::{CommentId, PostId};

    fn at_depth(id: &str, depth: u32) -> Comment {
        let mut c = Comment::stub(id);
        c.depth_level = depth;
        c
    }

    #[test]
    fn filters_main_band() {
        let comments = [3, 5, 7, 9]
            .into_iter()
            .map(|d| at_depth(&format!("c{d}"), d))
            .collect();
        let kept = filter_to_tier(comments, Tier::Main);
        assert_eq!(
            kept.iter().map(|c| c.depth_level).collect::<Vec<_>>(),
            vec![3]
        );
    }

    #[test]
    fn filters_band_edges() {
        let comments = || (0..=14).map(|d| at_depth(&format!("c{d}"), d)).collect();
        let depths = |tier| {
            filter_to_tier(comments(), tier)
                .iter()
                .map(|c| c.depth_level)
                .collect::<Vec<_>>()
        };
        assert_eq!(depths(Tier::Main), vec![0, 1, 2, 3, 4]);
        assert_eq!(depths(Tier::Replies), vec![5, 6, 7, 8]);
        assert_eq!(depths(Tier::DeepReplies), vec![9, 10, 11, 12]);
    }

    /// Builds a single chain of replies of the given length, returning their ids
    fn chain(server: &MockServer, post: &PostId, len: usize) -> Vec<CommentId> {
        let mut ids: Vec<CommentId> = Vec::new();
        for i in 0..len {
            let c = server
                .admin_insert(post, ids.last(), &format!("depth {i}"))
                .expect("inserting comment");
            ids.push(c.id);
        }
        ids
    }

    #[tokio::test]
    async fn picks_endpoint_by_tier() {
        let server = Arc::new(MockServer::new());
        let post = PostId(String::from("p1"));
        let ids = chain(&server, &post, 14);
        let fetcher = CommentFetcher::new(server.clone());

        let main = ViewingContext::main(post.clone());
        let got = fetcher.fetch(&main).await.unwrap();
        assert_eq!(got.len(), 5);
        assert!(got.iter().all(|c| c.depth_level <= 4));

        let replies = main.drill_down(ids[4].clone());
        let got = fetcher.fetch(&replies).await.unwrap();
        assert_eq!(
            got.iter().map(|c| c.depth_level).collect::<Vec<_>>(),
            vec![5, 6, 7, 8]
        );

        let deep = replies.drill_down(ids[8].clone());
        let got = fetcher.fetch(&deep).await.unwrap();
        assert_eq!(
            got.iter().map(|c| c.depth_level).collect::<Vec<_>>(),
            vec![9, 10, 11, 12]
        );

        assert_eq!(
            server.calls(),
            vec![
                Call::FetchComments(post),
                Call::FetchReplies(ids[4].clone()),
                Call::FetchDeepReplies(ids[8].clone()),
            ]
        );
    }

    #[tokio::test]
    async fn reports_fetch_failure() {
        let server = Arc::new(MockServer::new());
        server.set_offline(true);
        let fetcher = CommentFetcher::new(server);
        let res = fetcher.fetch(&ViewingContext::main(PostId::stub())).await;
        assert!(matches!(res, Err(Error::Fetch(_))));
    }
}
