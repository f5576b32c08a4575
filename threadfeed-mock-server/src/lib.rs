use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Duration;
use parking_lot::Mutex;
use threadfeed_api::{
    Comment, CommentId, CommentService, Error, GifRef, ImageRef, NewComment, PostId, Time, UserId,
};

/// Requests the mock server received, in order
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Call {
    FetchComments(PostId),
    FetchReplies(CommentId),
    FetchDeepReplies(CommentId),
    CreateComment(NewComment),
    DeleteComment(CommentId),
}

/// In-memory comment server
///
/// Depths and descendant counts are computed here, like a real server would.
/// The clock advances one second per created comment, so ordering is
/// deterministic.
pub struct MockServer(Mutex<State>);

struct State {
    comments: Vec<Comment>,
    next_id: usize,
    clock: Time,
    offline: bool,
    calls: Vec<Call>,
}

impl State {
    fn find(&self, id: &CommentId) -> Option<usize> {
        self.comments
            .iter()
            .position(|c| c.id == *id && !c.is_deleted)
    }

    fn fresh_id(&mut self) -> CommentId {
        loop {
            self.next_id += 1;
            let id = CommentId(format!("c{}", self.next_id));
            if self.comments.iter().all(|c| c.id != id) {
                return id;
            }
        }
    }

    /// Indices of all the loaded ancestors of comment number `i`, closest first
    fn ancestors(&self, i: usize) -> Vec<usize> {
        let mut res = Vec::new();
        let mut seen = HashSet::from([i]);
        let mut cur = i;
        while let Some(p) = self.comments[cur].reply_to.as_ref().and_then(|p| {
            self.comments.iter().position(|c| c.id == *p)
        }) {
            if !seen.insert(p) {
                break;
            }
            res.push(p);
            cur = p;
        }
        res
    }

    fn insert(&mut self, mut c: Comment, parent: Option<&CommentId>) -> Result<Comment, Error> {
        let parent = match parent {
            None => None,
            Some(p) => Some(self.find(p).ok_or_else(|| Error::CommentNotFound(p.clone()))?),
        };
        self.clock = self.clock + Duration::seconds(1);
        c.id = self.fresh_id();
        c.created_at = self.clock;
        c.reply_to = parent.map(|p| self.comments[p].id.clone());
        c.depth_level = parent.map(|p| self.comments[p].depth_level + 1).unwrap_or(0);
        c.path = match parent {
            Some(p) => format!("{}/{}", self.comments[p].path, c.id),
            None => c.id.0.clone(),
        };
        c.child_count = 0;
        self.comments.push(c);
        let i = self.comments.len() - 1;
        for a in self.ancestors(i) {
            self.comments[a].child_count += 1;
        }
        Ok(self.comments[i].clone())
    }

    fn check_online(&self) -> Result<(), Error> {
        match self.offline {
            true => Err(Error::Network(String::from("mock server is offline"))),
            false => Ok(()),
        }
    }

    /// All live comments under `anchor`, in insertion order
    fn subtree(&self, anchor: &CommentId) -> Result<Vec<Comment>, Error> {
        let anchor_idx = self
            .find(anchor)
            .ok_or_else(|| Error::CommentNotFound(anchor.clone()))?;
        Ok(self
            .comments
            .iter()
            .enumerate()
            .filter(|(i, c)| !c.is_deleted && self.ancestors(*i).contains(&anchor_idx))
            .map(|(_, c)| c.clone())
            .collect())
    }
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer::with_comments(Vec::new())
    }

    /// Serves the given comments as they are, without recomputing depths
    pub fn with_comments(comments: Vec<Comment>) -> MockServer {
        let clock = comments
            .iter()
            .map(|c| c.created_at)
            .max()
            .unwrap_or_default();
        MockServer(Mutex::new(State {
            comments,
            next_id: 0,
            clock,
            offline: false,
            calls: Vec::new(),
        }))
    }

    /// Makes every service call fail with a network error
    pub fn set_offline(&self, offline: bool) {
        self.0.lock().offline = offline;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().calls.clone()
    }

    /// Inserts a comment by the stub user, bypassing validation and the call log
    pub fn admin_insert(
        &self,
        post: &PostId,
        parent: Option<&CommentId>,
        content: &str,
    ) -> Result<Comment, Error> {
        let mut c = Comment::stub("");
        c.post_id = post.clone();
        c.content = String::from(content);
        self.0.lock().insert(c, parent)
    }

    /// Snapshot of everything stored, deleted comments included
    pub fn test_dump(&self) -> Vec<Comment> {
        self.0.lock().comments.clone()
    }
}

impl Default for MockServer {
    fn default() -> MockServer {
        MockServer::new()
    }
}

#[async_trait]
impl CommentService for MockServer {
    async fn fetch_comments(&self, post: &PostId) -> Result<Vec<Comment>, Error> {
        let mut s = self.0.lock();
        s.calls.push(Call::FetchComments(post.clone()));
        s.check_online()?;
        Ok(s.comments
            .iter()
            .filter(|c| c.post_id == *post && !c.is_deleted)
            .cloned()
            .collect())
    }

    async fn fetch_replies(&self, anchor: &CommentId) -> Result<Vec<Comment>, Error> {
        let mut s = self.0.lock();
        s.calls.push(Call::FetchReplies(anchor.clone()));
        s.check_online()?;
        s.subtree(anchor)
    }

    async fn fetch_deep_replies(&self, anchor: &CommentId) -> Result<Vec<Comment>, Error> {
        let mut s = self.0.lock();
        s.calls.push(Call::FetchDeepReplies(anchor.clone()));
        s.check_online()?;
        s.subtree(anchor)
    }

    async fn create_comment(&self, new: NewComment) -> Result<Comment, Error> {
        let mut s = self.0.lock();
        s.calls.push(Call::CreateComment(new.clone()));
        s.check_online()?;
        new.validate()?;
        let mut c = Comment::stub("");
        c.post_id = new.post_id;
        c.user_id = UserId::stub();
        c.content = String::from(new.content.trim());
        c.mentioned_users = new.mentioned_users;
        c.images = new
            .images
            .into_iter()
            .map(|i| ImageRef {
                url: Some(i.url),
                preview_url: i.preview_url,
                blur: false,
            })
            .collect();
        c.gifs = new
            .gifs
            .into_iter()
            .map(|g| GifRef {
                url: Some(g.url),
                slug: g.slug,
                preview_url: g.preview_url,
            })
            .collect();
        s.insert(c, new.reply_to.as_ref())
    }

    async fn delete_comment(&self, id: &CommentId) -> Result<(), Error> {
        let mut s = self.0.lock();
        s.calls.push(Call::DeleteComment(id.clone()));
        s.check_online()?;
        let i = s.find(id).ok_or_else(|| Error::CommentNotFound(id.clone()))?;
        s.comments[i].is_deleted = true;
        for a in s.ancestors(i) {
            let count = &mut s.comments[a].child_count;
            *count = count.saturating_sub(1);
        }
        Ok(())
    }
}
