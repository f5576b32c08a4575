use std::fmt;

use uuid::Uuid;

use crate::{
    api::{Comment, CommentId},
    thread, CollapseSet, CommentView, Error, ReplyDraft, ViewingContext,
};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ScreenId(pub Uuid);

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadState {
    Initial,
    Loading,
    Loaded,
    Failed,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FetchKind {
    /// Nothing is displayed yet, failure leaves the screen empty
    Initial,

    /// Comments stay displayed while this runs, and on failure
    Refresh,
}

/// Identifies one fetch issued by a screen
///
/// Only the last ticket a screen issued can be applied to it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FetchTicket {
    screen: ScreenId,
    generation: u64,
    context: ViewingContext,
    kind: FetchKind,
}

impl FetchTicket {
    pub fn screen(&self) -> ScreenId {
        self.screen
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn context(&self) -> &ViewingContext {
        &self.context
    }

    pub fn kind(&self) -> FetchKind {
        self.kind
    }
}

/// One comment screen: a viewing context and everything the user did on it
#[derive(Debug)]
pub struct ThreadScreen {
    id: ScreenId,
    context: ViewingContext,
    state: LoadState,
    refreshing: bool,
    submitting: bool,
    generation: u64,
    comments: Vec<Comment>,
    collapsed: CollapseSet,
    draft: ReplyDraft,
}

impl ThreadScreen {
    pub fn new(context: ViewingContext) -> ThreadScreen {
        ThreadScreen {
            id: ScreenId(Uuid::new_v4()),
            context,
            state: LoadState::Initial,
            refreshing: false,
            submitting: false,
            generation: 0,
            comments: Vec::new(),
            collapsed: CollapseSet::new(),
            draft: ReplyDraft::new(),
        }
    }

    fn ticket(&mut self, kind: FetchKind) -> FetchTicket {
        self.generation += 1;
        FetchTicket {
            screen: self.id,
            generation: self.generation,
            context: self.context.clone(),
            kind,
        }
    }

    pub fn begin_load(&mut self) -> FetchTicket {
        self.state = LoadState::Loading;
        self.refreshing = false;
        self.ticket(FetchKind::Initial)
    }

    /// Starts a background refresh, or a full load if nothing was loaded yet
    pub fn begin_refresh(&mut self) -> FetchTicket {
        if self.state != LoadState::Loaded {
            return self.begin_load();
        }
        self.refreshing = true;
        self.ticket(FetchKind::Refresh)
    }

    /// Applies the result of a fetch
    ///
    /// Returns `StaleResponse` without touching anything if a newer fetch was
    /// issued since, and passes through the fetch error otherwise.
    pub fn apply_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<Comment>, Error>,
    ) -> Result<(), Error> {
        if ticket.screen != self.id || ticket.generation != self.generation {
            tracing::debug!(
                screen = %self.id,
                generation = ticket.generation,
                latest = self.generation,
                "discarding superseded fetch result"
            );
            return Err(Error::StaleResponse);
        }
        self.refreshing = false;
        match result {
            Ok(comments) => {
                self.comments = comments;
                self.state = LoadState::Loaded;
                Ok(())
            }
            Err(e) => {
                if ticket.kind == FetchKind::Initial {
                    self.comments.clear();
                    self.state = LoadState::Failed;
                }
                tracing::warn!(screen = %self.id, context = ?self.context, error = ?e, "failed fetching comments");
                Err(e)
            }
        }
    }

    pub fn render(&self) -> Vec<CommentView> {
        thread::assemble(&self.context, &self.comments, &self.collapsed)
    }

    /// Returns whether `id` is now collapsed
    pub fn toggle_collapse(&mut self, id: &CommentId) -> bool {
        self.collapsed.toggle(id)
    }

    /// Returns false if `id` is not loaded on this screen
    pub fn start_reply(&mut self, id: &CommentId) -> bool {
        match self.comments.iter().find(|c| c.id == *id) {
            Some(c) => {
                self.draft.start_reply(c);
                true
            }
            None => false,
        }
    }

    pub fn cancel_reply(&mut self) {
        self.draft.cancel();
    }

    pub fn set_draft_text(&mut self, text: String) {
        self.draft.set_text(text);
    }

    pub(crate) fn clear_draft(&mut self) {
        self.draft.cancel();
    }

    pub(crate) fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }

    /// Removes a comment that was deleted server-side
    ///
    /// Its descendants and the collapse set are left as they are.
    pub fn remove_local(&mut self, id: &CommentId) -> bool {
        let before = self.comments.len();
        self.comments.retain(|c| c.id != *id);
        if self.draft.replying_to() == Some(id) {
            self.draft.cancel();
        }
        self.comments.len() != before
    }

    /// Context to navigate to from `id`'s drill-down marker, if it has one
    pub fn view_more_context(&self, id: &CommentId) -> Option<ViewingContext> {
        let info = self.context.tier().info();
        self.comment(id)
            .filter(|c| thread::needs_drill_down(c, &info))
            .map(|c| self.context.drill_down(c.id.clone()))
    }

    pub fn header(&self) -> String {
        format!(
            "{} ({})",
            self.context.tier().info().label,
            self.comments.len()
        )
    }

    pub fn comment(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == *id)
    }

    pub fn id(&self) -> ScreenId {
        self.id
    }

    pub fn context(&self) -> &ViewingContext {
        &self.context
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn collapsed(&self) -> &CollapseSet {
        &self.collapsed
    }

    pub fn draft(&self) -> &ReplyDraft {
        &self.draft
    }
}
