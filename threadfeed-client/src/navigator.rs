use std::sync::Arc;

use crate::{
    api::{Comment, CommentId, CommentService},
    composer, CommentFetcher, Error, FetchTicket, Notifier, NotifyKind, ScreenId, ThreadScreen,
    ViewingContext,
};

/// Stack of comment screens, from the post's main tier to the deepest drill-down
///
/// All fetch results come back through `apply_fetch`, which routes them to the
/// screen that issued them, or drops them if that screen is gone.
pub struct Navigator<S> {
    fetcher: CommentFetcher<S>,
    notifier: Box<dyn Notifier>,
    stack: Vec<ThreadScreen>,
}

impl<S: CommentService> Navigator<S> {
    pub fn new(service: Arc<S>, notifier: Box<dyn Notifier>) -> Navigator<S> {
        Navigator {
            fetcher: CommentFetcher::new(service),
            notifier,
            stack: Vec::new(),
        }
    }

    pub fn fetcher(&self) -> &CommentFetcher<S> {
        &self.fetcher
    }

    pub fn screens(&self) -> &[ThreadScreen] {
        &self.stack
    }

    pub fn active(&self) -> Option<&ThreadScreen> {
        self.stack.last()
    }

    pub fn active_mut(&mut self) -> Result<&mut ThreadScreen, Error> {
        self.stack.last_mut().ok_or(Error::NoActiveScreen)
    }

    fn screen_mut(&mut self, id: ScreenId) -> Option<&mut ThreadScreen> {
        self.stack.iter_mut().find(|s| s.id() == id)
    }

    /// Replaces all screens with a fresh one for `ctx`
    pub fn open(&mut self, ctx: ViewingContext) -> FetchTicket {
        self.stack.clear();
        self.push(ctx)
    }

    fn push(&mut self, ctx: ViewingContext) -> FetchTicket {
        let mut screen = ThreadScreen::new(ctx);
        let ticket = screen.begin_load();
        self.stack.push(screen);
        ticket
    }

    /// Pushes the screen behind `id`'s drill-down marker
    pub fn drill_down(&mut self, id: &CommentId) -> Result<FetchTicket, Error> {
        let screen = self.active_mut()?;
        let ctx = screen.view_more_context(id).ok_or_else(|| {
            Error::InvalidContext(format!("comment {id} has no deeper replies to show"))
        })?;
        Ok(self.push(ctx))
    }

    /// Abandons the active screen, returning whether there was one
    pub fn back(&mut self) -> bool {
        self.stack.pop().is_some()
    }

    pub fn begin_refresh(&mut self) -> Result<FetchTicket, Error> {
        Ok(self.active_mut()?.begin_refresh())
    }

    /// Hands a fetch result to the screen that asked for it
    ///
    /// Stale results are only logged, other failures are notified.
    pub fn apply_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<Comment>, Error>,
    ) -> Result<(), Error> {
        let res = match self.screen_mut(ticket.screen()) {
            Some(screen) => screen.apply_fetch(ticket, result),
            None => {
                tracing::debug!(
                    screen = %ticket.screen(),
                    context = ?ticket.context(),
                    "discarding fetch result for abandoned screen"
                );
                Err(Error::StaleResponse)
            }
        };
        if let Err(e) = &res {
            if !e.is_stale() {
                self.notifier
                    .notify(NotifyKind::Error, "Failed to load comments");
            }
        }
        res
    }

    async fn run(&mut self, ticket: FetchTicket) -> Result<(), Error> {
        let res = self.fetcher.fetch(ticket.context()).await;
        self.apply_fetch(&ticket, res)
    }

    /// Opens `ctx` and loads it
    pub async fn load(&mut self, ctx: ViewingContext) -> Result<(), Error> {
        let ticket = self.open(ctx);
        self.run(ticket).await
    }

    /// Drills down into `id` and loads the new screen
    pub async fn view_more(&mut self, id: &CommentId) -> Result<(), Error> {
        let ticket = self.drill_down(id)?;
        self.run(ticket).await
    }

    pub async fn refresh(&mut self) -> Result<(), Error> {
        let ticket = self.begin_refresh()?;
        self.run(ticket).await
    }

    /// Sends the active screen's draft, then re-fetches its tier
    ///
    /// The draft is only cleared once the server accepted it.
    pub async fn submit(&mut self) -> Result<Comment, Error> {
        let screen = self.active_mut()?;
        let screen_id = screen.id();
        let new = match composer::prepare(screen.context(), screen.draft()) {
            Ok(new) => new,
            Err(e) => {
                if let Error::Validation(v) = &e {
                    self.notifier
                        .notify(NotifyKind::Error, &composer::validation_message(v));
                }
                return Err(e);
            }
        };
        screen.set_submitting(true);

        let res = composer::submit(self.fetcher.service(), new).await;
        if let Some(screen) = self.screen_mut(screen_id) {
            screen.set_submitting(false);
        }
        match res {
            Ok(comment) => {
                tracing::info!(comment = %comment.id, depth = comment.depth_level, "created comment");
                self.notifier
                    .notify(NotifyKind::Success, "Comment added successfully");
                if let Some(screen) = self.screen_mut(screen_id) {
                    screen.clear_draft();
                    let ticket = screen.begin_refresh();
                    if let Err(e) = self.run(ticket).await {
                        tracing::debug!(error = ?e, "refresh after submission failed");
                    }
                }
                Ok(comment)
            }
            Err(e) => {
                tracing::warn!(error = ?e, "failed submitting comment");
                let message = match &e {
                    Error::Validation(v) => composer::validation_message(v),
                    _ => String::from("Failed to add comment"),
                };
                self.notifier.notify(NotifyKind::Error, &message);
                Err(e)
            }
        }
    }

    /// Deletes `id` and removes it from the active screen, without re-fetching
    pub async fn delete(&mut self, id: &CommentId) -> Result<(), Error> {
        let screen_id = self.active_mut()?.id();
        match composer::delete(self.fetcher.service(), id).await {
            Ok(()) => {
                tracing::info!(comment = %id, "deleted comment");
                if let Some(screen) = self.screen_mut(screen_id) {
                    screen.remove_local(id);
                }
                self.notifier.notify(NotifyKind::Success, "Comment deleted");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(comment = %id, error = ?e, "failed deleting comment");
                self.notifier
                    .notify(NotifyKind::Error, "Error deleting comment");
                Err(e)
            }
        }
    }
}
