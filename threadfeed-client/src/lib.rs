mod composer;
pub use composer::{prepare, validation_message};

mod context;
pub use context::ViewingContext;

mod error;
pub use error::Error;

mod fetcher;
pub use fetcher::{filter_to_tier, CommentFetcher};

mod interaction;
pub use interaction::{CollapseSet, ReplyDraft};

mod navigator;
pub use navigator::Navigator;

mod notify;
pub use notify::{Notifier, NotifyKind, TracingNotifier};

mod screen;
pub use screen::{FetchKind, FetchTicket, LoadState, ScreenId, ThreadScreen};

pub mod thread;
pub use thread::{assemble, CommentView, ViewMore};

mod tier;
pub use tier::{Tier, TierInfo};

pub mod api {
    pub use threadfeed_api::*;
}
