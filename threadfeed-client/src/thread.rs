use std::collections::{HashMap, HashSet};

use crate::{
    api::{Comment, CommentId, Time},
    CollapseSet, TierInfo, ViewingContext,
};

/// Width of one indentation level
pub const INDENT_UNIT: u32 = 16;

/// Number of characters shown before a comment is cut with a "read more"
pub const PREVIEW_LEN: usize = 150;

/// The loaded comments of a screen, indexed by id
///
/// This is the only tree structure there is: parents are found by following
/// `reply_to` through the index, so a parent outside of the loaded set simply
/// ends the walk.
pub struct LoadedComments<'a> {
    comments: &'a [Comment],
    by_id: HashMap<&'a CommentId, usize>,
}

impl<'a> LoadedComments<'a> {
    pub fn new(comments: &'a [Comment]) -> LoadedComments<'a> {
        let by_id = comments
            .iter()
            .enumerate()
            .map(|(i, c)| (&c.id, i))
            .collect();
        LoadedComments { comments, by_id }
    }

    pub fn get(&self, id: &CommentId) -> Option<&'a Comment> {
        self.by_id.get(id).map(|i| &self.comments[*i])
    }

    /// Comments sorted by creation date, oldest first
    ///
    /// Comments created at the same time stay in the order they were fetched.
    pub fn chronological(&self) -> Vec<&'a Comment> {
        let mut res = self.comments.iter().collect::<Vec<_>>();
        res.sort_by_key(|c| c.created_at);
        res
    }
}

/// Whether `comment` is shown, given the collapsed comments
///
/// The direct parent is always checked, further ancestors only as long as they
/// are loaded.
pub fn is_visible(comment: &Comment, collapsed: &CollapseSet, loaded: &LoadedComments) -> bool {
    let mut parent = match comment.reply_to.as_ref() {
        Some(p) => p,
        None => return true,
    };
    if collapsed.contains(parent) {
        return false;
    }
    let mut seen = HashSet::new();
    while let Some(c) = loaded.get(parent) {
        if !seen.insert(parent) {
            tracing::warn!(comment = %comment.id, "comment has a cyclic reply chain");
            break;
        }
        match c.reply_to.as_ref() {
            Some(p) if loaded.get(p).is_some() => {
                if collapsed.contains(p) {
                    return false;
                }
                parent = p;
            }
            _ => break,
        }
    }
    true
}

pub fn indent_level(depth_level: u32, info: &TierInfo) -> u32 {
    depth_level.min(info.max_render_depth)
}

/// Comments at the tier's last level that have descendants link to the next tier
pub fn needs_drill_down(comment: &Comment, info: &TierInfo) -> bool {
    comment.depth_level >= info.max_render_depth && comment.child_count > 0
}

/// Marker for a comment whose replies live in the next tier
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ViewMore {
    pub context: ViewingContext,
    /// Total descendant count from the server, which may be more than what the
    /// next tier will show
    pub reported_descendants: u32,
}

/// One rendered comment
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommentView {
    pub id: CommentId,
    pub reply_to: Option<CommentId>,
    pub author_handle: String,
    pub author_name: String,
    pub content: String,
    pub preview: String,
    pub is_truncated: bool,
    pub created_at: Time,
    pub score: i64,
    pub depth_level: u32,
    pub indent_level: u32,
    pub margin_left: u32,
    pub has_media: bool,
    pub is_collapsed: bool,
    pub can_collapse: bool,
    pub view_more: Option<ViewMore>,
}

impl CommentView {
    fn new(
        context: &ViewingContext,
        info: &TierInfo,
        c: &Comment,
        collapsed: &CollapseSet,
    ) -> CommentView {
        let indent_level = indent_level(c.depth_level, info);
        let is_truncated = c.content.chars().count() > PREVIEW_LEN;
        let preview = match is_truncated {
            true => format!("{}...", c.content.chars().take(PREVIEW_LEN).collect::<String>()),
            false => c.content.clone(),
        };
        CommentView {
            id: c.id.clone(),
            reply_to: c.reply_to.clone(),
            author_handle: String::from(c.author_handle()),
            author_name: String::from(c.author_display_name()),
            content: c.content.clone(),
            preview,
            is_truncated,
            created_at: c.created_at,
            score: c.score,
            depth_level: c.depth_level,
            indent_level,
            margin_left: indent_level * INDENT_UNIT,
            has_media: c.has_media(),
            is_collapsed: collapsed.contains(&c.id),
            can_collapse: c.child_count > 0,
            view_more: needs_drill_down(c, info).then(|| ViewMore {
                context: context.drill_down(c.id.clone()),
                reported_descendants: c.child_count,
            }),
        }
    }
}

/// Turns the loaded comments of a screen into the list to render
pub fn assemble(
    context: &ViewingContext,
    comments: &[Comment],
    collapsed: &CollapseSet,
) -> Vec<CommentView> {
    let info = context.tier().info();
    let loaded = LoadedComments::new(comments);
    loaded
        .chronological()
        .into_iter()
        .filter(|c| is_visible(c, collapsed, &loaded))
        .map(|c| CommentView::new(context, &info, c, collapsed))
        .collect()
}
