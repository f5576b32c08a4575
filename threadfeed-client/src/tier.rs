use std::{fmt, ops::RangeInclusive, str::FromStr};

use crate::Error;

/// Depth band a comment screen shows
///
/// The comment tree is unbounded, so it is cut into three fixed bands, each
/// one reached by drilling down from the deepest comment of the previous one.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Tier {
    Main,
    Replies,
    DeepReplies,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TierInfo {
    pub depth_band: RangeInclusive<u32>,
    /// Indentation stops growing past this depth, and comments at this depth
    /// with descendants get a drill-down marker
    pub max_render_depth: u32,
    pub label: &'static str,
}

impl Tier {
    pub fn info(&self) -> TierInfo {
        match self {
            Tier::Main => TierInfo {
                depth_band: 0..=4,
                max_render_depth: 4,
                label: "Comments",
            },
            Tier::Replies => TierInfo {
                depth_band: 5..=8,
                max_render_depth: 8,
                label: "Replies (Level 5–8)",
            },
            Tier::DeepReplies => TierInfo {
                depth_band: 9..=12,
                max_render_depth: 12,
                label: "Deep Replies (Level 9–12)",
            },
        }
    }

    /// Tier reached by drilling down from this one
    ///
    /// Drilling down from deep replies stays in deep replies, anchored deeper.
    pub fn next(&self) -> Tier {
        match self {
            Tier::Main => Tier::Replies,
            Tier::Replies | Tier::DeepReplies => Tier::DeepReplies,
        }
    }

    pub fn needs_anchor(&self) -> bool {
        !matches!(self, Tier::Main)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Main => "main",
            Tier::Replies => "replies",
            Tier::DeepReplies => "deep-replies",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Tier, Error> {
        match s {
            "main" => Ok(Tier::Main),
            "replies" => Ok(Tier::Replies),
            "deep-replies" => Ok(Tier::DeepReplies),
            _ => Err(Error::InvalidContext(format!("unknown comment level {s:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_mapping() {
        let main = Tier::Main.info();
        assert_eq!(main.depth_band, 0..=4);
        assert_eq!(main.max_render_depth, 4);
        assert_eq!(main.label, "Comments");

        let replies = Tier::Replies.info();
        assert_eq!(replies.depth_band, 5..=8);
        assert_eq!(replies.max_render_depth, 8);

        let deep = Tier::DeepReplies.info();
        assert_eq!(deep.depth_band, 9..=12);
        assert_eq!(deep.max_render_depth, 12);
    }

    #[test]
    fn drill_down_order() {
        assert_eq!(Tier::Main.next(), Tier::Replies);
        assert_eq!(Tier::Replies.next(), Tier::DeepReplies);
        assert_eq!(Tier::DeepReplies.next(), Tier::DeepReplies);
    }

    #[test]
    fn parsing_rejects_unknown_levels() {
        for t in [Tier::Main, Tier::Replies, Tier::DeepReplies] {
            assert_eq!(t.as_str().parse::<Tier>().unwrap(), t);
        }
        assert!("deep_replies".parse::<Tier>().is_err());
        assert!("".parse::<Tier>().is_err());
        assert!("Main".parse::<Tier>().is_err());
    }
}
