use anyhow::Context;
use chrono::{Duration, Utc};
use rand::{seq::SliceRandom, Rng};
use threadfeed_api::{Comment, CommentId, PostId, Time, UserDetails, UserId};

const NUM_POSTS: usize = 3;
const NUM_USERS: usize = 8;

const NUM_COMMENTS_PER_POST: usize = 120;
// Probability that a comment is a reply rather than a top-level comment
const REPLY_PROBABILITY: f64 = 0.8;

// Each post also gets a single chain this deep, so that every tier has something to show
const DEEP_CHAIN_LEN: usize = 14;

const COMMENT_MIN_WORDS: usize = 3;
const COMMENT_MAX_WORDS: usize = 60;

fn gen_user(rng: &mut impl Rng, i: usize) -> UserDetails {
    let handle = format!("{}{i}", lipsum::lipsum_words(1).to_lowercase());
    UserDetails {
        id: UserId(format!("user-{i}")),
        display_name: lipsum::lipsum_words(2),
        avatar: match rng.gen_bool(0.5) {
            true => format!("https://avatars.example.com/{handle}.png"),
            false => String::new(),
        },
        user_handle: handle,
    }
}

fn gen_comment_text(rng: &mut impl Rng) -> String {
    lipsum::lipsum_words(rng.gen_range(COMMENT_MIN_WORDS..=COMMENT_MAX_WORDS))
}

struct Forest {
    comments: Vec<Comment>,
    next_id: usize,
}

impl Forest {
    fn add(
        &mut self,
        rng: &mut impl Rng,
        post: &PostId,
        user: &UserDetails,
        parent: Option<usize>,
        base: Time,
    ) -> usize {
        self.next_id += 1;
        let id = CommentId(format!("c{}", self.next_id));
        let (depth_level, path, after) = match parent {
            None => (0, id.0.clone(), base),
            Some(p) => {
                let p = &self.comments[p];
                (
                    p.depth_level + 1,
                    format!("{}/{}", p.path, id),
                    p.created_at,
                )
            }
        };
        let mut c = Comment::stub(&id.0);
        c.post_id = post.clone();
        c.user_id = user.id.clone();
        c.user_details = Some(user.clone());
        c.reply_to = parent.map(|p| self.comments[p].id.clone());
        c.content = gen_comment_text(rng);
        c.depth_level = depth_level;
        c.path = path;
        c.created_at = after + Duration::minutes(rng.gen_range(1..=240));
        c.score = rng.gen_range(-5..=50);
        c.status = String::from("active");

        // bump the descendant count of every ancestor
        let mut ancestor = parent;
        while let Some(a) = ancestor {
            self.comments[a].child_count += 1;
            ancestor = self.comments[a]
                .reply_to
                .as_ref()
                .and_then(|r| self.comments.iter().position(|c| c.id == *r));
        }

        self.comments.push(c);
        self.comments.len() - 1
    }
}

fn main() -> anyhow::Result<()> {
    let mut rng = rand::thread_rng();
    let base = Utc::now() - Duration::days(7);

    let users = (0..NUM_USERS)
        .map(|i| gen_user(&mut rng, i))
        .collect::<Vec<_>>();

    let mut forest = Forest {
        comments: Vec::new(),
        next_id: 0,
    };
    for p in 0..NUM_POSTS {
        let post = PostId(format!("post-{p}"));
        let first = forest.comments.len();

        let mut parent = None;
        for _ in 0..DEEP_CHAIN_LEN {
            let user = users.choose(&mut rng).context("picking a user")?;
            parent = Some(forest.add(&mut rng, &post, user, parent, base));
        }

        for _ in 0..NUM_COMMENTS_PER_POST {
            let user = users.choose(&mut rng).context("picking a user")?;
            let parent = match rng.gen_bool(REPLY_PROBABILITY) {
                true => Some(rng.gen_range(first..forest.comments.len())),
                false => None,
            };
            forest.add(&mut rng, &post, user, parent, base);
        }
    }

    let json =
        serde_json::to_string_pretty(&forest.comments).context("serializing comments to json")?;
    println!("{json}");
    Ok(())
}
