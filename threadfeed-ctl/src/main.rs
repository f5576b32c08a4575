use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use threadfeed_client::{
    api::{Comment, CommentId, CommentService},
    CommentView, LoadState, Navigator, ThreadScreen, TracingNotifier, ViewingContext,
};
use threadfeed_mock_server::MockServer;
use tracing_subscriber::EnvFilter;

mod http;
use http::HttpCommentService;

#[derive(structopt::StructOpt)]
struct Opt {
    /// Base url of the comment api
    #[structopt(short, long, required_unless = "mock", conflicts_with = "mock")]
    host: Option<String>,

    /// Serve comments from a JSON file instead of a server
    #[structopt(long, parse(from_os_str))]
    mock: Option<PathBuf>,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
struct Location {
    /// Post whose comments to show
    post: String,

    /// Comment level: main, replies or deep-replies
    #[structopt(long)]
    tier: Option<String>,

    /// Comment the replies or deep-replies are shown under
    #[structopt(long)]
    anchor: Option<String>,
}

impl Location {
    fn context(&self) -> anyhow::Result<ViewingContext> {
        ViewingContext::from_params(&self.post, self.tier.as_deref(), self.anchor.as_deref())
            .context("parsing comment location")
    }
}

#[derive(structopt::StructOpt)]
enum Command {
    /// Show a comment thread
    Show {
        #[structopt(flatten)]
        location: Location,
    },

    /// Add a comment, or reply to one
    Reply {
        #[structopt(flatten)]
        location: Location,

        /// Text of the comment
        content: String,

        /// Comment to reply to, which must be shown at this location
        #[structopt(long)]
        reply_to: Option<String>,
    },

    /// Delete a comment
    Delete {
        #[structopt(flatten)]
        location: Location,

        /// Comment to delete
        comment: String,
    },
}

fn token() -> anyhow::Result<String> {
    std::env::var("THREADFEED_TOKEN").context("retrieving THREADFEED_TOKEN environment variable")
}

fn load_mock(path: &PathBuf) -> anyhow::Result<MockServer> {
    let data = std::fs::read(path).with_context(|| format!("reading mock data from {path:?}"))?;
    let comments: Vec<Comment> = serde_json::from_slice(&data)
        .with_context(|| format!("parsing mock data from {path:?}"))?;
    tracing::debug!(count = comments.len(), "loaded mock comments");
    Ok(MockServer::with_comments(comments))
}

fn print_view(v: &CommentView) {
    let indent = " ".repeat(v.margin_left as usize / 4);
    let fold = match (v.can_collapse, v.is_collapsed) {
        (false, _) => "   ",
        (true, false) => "[-]",
        (true, true) => "[+]",
    };
    println!(
        "{indent}{fold} {} (@{}) · {} · {} · #{}",
        v.author_name,
        v.author_handle,
        v.score,
        v.created_at.format("%Y-%m-%d %H:%M"),
        v.id,
    );
    for line in v.preview.lines() {
        println!("{indent}    {line}");
    }
    if v.has_media {
        println!("{indent}    [media]");
    }
    if let Some(more) = &v.view_more {
        println!(
            "{indent}    → {} more replies: --tier {} --anchor {}",
            more.reported_descendants,
            more.context.tier(),
            v.id,
        );
    }
}

fn print_screen(screen: &ThreadScreen) {
    println!("{}", screen.header());
    if screen.state() == LoadState::Loaded && screen.comments().is_empty() {
        println!("No comments yet");
    }
    for v in screen.render() {
        print_view(&v);
    }
}

async fn run<S: CommentService>(service: Arc<S>, cmd: Command) -> anyhow::Result<()> {
    let mut nav = Navigator::new(service, Box::new(TracingNotifier));
    match cmd {
        Command::Show { location } => {
            nav.load(location.context()?)
                .await
                .context("loading comments")?;
        }
        Command::Reply {
            location,
            content,
            reply_to,
        } => {
            nav.load(location.context()?)
                .await
                .context("loading comments")?;
            let screen = nav.active_mut()?;
            if let Some(parent) = reply_to {
                let parent = CommentId(parent);
                if !screen.start_reply(&parent) {
                    anyhow::bail!("comment {parent} is not shown at this location");
                }
            }
            let text = format!("{}{content}", screen.draft().text());
            screen.set_draft_text(text);
            nav.submit().await.context("submitting comment")?;
        }
        Command::Delete { location, comment } => {
            nav.load(location.context()?)
                .await
                .context("loading comments")?;
            nav.delete(&CommentId(comment))
                .await
                .context("deleting comment")?;
        }
    }
    let screen = nav.active().context("no comment screen is open")?;
    print_screen(screen);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let opt = <Opt as structopt::StructOpt>::from_args();

    match (opt.host, opt.mock) {
        (_, Some(path)) => run(Arc::new(load_mock(&path)?), opt.cmd).await,
        (Some(host), None) => {
            let service = HttpCommentService::new(host, token()?)?;
            run(Arc::new(service), opt.cmd).await
        }
        (None, None) => anyhow::bail!("one of --host or --mock is required"),
    }
}
