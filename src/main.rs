//! `latest-posts` command-line front end.
//!
//! * `fetch` (default) — run one fetch and print the JSON body to stdout.
//! * `serve` — run the HTTP relay.
//!
//! Logs go to stderr and honour `RUST_LOG` (default `info`).

use std::net::SocketAddr;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use latest_posts::config::FeedArgs;
use latest_posts::serve::{self, AppState};
use latest_posts::{LatestPosts, PostsBody};

#[derive(Debug, Parser)]
#[command(name = "latest-posts", version, about = "Fetch the latest blog posts through feed mirrors")]
struct Cli {
    #[command(flatten)]
    feed: FeedArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch once and print the posts as JSON (default).
    Fetch,

    /// Serve `GET /api/latest-posts` over HTTP.
    Serve {
        #[arg(long, env = "LATEST_POSTS_HOST", default_value = "127.0.0.1")]
        host: String,
        #[arg(long, env = "LATEST_POSTS_PORT", default_value_t = 8080)]
        port: u16,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    let config = cli.feed.into_config()?;
    // The blocking HTTP client must be built outside the async runtime.
    let posts = LatestPosts::from_config(&config)?;

    match cli.command.unwrap_or(Command::Fetch) {
        Command::Fetch => {
            let (status, body) = PostsBody::from_result(posts.get_latest_posts());
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(if status == 200 {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Serve { host, port } => {
            let addr: SocketAddr = format!("{host}:{port}")
                .parse()
                .with_context(|| format!("invalid listen address {host}:{port}"))?;
            info!(endpoints = config.endpoints.len(), max_posts = config.max_posts, "starting relay");

            let state = AppState::new(posts, config.revalidate_secs);
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(serve::run(addr, state))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
