//! latest-posts — fetches a blog's feed through an ordered list of mirrors
//! and returns the newest posts.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐ get_latest_posts ┌──────────────┐  body  ┌──────────────┐
//! │ posts.rs │ ───────────────► │ MirrorSource │ ─────► │ normalize()  │
//! │ (entry)  │                  │ (fallback)   │ ◄───── │ (extraction) │
//! └──────────┘                  └──────────────┘ records└──────────────┘
//!      ▲
//!      │ spawn_blocking
//! ┌──────────┐
//! │ serve.rs │  GET /api/latest-posts
//! └──────────┘
//! ```
//!
//! * **`source/`** — the `DataSource` trait, the `FeedRecord` type, the
//!   mirror-fallback fetcher and the text-level feed normalizer.
//! * **`posts`** — the single entry point and its JSON body.
//! * **`serve`** — optional HTTP relay in front of the entry point.
//! * **`config`** — endpoints, output cap, timeouts; `clap` arguments.
//! * **`error`** — per-endpoint failures and terminal errors.

pub mod config;
pub mod error;
pub mod posts;
pub mod serve;
pub mod source;

pub use config::FeedConfig;
pub use error::{EndpointFailure, FailureReason, FeedError};
pub use posts::{LatestPosts, PostsBody};
pub use source::{DataSource, FeedRecord};
