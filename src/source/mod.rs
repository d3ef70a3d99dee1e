//! Feed source abstraction layer.
//!
//! This module defines the [`DataSource`] trait and the [`FeedRecord`] type.
//! [`MirrorSource`] is the network implementation; [`normalize`] is the
//! text-level feed extractor it hands each candidate document to.

mod feed_record;
mod mirror;
mod normalize;

pub use feed_record::FeedRecord;
pub use mirror::{is_challenge_page, MirrorHit, MirrorSource};
pub use normalize::{decode_entities, normalize};

use crate::error::FeedError;

/// Anything that can produce the latest posts.
///
/// Implementations block the calling thread for the duration of their I/O.
/// The HTTP relay shares one source across requests, so they must also be
/// [`Sync`].
pub trait DataSource: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// Fetch and normalize the latest posts, newest first.
    ///
    /// `Ok` with an empty `Vec` is a valid answer and distinct from an error.
    fn fetch(&self) -> Result<Vec<FeedRecord>, FeedError>;
}
