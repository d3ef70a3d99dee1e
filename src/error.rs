//! Error types for the feed pipeline.
//!
//! Two layers:
//!
//! * [`EndpointFailure`] — one mirror attempt that did not produce posts.
//!   These are recovered locally by trying the next mirror and never reach
//!   the caller on their own.
//! * [`FeedError`] — terminal failures returned from
//!   [`LatestPosts::get_latest_posts`](crate::posts::LatestPosts::get_latest_posts).

use std::fmt;

/// Why a single endpoint attempt was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FailureReason {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("bot challenge page instead of feed")]
    Challenge,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("feed contained no usable items")]
    EmptyFeed,
}

/// A rejected attempt against one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointFailure {
    pub endpoint: String,
    pub reason: FailureReason,
}

impl fmt::Display for EndpointFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.endpoint, self.reason)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Every configured endpoint failed. Expected to be transient.
    #[error("all {} feed sources exhausted", .failures.len())]
    SourcesExhausted { failures: Vec<EndpointFailure> },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl FeedError {
    /// Stable machine-readable token for callers and JSON bodies.
    pub fn reason(&self) -> &'static str {
        match self {
            FeedError::SourcesExhausted { .. } => "source_unavailable",
            FeedError::InvalidConfig(_) => "invalid_config",
            FeedError::Client(_) => "client_setup",
        }
    }

    /// HTTP-equivalent status suitable for relaying to a browser.
    pub fn status_code(&self) -> u16 {
        match self {
            FeedError::SourcesExhausted { .. } => 503,
            FeedError::InvalidConfig(_) | FeedError::Client(_) => 500,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, FeedError::SourcesExhausted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhaustion_maps_to_unavailable() {
        let err = FeedError::SourcesExhausted {
            failures: vec![EndpointFailure {
                endpoint: "https://a.example/feed".into(),
                reason: FailureReason::Challenge,
            }],
        };
        assert_eq!(err.reason(), "source_unavailable");
        assert_eq!(err.status_code(), 503);
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "all 1 feed sources exhausted");
    }

    #[test]
    fn config_errors_are_not_retryable() {
        let err = FeedError::InvalidConfig("no endpoints".into());
        assert_eq!(err.status_code(), 500);
        assert!(!err.is_retryable());
    }

    #[test]
    fn endpoint_failure_display_names_endpoint_and_reason() {
        let failure = EndpointFailure {
            endpoint: "https://a.example/feed".into(),
            reason: FailureReason::Status(403),
        };
        assert_eq!(failure.to_string(), "https://a.example/feed: HTTP status 403");
    }
}
