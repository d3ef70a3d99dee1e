//! Runtime configuration for the feed pipeline.
//!
//! [`FeedConfig`] is the plain value the library consumes. [`FeedArgs`] is
//! its `clap` face: the binary flattens it into the command line so every
//! knob can also be set from the environment.

use std::time::Duration;

use clap::Args;

use crate::error::FeedError;

/// Mirrors of the same feed, in preference order. The proxied entries
/// stream the upstream document and usually get past the bot challenge when
/// the direct ones do not.
pub const DEFAULT_ENDPOINTS: &[&str] = &[
    "https://medium.com/feed/@mriganavdeka",
    "https://mriganavdeka.medium.com/feed",
    "https://r.jina.ai/https://medium.com/feed/@mriganavdeka",
    "https://r.jina.ai/https://mriganavdeka.medium.com/feed",
];

pub const DEFAULT_MAX_POSTS: usize = 16;

/// One hour.
pub const DEFAULT_REVALIDATE_SECS: u64 = 3600;

pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// The content host rejects default client identifiers outright.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    /// Candidate feed URLs, tried strictly in this order.
    pub endpoints: Vec<String>,
    /// Output cap; the normalizer also scans at most twice this many items.
    pub max_posts: usize,
    /// Freshness hint advertised to caches in front of the HTTP relay.
    pub revalidate_secs: u64,
    /// Upper bound for a single endpoint attempt.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoints: DEFAULT_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
            max_posts: DEFAULT_MAX_POSTS,
            revalidate_secs: DEFAULT_REVALIDATE_SECS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FeedConfig {
    pub fn validate(&self) -> Result<(), FeedError> {
        if self.endpoints.is_empty() {
            return Err(FeedError::InvalidConfig("endpoint list is empty".into()));
        }
        if self.endpoints.iter().any(|e| e.trim().is_empty()) {
            return Err(FeedError::InvalidConfig("endpoint list contains a blank entry".into()));
        }
        if self.max_posts == 0 {
            return Err(FeedError::InvalidConfig("max posts must be at least 1".into()));
        }
        if self.timeout.is_zero() {
            return Err(FeedError::InvalidConfig("request timeout must be non-zero".into()));
        }
        Ok(())
    }
}

/// Command-line / environment overrides for [`FeedConfig`].
#[derive(Debug, Clone, Args)]
pub struct FeedArgs {
    /// Feed URL to try; repeat or comma-separate for fallbacks, in order.
    #[arg(
        long = "endpoint",
        env = "LATEST_POSTS_ENDPOINTS",
        value_delimiter = ','
    )]
    pub endpoints: Vec<String>,

    /// Maximum number of posts returned.
    #[arg(long, env = "LATEST_POSTS_MAX", default_value_t = DEFAULT_MAX_POSTS)]
    pub max_posts: usize,

    /// Cache revalidation hint in seconds for the HTTP relay.
    #[arg(long, env = "LATEST_POSTS_REVALIDATE_SECS", default_value_t = DEFAULT_REVALIDATE_SECS)]
    pub revalidate_secs: u64,

    /// Per-endpoint request timeout in seconds.
    #[arg(long, env = "LATEST_POSTS_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    #[arg(long, env = "LATEST_POSTS_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

impl FeedArgs {
    /// Resolve into a validated config; no `--endpoint` means the defaults.
    pub fn into_config(self) -> Result<FeedConfig, FeedError> {
        let endpoints = if self.endpoints.is_empty() {
            FeedConfig::default().endpoints
        } else {
            self.endpoints.into_iter().map(|e| e.trim().to_string()).collect()
        };

        let config = FeedConfig {
            endpoints,
            max_posts: self.max_posts,
            revalidate_secs: self.revalidate_secs,
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        feed: FeedArgs,
    }

    #[test]
    fn default_config_is_valid() {
        let config = FeedConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_posts, 16);
        assert_eq!(config.endpoints.len(), 4);
    }

    #[test]
    fn rejects_zero_cap_and_empty_endpoints() {
        let mut config = FeedConfig::default();
        config.max_posts = 0;
        assert!(matches!(config.validate(), Err(FeedError::InvalidConfig(_))));

        let mut config = FeedConfig::default();
        config.endpoints.clear();
        assert!(matches!(config.validate(), Err(FeedError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = FeedConfig {
            timeout: Duration::ZERO,
            ..FeedConfig::default()
        };
        assert!(matches!(config.validate(), Err(FeedError::InvalidConfig(_))));

        let cli = TestCli::parse_from(["test", "--timeout-secs", "0"]);
        assert!(matches!(cli.feed.into_config(), Err(FeedError::InvalidConfig(_))));
    }

    #[test]
    fn endpoint_order_is_preserved_from_args() {
        let cli = TestCli::parse_from([
            "test",
            "--endpoint",
            "https://b.example/feed,https://a.example/feed",
            "--endpoint",
            "https://c.example/feed",
            "--max-posts",
            "3",
        ]);
        let config = cli.feed.into_config().unwrap();
        assert_eq!(
            config.endpoints,
            vec![
                "https://b.example/feed",
                "https://a.example/feed",
                "https://c.example/feed"
            ]
        );
        assert_eq!(config.max_posts, 3);
    }

    #[test]
    fn missing_endpoints_fall_back_to_defaults() {
        let cli = TestCli::parse_from(["test", "--timeout-secs", "2"]);
        let config = cli.feed.into_config().unwrap();
        assert_eq!(config.endpoints, FeedConfig::default().endpoints);
        assert_eq!(config.timeout, Duration::from_secs(2));
    }
}
