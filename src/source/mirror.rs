//! Mirror-fallback feed source.
//!
//! The content host answers most non-browser traffic with a bot challenge
//! page, so the same feed is reachable through several mirrors. A
//! [`MirrorSource`] walks them in order, one blocking request at a time, and
//! stops at the first one whose body normalizes to at least one post.
//!
//! Attempts are never raced: the first good mirror in preference order wins,
//! and a rate-limited host sees at most one request per mirror.

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use tracing::{debug, info, warn};

use super::{normalize, DataSource, FeedRecord};
use crate::config::FeedConfig;
use crate::error::{EndpointFailure, FailureReason, FeedError};

const ACCEPT_FEED: &str = "application/rss+xml, application/xml, text/xml";

/// Substrings that only show up in bot-mitigation interstitials.
const CHALLENGE_MARKERS: &[&str] = &["challenge-platform", "cf_chl_opt"];

/// Result of a successful walk over the mirror list.
#[derive(Debug)]
pub struct MirrorHit {
    /// The endpoint whose document was used.
    pub endpoint: String,
    pub records: Vec<FeedRecord>,
    /// Endpoints rejected before `endpoint`, in attempt order.
    pub failures: Vec<EndpointFailure>,
}

pub struct MirrorSource {
    client: Client,
    endpoints: Vec<String>,
    max_records: usize,
}

impl MirrorSource {
    /// Build a source for the endpoints, cap and transport settings in
    /// `config`.
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        config.validate()?;

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            endpoints: config.endpoints.clone(),
            max_records: config.max_posts,
        })
    }

    /// Try every endpoint in order until one yields posts.
    pub fn fetch_mirrored(&self) -> Result<MirrorHit, FeedError> {
        let mut failures = Vec::new();

        for endpoint in &self.endpoints {
            match self.attempt(endpoint) {
                Ok(records) => {
                    info!(
                        endpoint = %endpoint,
                        records = records.len(),
                        skipped = failures.len(),
                        "feed fetched"
                    );
                    return Ok(MirrorHit {
                        endpoint: endpoint.clone(),
                        records,
                        failures,
                    });
                }
                Err(reason) => {
                    warn!(endpoint = %endpoint, reason = %reason, "feed endpoint failed");
                    failures.push(EndpointFailure {
                        endpoint: endpoint.clone(),
                        reason,
                    });
                }
            }
        }

        warn!(attempts = failures.len(), "all feed endpoints failed");
        Err(FeedError::SourcesExhausted { failures })
    }

    /// One GET against one endpoint. The body is dropped on every path out.
    fn attempt(&self, endpoint: &str) -> Result<Vec<FeedRecord>, FailureReason> {
        let response = self
            .client
            .get(endpoint)
            .header(ACCEPT, ACCEPT_FEED)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .map_err(|e| FailureReason::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FailureReason::Status(status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| FailureReason::Transport(e.to_string()))?;
        debug!(endpoint, bytes = body.len(), "feed body received");

        if is_challenge_page(&body) {
            return Err(FailureReason::Challenge);
        }

        let records = normalize(&body, self.max_records);
        if records.is_empty() {
            return Err(FailureReason::EmptyFeed);
        }
        Ok(records)
    }
}

impl DataSource for MirrorSource {
    fn name(&self) -> &str {
        "mirrors"
    }

    fn fetch(&self) -> Result<Vec<FeedRecord>, FeedError> {
        self.fetch_mirrored().map(|hit| hit.records)
    }
}

/// Heuristic: an HTML document type or a known challenge marker means the
/// mirror served an interstitial instead of the feed.
pub fn is_challenge_page(body: &str) -> bool {
    let head = body.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    let starts_with_doctype = head
        .get(..9)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("<!doctype"));

    starts_with_doctype || CHALLENGE_MARKERS.iter().any(|marker| body.contains(marker))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
