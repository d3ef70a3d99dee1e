//! The "get latest posts" entry point and its JSON framing.

use serde::Serialize;
use tracing::{error, info};

use crate::config::FeedConfig;
use crate::error::FeedError;
use crate::source::{DataSource, FeedRecord, MirrorSource};

/// Message shown to readers when no mirror could be reached.
pub const UNAVAILABLE_MESSAGE: &str = "Feed temporarily unavailable";

/// Entry point consumed by the presentation layer.
///
/// Every call is an independent fetch: nothing is cached between calls.
pub struct LatestPosts {
    source: Box<dyn DataSource>,
}

impl LatestPosts {
    /// Wire up the mirror source described by `config`.
    pub fn from_config(config: &FeedConfig) -> Result<Self, FeedError> {
        Ok(Self::with_source(MirrorSource::new(config)?))
    }

    pub fn with_source(source: impl DataSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Up to N posts, newest first, or a terminal error when every mirror
    /// failed.
    pub fn get_latest_posts(&self) -> Result<Vec<FeedRecord>, FeedError> {
        match self.source.fetch() {
            Ok(records) => {
                info!(
                    source = self.source.name(),
                    posts = records.len(),
                    "latest posts ready"
                );
                Ok(records)
            }
            Err(err) => {
                error!(
                    source = self.source.name(),
                    error = %err,
                    reason = err.reason(),
                    "latest posts unavailable"
                );
                Err(err)
            }
        }
    }
}

/// JSON body returned to browsers: `{"articles": [...]}`, plus `error` and
/// `reason` on failure.
#[derive(Debug, Serialize)]
pub struct PostsBody {
    pub articles: Vec<FeedRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

impl PostsBody {
    pub fn ok(articles: Vec<FeedRecord>) -> Self {
        Self {
            articles,
            error: None,
            reason: None,
        }
    }

    pub fn failed(err: &FeedError) -> Self {
        let error = match err {
            FeedError::SourcesExhausted { .. } => UNAVAILABLE_MESSAGE.to_string(),
            other => other.to_string(),
        };
        Self {
            articles: Vec::new(),
            error: Some(error),
            reason: Some(err.reason()),
        }
    }

    /// Body plus the HTTP status it should travel with.
    pub fn from_result(result: Result<Vec<FeedRecord>, FeedError>) -> (u16, Self) {
        match result {
            Ok(records) => (200, Self::ok(records)),
            Err(err) => (err.status_code(), Self::failed(&err)),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::{EndpointFailure, FailureReason};

    /// Source that returns a canned answer.
    pub struct StubSource(pub fn() -> Result<Vec<FeedRecord>, FeedError>);

    impl DataSource for StubSource {
        fn name(&self) -> &str {
            "stub"
        }

        fn fetch(&self) -> Result<Vec<FeedRecord>, FeedError> {
            (self.0)()
        }
    }

    pub fn two_posts() -> Result<Vec<FeedRecord>, FeedError> {
        Ok(vec![
            FeedRecord::new("Newer", "https://blog.example/newer", "Tue, 02 Jan 2024 00:00:00 GMT")
                .unwrap(),
            FeedRecord::new("Older", "https://blog.example/older", "Mon, 01 Jan 2024 00:00:00 GMT")
                .unwrap(),
        ])
    }

    pub fn no_posts() -> Result<Vec<FeedRecord>, FeedError> {
        Ok(Vec::new())
    }

    pub fn exhausted() -> Result<Vec<FeedRecord>, FeedError> {
        Err(FeedError::SourcesExhausted {
            failures: vec![EndpointFailure {
                endpoint: "https://blog.example/feed".into(),
                reason: FailureReason::Challenge,
            }],
        })
    }

    #[test]
    fn passes_records_through() {
        let posts = LatestPosts::with_source(StubSource(two_posts));
        let records = posts.get_latest_posts().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title(), "Newer");
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let posts = LatestPosts::with_source(StubSource(no_posts));
        assert!(posts.get_latest_posts().unwrap().is_empty());
    }

    #[test]
    fn exhaustion_surfaces_as_error() {
        let posts = LatestPosts::with_source(StubSource(exhausted));
        let err = posts.get_latest_posts().unwrap_err();
        assert_eq!(err.status_code(), 503);
    }

    #[test]
    fn success_body_has_only_articles() {
        let (status, body) = PostsBody::from_result(two_posts());
        assert_eq!(status, 200);

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["articles"].as_array().unwrap().len(), 2);
        assert_eq!(json["articles"][0]["publishedAt"], "Tue, 02 Jan 2024 00:00:00 GMT");
        assert!(json.get("error").is_none());
        assert!(json.get("reason").is_none());
    }

    #[test]
    fn failure_body_carries_message_and_reason() {
        let (status, body) = PostsBody::from_result(exhausted());
        assert_eq!(status, 503);

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "articles": [],
                "error": UNAVAILABLE_MESSAGE,
                "reason": "source_unavailable",
            })
        );
    }

    #[test]
    fn builds_from_default_config() {
        assert!(LatestPosts::from_config(&FeedConfig::default()).is_ok());
    }
}
