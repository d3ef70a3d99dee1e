//! HTTP relay for the presentation layer.
//!
//! Exposes `GET /api/latest-posts`. Each request runs one blocking
//! [`LatestPosts::get_latest_posts`] call on tokio's blocking pool, so
//! concurrent requests never share fetch state.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::header::CACHE_CONTROL;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::posts::{LatestPosts, PostsBody};

pub const POSTS_ROUTE: &str = "/api/latest-posts";

#[derive(Clone)]
pub struct AppState {
    posts: Arc<LatestPosts>,
    revalidate_secs: u64,
}

impl AppState {
    pub fn new(posts: LatestPosts, revalidate_secs: u64) -> Self {
        Self {
            posts: Arc::new(posts),
            revalidate_secs,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(POSTS_ROUTE, get(latest_posts))
        .with_state(state)
}

async fn latest_posts(State(state): State<AppState>) -> Response {
    let posts = Arc::clone(&state.posts);
    let result = match tokio::task::spawn_blocking(move || posts.get_latest_posts()).await {
        Ok(result) => result,
        Err(join_err) => {
            error!(error = %join_err, "posts fetch task failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let (status, body) = PostsBody::from_result(result);
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let cache_control = if status.is_success() {
        format!(
            "public, s-maxage={}, stale-while-revalidate",
            state.revalidate_secs
        )
    } else {
        "no-store".to_string()
    };

    (status, [(CACHE_CONTROL, cache_control)], Json(body)).into_response()
}

/// Serve until Ctrl-C.
pub async fn run(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, route = POSTS_ROUTE, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts::tests::{exhausted, no_posts, two_posts, StubSource};
    use axum::body::to_bytes;

    async fn call(state: AppState) -> (StatusCode, String, serde_json::Value) {
        let response = latest_posts(State(state)).await;
        let status = response.status();
        let cache_control = response
            .headers()
            .get(CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap();
        (status, cache_control, json)
    }

    #[tokio::test]
    async fn success_is_cacheable_json() {
        let state = AppState::new(LatestPosts::with_source(StubSource(two_posts)), 3600);
        let (status, cache_control, json) = call(state).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(cache_control, "public, s-maxage=3600, stale-while-revalidate");
        assert_eq!(json["articles"][0]["title"], "Newer");
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn empty_feed_is_still_ok() {
        let state = AppState::new(LatestPosts::with_source(StubSource(no_posts)), 60);
        let (status, _, json) = call(state).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["articles"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn exhaustion_is_503_and_uncached() {
        let state = AppState::new(LatestPosts::with_source(StubSource(exhausted)), 3600);
        let (status, cache_control, json) = call(state).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(cache_control, "no-store");
        assert_eq!(json["articles"], serde_json::json!([]));
        assert_eq!(json["error"], "Feed temporarily unavailable");
        assert_eq!(json["reason"], "source_unavailable");
    }
}
