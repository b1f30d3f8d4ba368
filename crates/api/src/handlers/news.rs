//! Legal news search over the configured RSS/Atom feeds.

use std::time::Duration;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use futures::future::join_all;
use mediar_core::news::{filter_entries, parse_feed, FeedEntry};
use mediar_core::paging::clamp_limit;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

const FEED_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_NEWS_LIMIT: i64 = 50;
const MAX_NEWS_LIMIT: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct NewsParams {
    #[serde(default)]
    pub q: String,
    pub limit: Option<i64>,
}

/// Fetch and parse one feed. Failures are logged and yield no entries.
async fn fetch_feed(http: &reqwest::Client, url: &str) -> Vec<FeedEntry> {
    let body = async {
        let response = http
            .get(url)
            .timeout(FEED_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;
        response.text().await
    }
    .await;

    match body {
        Ok(xml) => {
            let entries = parse_feed(&xml, url);
            tracing::debug!(feed = url, entries = entries.len(), "Feed fetched");
            entries
        }
        Err(e) => {
            tracing::warn!(feed = url, error = %e, "Feed fetch failed, skipping");
            Vec::new()
        }
    }
}

/// GET /api/v1/news?q=&limit=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<NewsParams>,
) -> AppResult<impl IntoResponse> {
    let feeds = join_all(
        state
            .config
            .news_feeds
            .iter()
            .map(|url| fetch_feed(&state.http, url)),
    )
    .await;

    let limit = clamp_limit(params.limit, DEFAULT_NEWS_LIMIT, MAX_NEWS_LIMIT) as usize;
    let mut entries = filter_entries(feeds.into_iter().flatten().collect(), &params.q);
    entries.truncate(limit);

    Ok(Json(DataResponse { data: entries }))
}
