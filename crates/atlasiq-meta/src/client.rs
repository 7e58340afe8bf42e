//! HTTP core shared by the Facebook and Instagram clients.
//!
//! Wraps `reqwest` with Graph-specific URL building, access-token handling,
//! rate-limit gating, status mapping, and cursor pagination. Every HTTP
//! request, including each page of a paginated fetch, takes one permit from
//! the shared [`RateLimiter`].

use std::sync::Arc;
use std::time::Duration;

use atlasiq_core::Platform;
use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::PlatformError;
use crate::rate_limit::RateLimiter;
use crate::response::{graph_error_message, GraphPage};

pub const DEFAULT_BASE_URL: &str = "https://graph.facebook.com/v18.0";

/// Largest page size requested from collection endpoints.
const MAX_PAGE_SIZE: usize = 100;

/// Upper bound on pages followed for one fetch. Guards against cycling cursors.
const MAX_PAGES: usize = 20;

/// Graph API client holding the HTTP pool, token, base URL and quota.
///
/// Cheap to clone; clones share the connection pool and the rate limiter.
#[derive(Clone)]
pub struct GraphClient {
    client: Client,
    access_token: String,
    base_url: Url,
    limiter: Arc<RateLimiter>,
}

impl std::fmt::Debug for GraphClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphClient")
            .field("base_url", &self.base_url.as_str())
            .field("access_token", &"[redacted]")
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}

impl GraphClient {
    /// Creates a client pointed at the production Graph API.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::InvalidBaseUrl`] if the HTTP client cannot be built.
    pub fn new(
        access_token: &str,
        timeout_secs: u64,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self, PlatformError> {
        Self::with_base_url(access_token, timeout_secs, DEFAULT_BASE_URL, limiter)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::InvalidBaseUrl`] if `base_url` does not parse
    /// as a hierarchical URL or the HTTP client cannot be built.
    pub fn with_base_url(
        access_token: &str,
        timeout_secs: u64,
        base_url: &str,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self, PlatformError> {
        let invalid = |reason: String| PlatformError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason,
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs))
            .user_agent("atlasiq/0.1 (local-sentiment)")
            .build()
            .map_err(|e| invalid(format!("failed to build HTTP client: {e}")))?;

        let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(invalid("URL cannot be used as a base".to_owned()));
        }

        Ok(Self {
            client,
            access_token: access_token.to_owned(),
            base_url: parsed,
            limiter,
        })
    }

    #[must_use]
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Builds `{base}/{segments...}?{params}&access_token=…` with every
    /// segment and value percent-encoded.
    pub(crate) fn build_url(&self, segments: &[&str], params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("access_token", &self.access_token);
        }
        url
    }

    /// Takes a permit, sends a GET, maps the status, and decodes the envelope.
    ///
    /// The URL is never logged because it carries the access token.
    ///
    /// # Errors
    ///
    /// - [`PlatformError::RateLimited`] if the limiter denies the call.
    /// - [`PlatformError::RequestFailed`] on transport failure, timeout, or non-2xx.
    /// - [`PlatformError::MalformedResponse`] if the body is not a `data` envelope.
    pub(crate) async fn get_page(
        &self,
        platform: Platform,
        url: Url,
        context: &str,
    ) -> Result<GraphPage, PlatformError> {
        if !self.limiter.try_acquire() {
            tracing::warn!(platform = %platform, context, "local Graph API quota exhausted");
            return Err(PlatformError::RateLimited {
                platform,
                max_calls: self.limiter.max_calls(),
            });
        }

        tracing::debug!(platform = %platform, context, "Graph API request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PlatformError::from_transport(platform, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PlatformError::from_transport(platform, e))?;

        if !status.is_success() {
            let reason = graph_error_message(&body)
                .map_or_else(|| format!("HTTP {status}"), |msg| format!("HTTP {status}: {msg}"));
            return Err(PlatformError::RequestFailed {
                platform,
                status: Some(status.as_u16()),
                reason,
            });
        }

        serde_json::from_str::<GraphPage>(&body).map_err(|e| PlatformError::MalformedResponse {
            platform,
            context: context.to_owned(),
            reason: e.to_string(),
        })
    }

    /// Follows `after` cursors until `limit` entries are collected, the API
    /// stops advertising a next page, or the page cap is reached.
    ///
    /// # Errors
    ///
    /// Propagates the first [`PlatformError`] from any page request.
    pub(crate) async fn fetch_paginated(
        &self,
        platform: Platform,
        segments: &[&str],
        params: &[(&str, &str)],
        limit: u32,
        context: &str,
    ) -> Result<Vec<Value>, PlatformError> {
        let target = usize::try_from(limit).unwrap_or(usize::MAX);
        let mut items: Vec<Value> = Vec::new();
        let mut after: Option<String> = None;

        for _ in 0..MAX_PAGES {
            if items.len() >= target {
                break;
            }
            let remaining = target - items.len();
            let page_size = remaining.min(MAX_PAGE_SIZE).to_string();

            let mut page_params: Vec<(&str, &str)> = params.to_vec();
            page_params.push(("limit", page_size.as_str()));
            if let Some(cursor) = &after {
                page_params.push(("after", cursor.as_str()));
            }

            let url = self.build_url(segments, &page_params);
            let page = self.get_page(platform, url, context).await?;

            let received = page.data.len();
            let cursor = page.next_cursor();
            items.extend(page.data.into_iter().take(remaining));

            if received == 0 || cursor.is_none() {
                break;
            }
            after = cursor;
        }

        tracing::debug!(
            platform = %platform,
            context,
            count = items.len(),
            "collected Graph API entries"
        );

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> GraphClient {
        GraphClient::with_base_url("test-token", 5, base_url, Arc::new(RateLimiter::new(10)))
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_appends_segments_under_version_path() {
        let client = test_client("https://graph.facebook.com/v18.0");
        let url = client.build_url(&["123", "posts"], &[("fields", "id,message")]);
        assert_eq!(
            url.as_str(),
            "https://graph.facebook.com/v18.0/123/posts?fields=id%2Cmessage&access_token=test-token"
        );
    }

    #[test]
    fn build_url_tolerates_trailing_slash() {
        let client = test_client("https://graph.facebook.com/v18.0/");
        let url = client.build_url(&["search"], &[]);
        assert_eq!(
            url.as_str(),
            "https://graph.facebook.com/v18.0/search?access_token=test-token"
        );
    }

    #[test]
    fn build_url_encodes_segment_characters() {
        let client = test_client("http://localhost:9999");
        let url = client.build_url(&["a/b"], &[]);
        assert!(url.path().ends_with("/a%2Fb"), "segment not encoded: {url}");
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let result =
            GraphClient::with_base_url("t", 5, "not a url", Arc::new(RateLimiter::default()));
        assert!(matches!(result, Err(PlatformError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn debug_redacts_token() {
        let client = test_client("https://graph.facebook.com/v18.0");
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("test-token"));
    }
}
