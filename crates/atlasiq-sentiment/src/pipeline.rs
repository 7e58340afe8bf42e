//! Location-scoped analysis: fan out over platforms and places, then fold.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use atlasiq_core::{await_location, AppConfig, GeoPoint, LocalSentiment, LocationProvider, Post};
use atlasiq_meta::{retry_with_backoff, PlatformError, PlatformSource};
use futures::stream::{self, StreamExt};
use tracing::Instrument;
use uuid::Uuid;

use crate::aggregate::SentimentAggregator;
use crate::error::SentimentError;

/// Knobs for one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub radius_meters: f64,
    /// Places kept per platform; also the per-platform fetch concurrency.
    pub max_places: usize,
    pub posts_per_place: u32,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            radius_meters: 16_093.4,
            max_places: 5,
            posts_per_place: 25,
            max_retries: 2,
            backoff_base_ms: 500,
        }
    }
}

impl PipelineOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            radius_meters: config.search_radius_meters,
            max_places: config.max_places,
            posts_per_place: config.posts_per_place,
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
        }
    }
}

/// Fetches posts near a location from every configured platform and folds
/// them into one [`LocalSentiment`].
pub struct SentimentPipeline {
    sources: Vec<Arc<dyn PlatformSource>>,
    aggregator: SentimentAggregator,
    options: PipelineOptions,
}

impl std::fmt::Debug for SentimentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let platforms: Vec<String> = self
            .sources
            .iter()
            .map(|s| s.platform().to_string())
            .collect();
        f.debug_struct("SentimentPipeline")
            .field("platforms", &platforms)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl SentimentPipeline {
    #[must_use]
    pub fn new(
        sources: Vec<Arc<dyn PlatformSource>>,
        aggregator: SentimentAggregator,
        options: PipelineOptions,
    ) -> Self {
        Self {
            sources,
            aggregator,
            options,
        }
    }

    /// Runs one analysis around `origin`.
    ///
    /// Platforms are queried concurrently. A platform whose place search
    /// fails, or whose every place fetch fails, is left out of the result.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Platform`] with the first error, in source
    /// order, when every platform fails.
    pub async fn analyze(&self, origin: GeoPoint) -> Result<LocalSentiment, SentimentError> {
        let analysis_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "analysis",
            %analysis_id,
            latitude = origin.latitude,
            longitude = origin.longitude
        );
        self.run(origin).instrument(span).await
    }

    /// [`analyze`](Self::analyze), abandoned as soon as `cancel` completes.
    /// Partial results are discarded.
    ///
    /// # Errors
    ///
    /// [`SentimentError::Cancelled`] on cancellation, otherwise as `analyze`.
    pub async fn analyze_until<C>(
        &self,
        origin: GeoPoint,
        cancel: C,
    ) -> Result<LocalSentiment, SentimentError>
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            () = cancel => {
                tracing::info!("analysis cancelled");
                Err(SentimentError::Cancelled)
            }
            result = self.analyze(origin) => result,
        }
    }

    /// Waits up to `timeout` for a fix from `provider`, then analyzes around
    /// it. `cancel` covers both stages.
    ///
    /// # Errors
    ///
    /// - [`SentimentError::LocationUnavailable`] if no usable fix arrives.
    /// - [`SentimentError::Cancelled`] on cancellation.
    /// - Otherwise as [`analyze`](Self::analyze).
    pub async fn analyze_current_location<C>(
        &self,
        provider: &dyn LocationProvider,
        timeout: Duration,
        cancel: C,
    ) -> Result<LocalSentiment, SentimentError>
    where
        C: Future<Output = ()>,
    {
        tokio::pin!(cancel);
        let fix = await_location(provider, timeout, cancel.as_mut()).await?;
        if let Some(place) = &fix.place {
            tracing::info!(
                city = place.city.as_deref().unwrap_or(""),
                state = place.state.as_deref().unwrap_or(""),
                "location fix acquired"
            );
        }
        self.analyze_until(fix.point, cancel).await
    }

    async fn run(&self, origin: GeoPoint) -> Result<LocalSentiment, SentimentError> {
        tracing::info!(platforms = self.sources.len(), "starting sentiment analysis");

        let results = futures::future::join_all(
            self.sources
                .iter()
                .map(|source| self.collect_platform(source.as_ref(), origin)),
        )
        .await;

        let mut posts: Vec<Post> = Vec::new();
        let mut first_error: Option<PlatformError> = None;
        let mut succeeded = 0_usize;

        for (source, result) in self.sources.iter().zip(results) {
            match result {
                Ok(platform_posts) => {
                    succeeded += 1;
                    posts.extend(platform_posts);
                }
                Err(e) => {
                    tracing::warn!(
                        platform = %source.platform(),
                        error = %e,
                        "platform excluded from analysis"
                    );
                    first_error.get_or_insert(e);
                }
            }
        }

        if succeeded == 0 {
            if let Some(err) = first_error {
                return Err(err.into());
            }
        }

        let result = self.aggregator.aggregate_at(&posts, Some(origin));
        tracing::info!(
            total_posts = result.total_posts,
            score = result.overall.score,
            confidence = result.overall.confidence,
            "sentiment analysis complete"
        );
        Ok(result)
    }

    /// Posts from one platform: bounded place search, then an ordered,
    /// bounded fan-out of per-place fetches.
    async fn collect_platform(
        &self,
        source: &dyn PlatformSource,
        origin: GeoPoint,
    ) -> Result<Vec<Post>, PlatformError> {
        let platform = source.platform();
        let opts = &self.options;

        let mut places = retry_with_backoff(opts.max_retries, opts.backoff_base_ms, || {
            source.search_places(origin, opts.radius_meters)
        })
        .await?;
        places.truncate(opts.max_places);

        tracing::debug!(platform = %platform, count = places.len(), "places selected");
        if places.is_empty() {
            return Ok(Vec::new());
        }

        let fetches: Vec<_> = stream::iter(places.iter())
            .map(|place| async move {
                let result = retry_with_backoff(opts.max_retries, opts.backoff_base_ms, || {
                    source.fetch_posts(&place.id, opts.posts_per_place)
                })
                .await;
                (place, result)
            })
            .buffered(opts.max_places.max(1))
            .collect()
            .await;

        let mut posts: Vec<Post> = Vec::new();
        let mut first_error: Option<PlatformError> = None;
        let mut fetched_places = 0_usize;

        for (place, result) in fetches {
            match result {
                Ok(place_posts) => {
                    fetched_places += 1;
                    tracing::debug!(
                        platform = %platform,
                        place_id = %place.id,
                        count = place_posts.len(),
                        "fetched posts"
                    );
                    posts.extend(place_posts);
                }
                Err(e) => {
                    tracing::warn!(
                        platform = %platform,
                        place_id = %place.id,
                        error = %e,
                        "skipping place after failed post fetch"
                    );
                    first_error.get_or_insert(e);
                }
            }
        }

        if fetched_places == 0 {
            if let Some(err) = first_error {
                return Err(err);
            }
        }

        Ok(posts)
    }
}
