//! Command handlers for `analyze` and `score`.

use std::sync::Arc;
use std::time::Duration;

use atlasiq_core::{default_categories, load_categories, AppConfig, FixedLocation, Platform};
use atlasiq_meta::{FacebookClient, GraphClient, InstagramClient, PlatformSource, RateLimiter};
use atlasiq_sentiment::{
    BreakdownEnricher, CategoryEnricher, PipelineOptions, SentimentAggregator, SentimentPipeline,
    SentimentScorer, SummaryEnricher,
};

/// How long `analyze` waits for the location fix before giving up.
const LOCATION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AnalyzeRequest {
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    pub(crate) radius_meters: Option<f64>,
    pub(crate) platforms: Vec<Platform>,
    pub(crate) categorize: bool,
}

/// Runs one analysis and prints the `LocalSentiment` as pretty JSON.
///
/// Ctrl-C abandons the analysis.
///
/// # Errors
///
/// Returns an error for invalid coordinates or radius, an unreadable
/// categories file, client construction failures, or when every selected
/// platform fails.
pub(crate) async fn run_analyze(config: &AppConfig, request: AnalyzeRequest) -> anyhow::Result<()> {
    let location = FixedLocation::new(request.latitude, request.longitude)?;

    let mut options = PipelineOptions::from_config(config);
    if let Some(radius) = request.radius_meters {
        if !radius.is_finite() || radius <= 0.0 {
            anyhow::bail!("--radius must be a positive number of meters, got {radius}");
        }
        options.radius_meters = radius;
    }

    let enricher: Arc<dyn BreakdownEnricher> = if request.categorize {
        let categories = match &config.categories_path {
            Some(path) => load_categories(path)?.categories,
            None => default_categories(),
        };
        Arc::new(CategoryEnricher::new(categories))
    } else {
        Arc::new(SummaryEnricher)
    };

    let sources = build_sources(config, &selected_platforms(&request.platforms))?;
    let pipeline = SentimentPipeline::new(
        sources,
        SentimentAggregator::new(SentimentScorer::default(), enricher),
        options,
    );

    let result = pipeline
        .analyze_current_location(&location, LOCATION_TIMEOUT, ctrl_c())
        .await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Scores `text` without touching the network.
///
/// # Errors
///
/// Returns an error only if the score cannot be serialized.
pub(crate) fn run_score(text: &str) -> anyhow::Result<()> {
    let score = SentimentScorer::default().score_text(text);
    println!("{}", serde_json::to_string_pretty(&score)?);
    Ok(())
}

/// Requested platforms in canonical order without duplicates; every platform
/// when none were named.
pub(crate) fn selected_platforms(requested: &[Platform]) -> Vec<Platform> {
    if requested.is_empty() {
        return Platform::ALL.to_vec();
    }
    let mut platforms = requested.to_vec();
    platforms.sort_unstable();
    platforms.dedup();
    platforms
}

/// Both clients share one Graph client, and with it one rate limiter.
fn build_sources(
    config: &AppConfig,
    platforms: &[Platform],
) -> anyhow::Result<Vec<Arc<dyn PlatformSource>>> {
    let limiter = Arc::new(RateLimiter::new(config.max_calls_per_hour));
    let graph = GraphClient::with_base_url(
        &config.meta_access_token,
        config.request_timeout_secs,
        &config.meta_graph_base_url,
        limiter,
    )?;

    Ok(platforms
        .iter()
        .map(|platform| -> Arc<dyn PlatformSource> {
            match platform {
                Platform::Facebook => {
                    Arc::new(FacebookClient::new(graph.clone(), &config.place_query))
                }
                Platform::Instagram => {
                    Arc::new(InstagramClient::new(graph.clone(), &config.place_query))
                }
            }
        })
        .collect())
}

/// Resolves on Ctrl-C. If the handler cannot be installed the analysis
/// simply runs uncancellable.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("received ctrl-c, cancelling analysis");
}
