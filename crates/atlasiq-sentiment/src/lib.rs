//! Local-area sentiment scoring and aggregation.
//!
//! Cleans post text, scores it with a base polarity model blended with
//! keyword lexicons, amplifies by engagement, and folds per-post scores
//! into per-platform and overall results. [`SentimentPipeline`] drives the
//! whole flow from a location to a [`atlasiq_core::LocalSentiment`].

pub mod aggregate;
pub mod breakdown;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod preprocess;
pub mod scorer;

mod lexicon;

pub use aggregate::{ScoredPost, SentimentAggregator};
pub use breakdown::{BreakdownEnricher, BreakdownScope, CategoryEnricher, SummaryEnricher};
pub use error::SentimentError;
pub use model::{PolarityModel, WeightedLexiconModel};
pub use pipeline::{PipelineOptions, SentimentPipeline};
pub use preprocess::TextPreprocessor;
pub use scorer::{engagement_level, SentimentScorer};
