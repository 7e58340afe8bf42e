//! Shared domain types and configuration for the AtlasIQ sentiment engine.
//!
//! Everything here is plain data: platform-tagged posts and places, the
//! sentiment result model handed to presentation layers, env-driven
//! configuration, and the location collaborator contract.

pub mod app_config;
pub mod categories;
pub mod config;
pub mod location;
pub mod sentiment;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use categories::{default_categories, load_categories, CategoriesFile, CategoryConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use location::{
    await_location, FixedLocation, LocationError, LocationFix, LocationProvider, PlaceName,
};
pub use sentiment::{Emotion, LocalSentiment, SentimentBreakdown, SentimentFactor, SentimentScore};
pub use types::{Engagement, GeoPoint, Place, Platform, Post};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read categories file {path}: {source}")]
    CategoriesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse categories file: {0}")]
    CategoriesFileParse(#[source] serde_yaml::Error),

    #[error("category validation failed: {0}")]
    Validation(String),
}
