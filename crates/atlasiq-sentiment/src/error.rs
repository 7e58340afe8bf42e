use atlasiq_core::LocationError;
use atlasiq_meta::PlatformError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    /// A platform failure, passed through unmodified.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("analysis cancelled")]
    Cancelled,
}

impl From<LocationError> for SentimentError {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::Unavailable(reason) => SentimentError::LocationUnavailable(reason),
            LocationError::Cancelled => SentimentError::Cancelled,
        }
    }
}
