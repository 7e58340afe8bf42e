use async_trait::async_trait;
use atlasiq_core::{GeoPoint, Place, Platform, Post};

use crate::error::PlatformError;

/// One external platform the sentiment pipeline can pull from.
///
/// Implementations gate every request through the shared rate limiter and
/// perform no retries of their own.
#[async_trait]
pub trait PlatformSource: Send + Sync {
    fn platform(&self) -> Platform;

    /// Places within `radius_meters` of `location`.
    ///
    /// # Errors
    ///
    /// [`PlatformError::RateLimited`], [`PlatformError::RequestFailed`] or
    /// [`PlatformError::MalformedResponse`].
    async fn search_places(
        &self,
        location: GeoPoint,
        radius_meters: f64,
    ) -> Result<Vec<Place>, PlatformError>;

    /// Up to `limit` most recent posts for a place or account id.
    ///
    /// # Errors
    ///
    /// [`PlatformError::RateLimited`], [`PlatformError::RequestFailed`] or
    /// [`PlatformError::MalformedResponse`].
    async fn fetch_posts(&self, id: &str, limit: u32) -> Result<Vec<Post>, PlatformError>;
}
