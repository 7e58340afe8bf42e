//! Location collaborator contract.
//!
//! The engine does not own location services. A [`LocationProvider`]
//! supplies a coordinate fix, and [`await_location`] turns "wait for a fix,
//! else give up" into one awaitable with a timeout and a cancellation signal.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::GeoPoint;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// No usable location: permission denied, no fix in time, bad coordinates.
    #[error("location unavailable: {0}")]
    Unavailable(String),

    #[error("location request cancelled")]
    Cancelled,
}

/// Reverse-geocoded place name strings, when the provider has them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaceName {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// A coordinate fix plus optional reverse-geocode data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub point: GeoPoint,
    pub place: Option<PlaceName>,
}

/// Source of the caller's current location.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Resolves to the current fix. May wait indefinitely; callers bound the
    /// wait with [`await_location`].
    async fn current_fix(&self) -> Result<LocationFix, LocationError>;
}

/// Provider for a coordinate pair that is already known.
#[derive(Debug, Clone)]
pub struct FixedLocation {
    fix: LocationFix,
}

impl FixedLocation {
    /// # Errors
    ///
    /// Returns [`LocationError::Unavailable`] if the coordinates are invalid.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, LocationError> {
        Ok(Self {
            fix: LocationFix {
                point: GeoPoint::new(latitude, longitude)?,
                place: None,
            },
        })
    }

    #[must_use]
    pub fn with_place(mut self, place: PlaceName) -> Self {
        self.fix.place = Some(place);
        self
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_fix(&self) -> Result<LocationFix, LocationError> {
        Ok(self.fix.clone())
    }
}

/// Waits for a location fix, bounded by `timeout` and abandoned if `cancel`
/// completes first.
///
/// # Errors
///
/// - [`LocationError::Unavailable`] if the provider fails or no fix arrives
///   within `timeout`.
/// - [`LocationError::Cancelled`] if `cancel` resolves first.
pub async fn await_location<C>(
    provider: &dyn LocationProvider,
    timeout: Duration,
    cancel: C,
) -> Result<LocationFix, LocationError>
where
    C: Future<Output = ()>,
{
    tokio::select! {
        biased;
        () = cancel => Err(LocationError::Cancelled),
        result = tokio::time::timeout(timeout, provider.current_fix()) => match result {
            Ok(fix) => fix,
            Err(_) => Err(LocationError::Unavailable(format!(
                "no location fix within {} ms",
                timeout.as_millis()
            ))),
        },
    }
}
