use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::location::LocationError;

/// Social platform a post or place was fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Instagram,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Facebook, Platform::Instagram];
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Facebook => write!(f, "Facebook"),
            Platform::Instagram => write!(f, "Instagram"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "facebook" | "fb" => Ok(Platform::Facebook),
            "instagram" | "ig" => Ok(Platform::Instagram),
            other => Err(format!("unknown platform '{other}'")),
        }
    }
}

/// A WGS84 coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Builds a point, rejecting non-finite or out-of-range coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::Unavailable`] when latitude is outside
    /// `[-90, 90]`, longitude is outside `[-180, 180]`, or either is NaN/inf.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, LocationError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(LocationError::Unavailable(format!(
                "latitude {latitude} is out of range"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(LocationError::Unavailable(format!(
                "longitude {longitude} is out of range"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// `"lat,lon"` as expected by Graph API `center` parameters.
    #[must_use]
    pub fn to_center_param(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// Interaction counters on a post.
///
/// `shares` stays 0 for platforms that do not expose it (Instagram).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Engagement {
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
}

impl Engagement {
    /// Weighted interaction total: `likes + 2·comments + 3·shares`.
    #[must_use]
    pub fn weighted_total(&self) -> u64 {
        self.likes
            .saturating_add(self.comments.saturating_mul(2))
            .saturating_add(self.shares.saturating_mul(3))
    }
}

/// A post or media item, tagged with the platform it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub platform: Platform,
    pub id: String,
    /// Message body (Facebook) or caption (Instagram).
    pub text: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub location: Option<GeoPoint>,
    pub engagement: Engagement,
}

/// A venue returned by a location-scoped place search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub platform: Platform,
    /// Identifier accepted by the platform's post fetch: a page id on
    /// Facebook, a business account id on Instagram.
    pub id: String,
    pub name: String,
    /// Absent when the platform omits coordinates.
    pub location: Option<GeoPoint>,
    pub category: String,
    /// Checkins on Facebook, media count on Instagram.
    pub metric: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_parses_case_insensitively() {
        assert_eq!("Facebook".parse::<Platform>().unwrap(), Platform::Facebook);
        assert_eq!(" INSTAGRAM ".parse::<Platform>().unwrap(), Platform::Instagram);
        assert!("myspace".parse::<Platform>().is_err());
    }

    #[test]
    fn platform_serializes_lowercase_and_displays_title_case() {
        let json = serde_json::to_string(&Platform::Instagram).unwrap();
        assert_eq!(json, "\"instagram\"");
        assert_eq!(Platform::Instagram.to_string(), "Instagram");
    }

    #[test]
    fn geo_point_rejects_out_of_range() {
        assert!(GeoPoint::new(91.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -180.5).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(40.7128, -74.006).is_ok());
    }

    #[test]
    fn center_param_is_comma_joined() {
        let p = GeoPoint::new(40.5, -74.25).unwrap();
        assert_eq!(p.to_center_param(), "40.5,-74.25");
    }

    #[test]
    fn weighted_total_applies_comment_and_share_weights() {
        let e = Engagement {
            likes: 4,
            comments: 3,
            shares: 2,
        };
        assert_eq!(e.weighted_total(), 4 + 6 + 6);
    }
}
