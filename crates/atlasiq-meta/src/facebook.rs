//! Facebook place search and page post feed.

use async_trait::async_trait;
use atlasiq_core::{Engagement, GeoPoint, Place, Platform, Post};
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::client::GraphClient;
use crate::error::PlatformError;
use crate::response::{count_field, geo_field, id_field, str_field, time_field};
use crate::source::PlatformSource;

const PLACE_FIELDS: &str = "id,name,location,category,checkins";
const POST_FIELDS: &str =
    "id,message,created_time,place,likes.summary(true),comments.summary(true),shares";

/// Facebook adapter over the shared [`GraphClient`].
#[derive(Debug, Clone)]
pub struct FacebookClient {
    graph: GraphClient,
    place_query: String,
}

impl FacebookClient {
    /// `place_query` is the free-text `q` used for place search
    /// (e.g. `"restaurant"`).
    #[must_use]
    pub fn new(graph: GraphClient, place_query: &str) -> Self {
        Self {
            graph,
            place_query: place_query.to_owned(),
        }
    }
}

#[async_trait]
impl PlatformSource for FacebookClient {
    fn platform(&self) -> Platform {
        Platform::Facebook
    }

    async fn search_places(
        &self,
        location: GeoPoint,
        radius_meters: f64,
    ) -> Result<Vec<Place>, PlatformError> {
        let center = location.to_center_param();
        let distance = distance_param(radius_meters);
        let url = self.graph.build_url(
            &["search"],
            &[
                ("q", self.place_query.as_str()),
                ("type", "place"),
                ("center", center.as_str()),
                ("distance", distance.as_str()),
                ("fields", PLACE_FIELDS),
            ],
        );

        let page = self
            .graph
            .get_page(Platform::Facebook, url, "place search")
            .await?;

        let total = page.data.len();
        let places: Vec<Place> = page.data.iter().filter_map(place_from_value).collect();
        if places.len() < total {
            tracing::warn!(
                platform = %Platform::Facebook,
                skipped = total - places.len(),
                "skipped place entries without an id"
            );
        }

        Ok(places)
    }

    async fn fetch_posts(&self, page_id: &str, limit: u32) -> Result<Vec<Post>, PlatformError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let items = self
            .graph
            .fetch_paginated(
                Platform::Facebook,
                &[page_id, "posts"],
                &[("fields", POST_FIELDS)],
                limit,
                "page posts",
            )
            .await?;

        let fetched_at = Utc::now();
        let total = items.len();
        let posts: Vec<Post> = items
            .iter()
            .filter_map(|item| post_from_value(item, fetched_at))
            .collect();
        if posts.len() < total {
            tracing::warn!(
                platform = %Platform::Facebook,
                page_id,
                skipped = total - posts.len(),
                "skipped post entries without an id"
            );
        }

        Ok(posts)
    }
}

/// Graph expects an integral meter distance.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn distance_param(radius_meters: f64) -> String {
    (radius_meters.max(0.0).round() as u64).to_string()
}

fn place_from_value(item: &Value) -> Option<Place> {
    Some(Place {
        platform: Platform::Facebook,
        id: id_field(item)?,
        name: str_field(item, "/name").unwrap_or_default(),
        location: geo_field(item, "/location"),
        category: str_field(item, "/category").unwrap_or_default(),
        metric: count_field(item, "/checkins"),
    })
}

fn post_from_value(item: &Value, fetched_at: DateTime<Utc>) -> Option<Post> {
    Some(Post {
        platform: Platform::Facebook,
        id: id_field(item)?,
        text: str_field(item, "/message"),
        timestamp: time_field(item, "/created_time").unwrap_or(fetched_at),
        location: geo_field(item, "/place/location"),
        engagement: Engagement {
            likes: count_field(item, "/likes/summary/total_count"),
            comments: count_field(item, "/comments/summary/total_count"),
            shares: count_field(item, "/shares/count"),
        },
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn post_maps_nested_engagement_summaries() {
        let item = json!({
            "id": "1_2",
            "message": "Great brunch spot",
            "created_time": "2025-09-19T10:00:00+0000",
            "place": { "location": { "latitude": 40.7, "longitude": -74.0 } },
            "likes": { "summary": { "total_count": 12 } },
            "comments": { "summary": { "total_count": 3 } },
            "shares": { "count": 2 }
        });
        let post = post_from_value(&item, Utc::now()).unwrap();
        assert_eq!(post.id, "1_2");
        assert_eq!(post.text.as_deref(), Some("Great brunch spot"));
        assert_eq!(
            post.engagement,
            Engagement {
                likes: 12,
                comments: 3,
                shares: 2
            }
        );
        assert!(post.location.is_some());
    }

    #[test]
    fn post_defaults_missing_optional_fields() {
        let fetched_at = Utc::now();
        let item = json!({ "id": "9", "likes": "lots", "created_time": 17 });
        let post = post_from_value(&item, fetched_at).unwrap();
        assert!(post.text.is_none());
        assert_eq!(post.timestamp, fetched_at);
        assert_eq!(post.engagement, Engagement::default());
    }

    #[test]
    fn post_without_id_is_dropped() {
        assert!(post_from_value(&json!({ "message": "hi" }), Utc::now()).is_none());
    }

    #[test]
    fn place_maps_checkins_to_metric() {
        let item = json!({
            "id": "77",
            "name": "Joe's",
            "category": "Restaurant",
            "checkins": 1500,
            "location": { "latitude": 40.0, "longitude": -73.9 }
        });
        let place = place_from_value(&item).unwrap();
        assert_eq!(place.metric, 1500);
        assert_eq!(place.category, "Restaurant");
    }

    #[test]
    fn distance_is_rounded_meters() {
        assert_eq!(distance_param(16_093.4), "16093");
        assert_eq!(distance_param(-5.0), "0");
    }
}
