//! Instagram business-account discovery and media feed.
//!
//! Instagram has no public location search. Places come from the Graph place
//! search, keeping only venues with a linked Instagram business account; the
//! resulting [`Place::id`] is that account id, which `fetch_posts` accepts.

use async_trait::async_trait;
use atlasiq_core::{Engagement, GeoPoint, Place, Platform, Post};
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::client::GraphClient;
use crate::error::PlatformError;
use crate::facebook::distance_param;
use crate::response::{count_field, geo_field, id_field, str_field, time_field};
use crate::source::PlatformSource;

const PLACE_FIELDS: &str =
    "id,name,location,category,instagram_business_account{id,media_count}";
const MEDIA_FIELDS: &str =
    "id,caption,media_type,media_url,timestamp,location,like_count,comments_count";

/// Instagram adapter over the shared [`GraphClient`].
#[derive(Debug, Clone)]
pub struct InstagramClient {
    graph: GraphClient,
    place_query: String,
}

impl InstagramClient {
    #[must_use]
    pub fn new(graph: GraphClient, place_query: &str) -> Self {
        Self {
            graph,
            place_query: place_query.to_owned(),
        }
    }
}

#[async_trait]
impl PlatformSource for InstagramClient {
    fn platform(&self) -> Platform {
        Platform::Instagram
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
            .get_page(Platform::Instagram, url, "business account search")
            .await?;

        let places: Vec<Place> = page.data.iter().filter_map(place_from_value).collect();
        tracing::debug!(
            platform = %Platform::Instagram,
            venues = page.data.len(),
            accounts = places.len(),
            "resolved Instagram business accounts near location"
        );

        Ok(places)
    }

    async fn fetch_posts(&self, account_id: &str, limit: u32) -> Result<Vec<Post>, PlatformError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let items = self
            .graph
            .fetch_paginated(
                Platform::Instagram,
                &[account_id, "media"],
                &[("fields", MEDIA_FIELDS)],
                limit,
                "account media",
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
                platform = %Platform::Instagram,
                account_id,
                skipped = total - posts.len(),
                "skipped media entries without an id"
            );
        }

        Ok(posts)
    }
}

fn place_from_value(item: &Value) -> Option<Place> {
    let account = item.get("instagram_business_account")?;
    Some(Place {
        platform: Platform::Instagram,
        id: id_field(account)?,
        name: str_field(item, "/name").unwrap_or_default(),
        location: geo_field(item, "/location"),
        category: str_field(item, "/category").unwrap_or_default(),
        metric: count_field(account, "/media_count"),
    })
}

fn post_from_value(item: &Value, fetched_at: DateTime<Utc>) -> Option<Post> {
    Some(Post {
        platform: Platform::Instagram,
        id: id_field(item)?,
        text: str_field(item, "/caption"),
        timestamp: time_field(item, "/timestamp").unwrap_or(fetched_at),
        location: geo_field(item, "/location"),
        engagement: Engagement {
            likes: count_field(item, "/like_count"),
            comments: count_field(item, "/comments_count"),
            shares: 0,
        },
    })
}
