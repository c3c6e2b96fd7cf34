// src/collect/reddit.rs
use crate::collect::types::{Listing, ListingFetcher, ListingMode, WirePost};
use crate::error::FetchError;
use crate::registry::SourceDescriptor;
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.reddit.com";

/// Reddit rejects anonymous clients without a descriptive User-Agent.
pub const USER_AGENT: &str = "PopCultureScraper/1.0 (Gen Z weekly roundup)";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Public `.json` listing endpoints, no OAuth.
pub struct RedditClient {
    http: reqwest::Client,
    base_url: String,
}

impl RedditClient {
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn listing_url(&self, source: &SourceDescriptor, mode: ListingMode) -> String {
        format!("{}/r/{}/{}.json", self.base_url, source.name, mode.path_segment())
    }
}

#[async_trait]
impl ListingFetcher for RedditClient {
    async fn fetch_listing(
        &self,
        source: &SourceDescriptor,
        mode: ListingMode,
    ) -> Result<Vec<WirePost>, FetchError> {
        let url = self.listing_url(source, mode);
        tracing::debug!(%url, "fetching listing");

        let resp = self.http.get(&url).query(&mode.query()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = resp.bytes().await?;
        let listing: Listing = serde_json::from_slice(&body)?;
        Ok(listing.into_posts())
    }

    fn name(&self) -> &'static str {
        "reddit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Tier;

    #[test]
    fn listing_url_shape() {
        let c = RedditClient::with_base_url("http://localhost:9999/").unwrap();
        let s = SourceDescriptor::new("movies", Tier::A, 25, 1.15);
        assert_eq!(
            c.listing_url(&s, ListingMode::Top),
            "http://localhost:9999/r/movies/top.json"
        );
        assert_eq!(
            c.listing_url(&s, ListingMode::Rising),
            "http://localhost:9999/r/movies/rising.json"
        );
    }
}
