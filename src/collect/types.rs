// src/collect/types.rs
use crate::error::FetchError;
use crate::registry::SourceDescriptor;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Normalized post record produced by the collector.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPost {
    pub id: String,
    pub title: String,
    /// Trimmed and cut to 800 characters.
    pub selftext: String,
    pub subreddit: String,
    pub score: i64,
    pub num_comments: i64,
    /// Unix seconds.
    pub created_utc: f64,
}

impl RawPost {
    /// Ranking key: `score + 2 * num_comments`.
    pub fn engagement(&self) -> i64 {
        self.score.saturating_add(self.num_comments.saturating_mul(2))
    }
}

/// Retrieval strategy against one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingMode {
    /// Top of the past month.
    Top,
    /// Currently trending.
    Hot,
    /// Rising / emerging.
    Rising,
}

impl ListingMode {
    /// Query order used for every source.
    pub const ALL: [ListingMode; 3] = [ListingMode::Top, ListingMode::Hot, ListingMode::Rising];

    pub fn path_segment(self) -> &'static str {
        match self {
            ListingMode::Top => "top",
            ListingMode::Hot => "hot",
            ListingMode::Rising => "rising",
        }
    }

    pub fn limit(self) -> u32 {
        match self {
            ListingMode::Top => 100,
            ListingMode::Hot => 75,
            ListingMode::Rising => 50,
        }
    }

    /// Query parameters sent with the listing request.
    pub fn query(self) -> Vec<(&'static str, String)> {
        let mut q = Vec::with_capacity(2);
        if self == ListingMode::Top {
            q.push(("t", "month".to_string()));
        }
        q.push(("limit", self.limit().to_string()));
        q
    }
}

impl fmt::Display for ListingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// One item of a listing as it comes off the wire. Every field is optional;
/// defaults are applied by the collector.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WirePost {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub selftext: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subreddit: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub score: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub num_comments: Option<i64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub created_utc: Option<f64>,
}

/// `{ "data": { "children": [ { "data": { ... } } ] } }`
#[derive(Debug, Default, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub data: ListingData,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<ListingChild>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListingChild {
    #[serde(default, deserialize_with = "lenient_post")]
    pub data: WirePost,
}

impl Listing {
    pub fn into_posts(self) -> Vec<WirePost> {
        self.data.children.into_iter().map(|c| c.data).collect()
    }
}

/// Transport for one (source, mode) listing.
#[async_trait::async_trait]
pub trait ListingFetcher: Send + Sync {
    async fn fetch_listing(
        &self,
        source: &SourceDescriptor,
        mode: ListingMode,
    ) -> Result<Vec<WirePost>, FetchError>;
    fn name(&self) -> &'static str;
}

// Anything but a JSON string (numbers, objects, null) counts as absent.
fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let v = Option::<serde_json::Value>::deserialize(d)?;
    Ok(match v {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    })
}

// A null or non-object child becomes an empty item, which the collector skips.
fn lenient_post<'de, D: Deserializer<'de>>(d: D) -> Result<WirePost, D::Error> {
    let v = Option::<serde_json::Value>::deserialize(d)?;
    Ok(match v {
        Some(obj @ serde_json::Value::Object(_)) => {
            serde_json::from_value(obj).unwrap_or_default()
        }
        _ => WirePost::default(),
    })
}

// Numbers sometimes arrive as floats, strings or null.
fn lenient_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    let v = Option::<serde_json::Value>::deserialize(d)?;
    Ok(match v {
        Some(serde_json::Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let v = Option::<serde_json::Value>::deserialize(d)?;
    Ok(match v {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_none() {
        let body = r#"{"data":{"children":[{"data":{"id":"a1"}},{"kind":"t3"}]}}"#;
        let posts = serde_json::from_str::<Listing>(body).unwrap().into_posts();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id.as_deref(), Some("a1"));
        assert!(posts[0].title.is_none());
        assert!(posts[0].score.is_none());
        assert_eq!(posts[1], WirePost::default());
    }

    #[test]
    fn numbers_are_parsed_leniently() {
        let body = r#"{"id":"x","score":12.0,"num_comments":"7","created_utc":1700000000}"#;
        let p: WirePost = serde_json::from_str(body).unwrap();
        assert_eq!(p.score, Some(12));
        assert_eq!(p.num_comments, Some(7));
        assert_eq!(p.created_utc, Some(1_700_000_000.0));

        let p: WirePost = serde_json::from_str(r#"{"score":null,"created_utc":"n/a"}"#).unwrap();
        assert_eq!(p.score, None);
        assert_eq!(p.created_utc, None);
    }

    #[test]
    fn one_malformed_item_does_not_sink_the_listing() {
        let body = r#"{"data":{"children":[
            {"data":{"id":"ok1","title":"Premiere night","score":10}},
            {"data":{"id":"t2","title":12345,"selftext":["x"]}},
            {"data":null},
            {"data":"not an item"},
            {"data":{"id":987,"title":"Numeric id","subreddit":{"name":"movies"}}}
        ]}}"#;
        let posts = serde_json::from_str::<Listing>(body).unwrap().into_posts();
        assert_eq!(posts.len(), 5);

        assert_eq!(posts[0].id.as_deref(), Some("ok1"));
        assert_eq!(posts[0].title.as_deref(), Some("Premiere night"));
        assert_eq!(posts[0].score, Some(10));

        assert_eq!(posts[1].id.as_deref(), Some("t2"));
        assert!(posts[1].title.is_none());
        assert!(posts[1].selftext.is_none());

        assert_eq!(posts[2], WirePost::default());
        assert_eq!(posts[3], WirePost::default());

        assert!(posts[4].id.is_none());
        assert_eq!(posts[4].title.as_deref(), Some("Numeric id"));
        assert!(posts[4].subreddit.is_none());
    }

    #[test]
    fn empty_object_is_an_empty_listing() {
        let l: Listing = serde_json::from_str("{}").unwrap();
        assert!(l.into_posts().is_empty());
    }

    #[test]
    fn mode_queries() {
        assert_eq!(
            ListingMode::Top.query(),
            vec![("t", "month".to_string()), ("limit", "100".to_string())]
        );
        assert_eq!(ListingMode::Hot.query(), vec![("limit", "75".to_string())]);
        assert_eq!(ListingMode::Rising.query(), vec![("limit", "50".to_string())]);
        assert_eq!(ListingMode::Rising.to_string(), "rising");
    }

    #[test]
    fn engagement_weights_comments_double() {
        let p = RawPost {
            id: "x".into(),
            title: "t".into(),
            selftext: String::new(),
            subreddit: "movies".into(),
            score: 10,
            num_comments: 4,
            created_utc: 0.0,
        };
        assert_eq!(p.engagement(), 18);
    }
}
