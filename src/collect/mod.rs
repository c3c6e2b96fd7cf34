// src/collect/mod.rs
//! Collection pipeline: fetch every (source, mode) listing, dedupe by id,
//! drop stale or untitled posts, rank by engagement and truncate.

pub mod reddit;
pub mod types;

use crate::collect::types::{ListingFetcher, ListingMode, RawPost, WirePost};
use crate::registry::SourceDescriptor;
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use std::collections::{HashMap, HashSet};

/// Posts older than this (relative to collection start) are dropped.
pub const RECENCY_WINDOW_SECS: f64 = 14.0 * 24.0 * 60.0 * 60.0;
/// Maximum length of the collected sequence.
pub const MAX_POSTS: usize = 250;
/// Selftext is cut to this many characters at collection time.
pub const SELFTEXT_MAX_CHARS: usize = 800;

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("collect_requests_total", "Listing requests issued.");
        describe_counter!(
            "collect_fetch_errors_total",
            "Listing requests that failed (network, status or body)."
        );
        describe_counter!("collect_posts_kept_total", "Posts admitted to the working set.");
        describe_counter!(
            "collect_posts_skipped_total",
            "Listing items dropped before ranking, by reason."
        );
    });
}

/// How `cap` and `weight` from the registry take part in ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankingPolicy {
    /// Rank by `score + 2 * num_comments`; cap and weight are descriptive only.
    #[default]
    Engagement,
    /// Rank by `weight * engagement` and keep at most `cap` posts per source.
    SourceWeighted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipReason {
    MissingId,
    Duplicate,
    EmptyTitle,
    Stale,
}

impl SkipReason {
    fn as_str(self) -> &'static str {
        match self {
            SkipReason::MissingId => "missing_id",
            SkipReason::Duplicate => "duplicate",
            SkipReason::EmptyTitle => "empty_title",
            SkipReason::Stale => "stale",
        }
    }
}

pub struct Collector {
    sources: Vec<SourceDescriptor>,
    fetcher: Box<dyn ListingFetcher>,
    policy: RankingPolicy,
}

impl Collector {
    pub fn new(sources: Vec<SourceDescriptor>, fetcher: Box<dyn ListingFetcher>) -> Self {
        Self {
            sources,
            fetcher,
            policy: RankingPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RankingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Collect using the current wall clock.
    pub async fn collect(&self) -> Vec<RawPost> {
        let now = chrono::Utc::now().timestamp_millis() as f64 / 1_000.0;
        self.collect_at(now).await
    }

    /// Collect with an explicit "now" (unix seconds). The cutoff is fixed once
    /// for the whole run.
    pub async fn collect_at(&self, now_utc: f64) -> Vec<RawPost> {
        ensure_metrics_described();
        let cutoff = now_utc - RECENCY_WINDOW_SECS;

        let mut seen: HashSet<String> = HashSet::new();
        let mut working: Vec<(usize, RawPost)> = Vec::new();

        for (idx, source) in self.sources.iter().enumerate() {
            for mode in ListingMode::ALL {
                counter!("collect_requests_total").increment(1);
                let items = match self.fetcher.fetch_listing(source, mode).await {
                    Ok(items) => items,
                    Err(e) => {
                        tracing::warn!(
                            source = %source.name,
                            mode = %mode,
                            fetcher = self.fetcher.name(),
                            error = %e,
                            "failed r/{} ({})",
                            source.name,
                            mode
                        );
                        counter!("collect_fetch_errors_total").increment(1);
                        continue;
                    }
                };

                let found = items.len();
                let mut kept = 0usize;
                for wire in items {
                    match admit(&mut seen, wire, source, cutoff) {
                        Ok(post) => {
                            kept += 1;
                            working.push((idx, post));
                        }
                        Err(reason) => {
                            counter!("collect_posts_skipped_total", "reason" => reason.as_str())
                                .increment(1);
                        }
                    }
                }
                counter!("collect_posts_kept_total").increment(kept as u64);
                tracing::debug!(source = %source.name, mode = %mode, found, kept, "listing merged");
            }
        }

        let ranked = rank(working, &self.sources, self.policy);
        tracing::info!(
            collected = ranked.len(),
            sources = self.sources.len(),
            "collection finished"
        );
        ranked
    }
}

/// Turn one wire item into a post, or say why it was dropped. An id is marked
/// seen as soon as it is encountered, even if a later check rejects the item.
fn admit(
    seen: &mut HashSet<String>,
    wire: WirePost,
    source: &SourceDescriptor,
    cutoff: f64,
) -> Result<RawPost, SkipReason> {
    let id = match wire.id {
        Some(id) if !id.is_empty() => id,
        _ => return Err(SkipReason::MissingId),
    };
    if !seen.insert(id.clone()) {
        return Err(SkipReason::Duplicate);
    }

    let title = decode(wire.title.as_deref().unwrap_or_default()).trim().to_string();
    if title.is_empty() {
        return Err(SkipReason::EmptyTitle);
    }
    let selftext = truncate_chars(
        decode(wire.selftext.as_deref().unwrap_or_default()).trim(),
        SELFTEXT_MAX_CHARS,
    );

    let created_utc = wire.created_utc.unwrap_or(0.0);
    if created_utc < cutoff {
        return Err(SkipReason::Stale);
    }

    let subreddit = if source.name.is_empty() {
        wire.subreddit.unwrap_or_default()
    } else {
        source.name.clone()
    };

    Ok(RawPost {
        id,
        title,
        selftext,
        subreddit,
        score: wire.score.unwrap_or(0),
        num_comments: wire.num_comments.unwrap_or(0),
        created_utc,
    })
}

/// Stable sort by the policy's key (descending), then truncate to [`MAX_POSTS`].
fn rank(
    working: Vec<(usize, RawPost)>,
    sources: &[SourceDescriptor],
    policy: RankingPolicy,
) -> Vec<RawPost> {
    let mut ranked: Vec<RawPost> = match policy {
        RankingPolicy::Engagement => {
            let mut posts: Vec<RawPost> = working.into_iter().map(|(_, p)| p).collect();
            posts.sort_by(|a, b| b.engagement().cmp(&a.engagement()));
            posts
        }
        RankingPolicy::SourceWeighted => {
            let mut scored: Vec<(usize, f64, RawPost)> = working
                .into_iter()
                .map(|(idx, p)| {
                    let w = sources.get(idx).map(|s| s.weight).unwrap_or(1.0) as f64;
                    (idx, w * p.engagement() as f64, p)
                })
                .collect();
            scored.sort_by(|a, b| b.1.total_cmp(&a.1));

            let mut per_source: HashMap<usize, u32> = HashMap::new();
            scored
                .into_iter()
                .filter(|(idx, _, _)| {
                    let cap = sources.get(*idx).map(|s| s.cap).unwrap_or(u32::MAX);
                    let n = per_source.entry(*idx).or_insert(0);
                    if *n >= cap {
                        return false;
                    }
                    *n += 1;
                    true
                })
                .map(|(_, _, p)| p)
                .collect()
        }
    };
    ranked.truncate(MAX_POSTS);
    ranked
}

fn decode(s: &str) -> std::borrow::Cow<'_, str> {
    html_escape::decode_html_entities(s)
}

/// Keep at most `max` characters (not bytes).
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => s[..byte_idx].to_string(),
        None => s.to_string(),
    }
}
