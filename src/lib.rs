// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod app;
pub mod collect;
pub mod config;
pub mod digest;
pub mod error;
pub mod registry;
pub mod report;
pub mod summarize;

// ---- Re-exports for stable public API ----
pub use crate::app::{run, RunOutcome};
pub use crate::collect::types::{ListingFetcher, ListingMode, RawPost, WirePost};
pub use crate::collect::{Collector, RankingPolicy};
pub use crate::config::AppConfig;
pub use crate::digest::{format_digest, NO_POSTS_SENTINEL};
pub use crate::error::{FetchError, RunError, SummarizeError};
pub use crate::registry::{SourceDescriptor, Tier};
pub use crate::summarize::{OpenAiSummarizer, Summarizer};
