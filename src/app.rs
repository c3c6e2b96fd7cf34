// src/app.rs
//! One digest run: credential check → collect → format → summarize → output.

use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::collect::Collector;
use crate::config::{AppConfig, ENV_API_KEY};
use crate::digest::format_digest;
use crate::error::RunError;
use crate::report;
use crate::summarize::Summarizer;

/// How a run that did not fail ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed {
        posts: usize,
        summary: String,
        output_path: PathBuf,
    },
    /// Nothing was collected; the summarizer was not called.
    NoPosts,
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Completed { .. } => 0,
            RunOutcome::NoPosts => 3,
        }
    }
}

pub async fn run(
    cfg: &AppConfig,
    collector: &Collector,
    summarizer: &dyn Summarizer,
) -> Result<RunOutcome, RunError> {
    if !cfg.has_credential() {
        return Err(RunError::MissingCredential { var: ENV_API_KEY });
    }

    println!("Scraping Reddit...");
    let posts = collector.collect().await;
    println!("Collected {} posts.", posts.len());

    if posts.is_empty() {
        warn!("no posts collected; skipping summary");
        println!("No posts found.");
        return Ok(RunOutcome::NoPosts);
    }

    report::print_raw_posts(&posts);

    println!("Sending to OpenAI for Gen Z-focused summary...");
    let digest = format_digest(&posts);
    let summary = summarizer.summarize(&digest).await.map_err(|e| {
        error!(provider = summarizer.provider_name(), error = %e, "summary failed");
        RunError::from(e)
    })?;

    report::print_summary(&summary);

    report::save_summary(&cfg.output_path, &summary).map_err(RunError::Output)?;
    println!("\nSaved to {}", cfg.output_path.display());
    info!(path = %cfg.output_path.display(), posts = posts.len(), "roundup saved");

    Ok(RunOutcome::Completed {
        posts: posts.len(),
        summary,
        output_path: cfg.output_path.clone(),
    })
}
