//! Pop culture digest binary entrypoint.
//! Collects subreddit posts, asks OpenAI for a roundup, prints and saves it.
//!
//! Exit codes: 0 ok, 1 failure, 2 missing credential, 3 nothing collected.

use std::process::ExitCode;

use pop_culture_digest::collect::reddit::RedditClient;
use pop_culture_digest::summarize::policy::load_policy_default;
use pop_culture_digest::{registry, report, AppConfig, Collector, OpenAiSummarizer, RunError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pop_culture_digest=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env in local runs; missing file is fine.
    let _ = dotenvy::dotenv();
    init_tracing();

    report::print_banner();

    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!(error = ?e, "digest run failed");
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run() -> anyhow::Result<u8> {
    let cfg = AppConfig::from_env()?;

    // Fail fast before building any network client.
    if !cfg.has_credential() {
        let e = RunError::MissingCredential {
            var: pop_culture_digest::config::ENV_API_KEY,
        };
        println!("{e}");
        return Ok(e.exit_code() as u8);
    }

    let sources = registry::load_sources_default()?;
    tracing::info!(sources = sources.len(), ranking = ?cfg.ranking, "registry loaded");

    let fetcher = RedditClient::with_base_url(&cfg.reddit_base_url)?;
    let collector = Collector::new(sources, Box::new(fetcher)).with_policy(cfg.ranking);
    let summarizer = OpenAiSummarizer::from_config(&cfg, load_policy_default()?)?;

    match pop_culture_digest::run(&cfg, &collector, &summarizer).await {
        Ok(outcome) => Ok(outcome.exit_code() as u8),
        Err(e) => {
            eprintln!("{e}");
            Ok(e.exit_code() as u8)
        }
    }
}
