//! # Source Registry
//!
//! The fixed list of subreddits the collector walks, in query order.
//!
//! - Each entry carries a tier label plus a `cap` and `weight`.
//! - Loads from TOML or JSON config, or falls back to the built-in seed.
//! - The registry is built once and handed to the collector by value; nothing
//!   reads it through global state.
//!
//! `cap` and `weight` only affect ranking under
//! [`RankingPolicy::SourceWeighted`](crate::collect::RankingPolicy).

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_SOURCES_PATH: &str = "DIGEST_SOURCES_PATH";

/// Descriptive tier label for a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// Event sources.
    A,
    /// Reaction validation.
    B,
    /// Gossip.
    C,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub name: String,
    pub tier: Tier,
    pub cap: u32,
    pub weight: f32,
}

impl SourceDescriptor {
    pub fn new(name: impl Into<String>, tier: Tier, cap: u32, weight: f32) -> Self {
        Self {
            name: name.into(),
            tier,
            cap,
            weight,
        }
    }
}

/// Built-in subreddit list, ordered as they are queried.
pub fn default_seed() -> Vec<SourceDescriptor> {
    [
        ("entertainment", Tier::A, 35, 1.25),
        ("movies", Tier::A, 25, 1.15),
        ("television", Tier::A, 25, 1.15),
        ("popculturechat", Tier::A, 35, 1.20),
        ("popheads", Tier::A, 25, 1.10),
        ("hiphopheads", Tier::A, 20, 1.10),
        ("boxoffice", Tier::A, 15, 1.05),
        ("LiveFromNewYork", Tier::A, 15, 1.05),
        ("TikTokCringe", Tier::A, 20, 1.05),
        ("BlackPeopleTwitter", Tier::B, 12, 0.85),
        ("WhitePeopleTwitter", Tier::B, 12, 0.85),
        ("memes", Tier::B, 12, 0.80),
        ("me_irl", Tier::B, 10, 0.75),
        ("Fauxmoi", Tier::C, 10, 0.70),
    ]
    .into_iter()
    .map(|(name, tier, cap, weight)| SourceDescriptor::new(name, tier, cap, weight))
    .collect()
}

/// Load sources from an explicit path. Supports TOML or JSON formats.
pub fn load_sources_from(path: &Path) -> Result<Vec<SourceDescriptor>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading sources from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_sources(&content, ext.as_str())
        .with_context(|| format!("parsing sources from {}", path.display()))
}

/// Load sources using env var + fallbacks:
/// 1) $DIGEST_SOURCES_PATH
/// 2) config/sources.toml
/// 3) config/sources.json
/// 4) built-in seed
pub fn load_sources_default() -> Result<Vec<SourceDescriptor>> {
    if let Ok(p) = std::env::var(ENV_SOURCES_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_sources_from(&pb);
        }
        return Err(anyhow!("{ENV_SOURCES_PATH} points to non-existent path"));
    }
    let toml_p = PathBuf::from("config/sources.toml");
    if toml_p.exists() {
        return load_sources_from(&toml_p);
    }
    let json_p = PathBuf::from("config/sources.json");
    if json_p.exists() {
        return load_sources_from(&json_p);
    }
    Ok(default_seed())
}

fn parse_sources(s: &str, hint_ext: &str) -> Result<Vec<SourceDescriptor>> {
    let parsed = if hint_ext == "json" {
        parse_json(s)?
    } else if hint_ext == "toml" {
        parse_toml(s)?
    } else {
        parse_toml(s).or_else(|_| parse_json(s))?
    };
    let cleaned = clean_list(parsed)?;
    if cleaned.is_empty() {
        return Err(anyhow!("source list is empty"));
    }
    Ok(cleaned)
}

fn parse_toml(s: &str) -> Result<Vec<SourceDescriptor>> {
    #[derive(Deserialize)]
    struct TomlSources {
        source: Vec<SourceDescriptor>,
    }
    let v: TomlSources = toml::from_str(s)?;
    Ok(v.source)
}

fn parse_json(s: &str) -> Result<Vec<SourceDescriptor>> {
    let v: Vec<SourceDescriptor> = serde_json::from_str(s)?;
    Ok(v)
}

/// Trim names, drop blanks and repeated names (first occurrence wins, order kept).
/// Weights must be finite and non-negative.
fn clean_list(items: Vec<SourceDescriptor>) -> Result<Vec<SourceDescriptor>> {
    let mut out: Vec<SourceDescriptor> = Vec::with_capacity(items.len());
    for mut it in items {
        it.name = it.name.trim().to_string();
        if it.name.is_empty() {
            continue;
        }
        if !it.weight.is_finite() || it.weight < 0.0 {
            return Err(anyhow!("source {} has invalid weight {}", it.name, it.weight));
        }
        if out.iter().any(|o| o.name.eq_ignore_ascii_case(&it.name)) {
            continue;
        }
        out.push(it);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_all_tiers_in_query_order() {
        let seed = default_seed();
        assert_eq!(seed.len(), 14);
        assert_eq!(seed[0].name, "entertainment");
        assert_eq!(seed[13].name, "Fauxmoi");
        assert_eq!(seed[13].tier, Tier::C);
        assert!(seed.iter().filter(|s| s.tier == Tier::B).count() == 4);
    }

    #[test]
    fn toml_and_json_parse_and_clean() {
        let toml = r#"
[[source]]
name = " movies "
tier = "A"
cap = 25
weight = 1.15

[[source]]
name = ""
tier = "B"
cap = 1
weight = 1.0

[[source]]
name = "Movies"
tier = "C"
cap = 3
weight = 0.5
"#;
        let out = parse_sources(toml, "toml").unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "movies");
        assert_eq!(out[0].tier, Tier::A);

        let json = r#"[{"name":"memes","tier":"B","cap":12,"weight":0.8}]"#;
        let out = parse_sources(json, "json").unwrap();
        assert_eq!(out, vec![SourceDescriptor::new("memes", Tier::B, 12, 0.8)]);
    }

    #[test]
    fn non_finite_or_negative_weight_is_rejected() {
        let nan = "[[source]]\nname = \"movies\"\ntier = \"A\"\ncap = 25\nweight = nan\n";
        let err = parse_sources(nan, "toml").unwrap_err();
        assert!(err.to_string().contains("invalid weight"), "{err}");

        let inf = "[[source]]\nname = \"movies\"\ntier = \"A\"\ncap = 25\nweight = inf\n";
        assert!(parse_sources(inf, "toml").is_err());

        let neg = r#"[{"name":"memes","tier":"B","cap":12,"weight":-0.5}]"#;
        assert!(parse_sources(neg, "json").is_err());

        let zero = r#"[{"name":"memes","tier":"B","cap":12,"weight":0.0}]"#;
        assert_eq!(parse_sources(zero, "json").unwrap().len(), 1);
    }

    #[test]
    fn unknown_extension_tries_both_formats() {
        let json = r#"[{"name":"memes","tier":"B","cap":12,"weight":0.8}]"#;
        assert_eq!(parse_sources(json, "").unwrap().len(), 1);
        assert!(parse_sources("[]", "json").is_err());
    }
}
