// src/report.rs
//! Console output and the roundup file.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::collect::types::RawPost;
use crate::digest::render_preview;

fn rule() -> String {
    "=".repeat(50)
}

fn section(title: &str) {
    println!("\n{}", rule());
    println!("{title}");
    println!("{}", rule());
}

pub fn print_banner() {
    println!("Pop Culture Reddit Scraper");
    println!("{}", rule());
}

pub fn print_raw_posts(posts: &[RawPost]) {
    section("REDDIT POSTS (raw)");
    print!("{}", render_preview(posts));
    println!("\n{}", rule());
}

pub fn print_summary(summary: &str) {
    section("GEN Z POP CULTURE ROUNDUP (Past 2 Weeks)");
    println!("{summary}");
}

/// Write the summary to `path`, replacing any existing file. Goes through a
/// sibling temp file so a failed write never leaves a half-written roundup.
pub fn save_summary(path: &Path, summary: &str) -> Result<()> {
    let tmp = path.with_extension("txt.tmp");
    let mut f = fs::File::create(&tmp)
        .with_context(|| format!("creating {}", tmp.display()))?;
    f.write_all(summary.as_bytes())
        .with_context(|| format!("writing {}", tmp.display()))?;
    f.sync_all()
        .with_context(|| format!("syncing {}", tmp.display()))?;
    drop(f);
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e)
            .with_context(|| format!("moving {} to {}", tmp.display(), path.display()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("pop_culture_roundup.txt");
        fs::write(&p, "old roundup that is longer than the new one").unwrap();

        save_summary(&p, "new").unwrap();
        assert_eq!(fs::read_to_string(&p).unwrap(), "new");
        assert!(!p.with_extension("txt.tmp").exists());
    }

    #[test]
    fn failed_rename_cleans_up_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory squats on the target name.
        let p = dir.path().join("out.txt");
        fs::create_dir(&p).unwrap();
        fs::write(p.join("keep"), "x").unwrap();

        let err = save_summary(&p, "new").unwrap_err();
        assert!(format!("{err:#}").contains("moving"), "{err:#}");
        assert!(!p.with_extension("txt.tmp").exists());
        assert!(p.join("keep").exists());
    }

    #[test]
    fn save_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("nope").join("out.txt");
        assert!(save_summary(&p, "x").is_err());
    }
}
