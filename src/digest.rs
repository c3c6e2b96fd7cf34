//! Digest rendering: the bounded text block sent to the summarizer, and the
//! console preview of the same posts.

use crate::collect::types::RawPost;
use crate::collect::truncate_chars;

/// Returned instead of an empty digest.
pub const NO_POSTS_SENTINEL: &str = "No posts found.";

/// Number of ranked posts that make it into the digest.
pub const DIGEST_MAX_POSTS: usize = 200;

/// Console preview cuts bodies to this many characters.
pub const PREVIEW_BODY_CHARS: usize = 300;

fn header(rank: usize, p: &RawPost) -> String {
    format!(
        "[{}] r/{} | {} upvotes, {} comments",
        rank, p.subreddit, p.score, p.num_comments
    )
}

/// Render the top [`DIGEST_MAX_POSTS`] posts as numbered blocks separated by a
/// blank line. Bodies are the full collected (800-char) selftext.
pub fn format_digest(posts: &[RawPost]) -> String {
    if posts.is_empty() {
        return NO_POSTS_SENTINEL.to_string();
    }

    posts
        .iter()
        .take(DIGEST_MAX_POSTS)
        .enumerate()
        .map(|(i, p)| {
            let mut block = format!("{}\n{}", header(i + 1, p), p.title);
            if !p.selftext.is_empty() {
                block.push('\n');
                block.push_str(&p.selftext);
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Console listing of the raw posts. Bodies over 300 chars are cut and get `...`.
pub fn render_preview(posts: &[RawPost]) -> String {
    let mut out = String::new();
    for (i, p) in posts.iter().take(DIGEST_MAX_POSTS).enumerate() {
        out.push('\n');
        out.push_str(&header(i + 1, p));
        out.push_str("\n  ");
        out.push_str(&p.title);
        if p.selftext.chars().count() > PREVIEW_BODY_CHARS {
            out.push_str("\n  ");
            out.push_str(&truncate_chars(&p.selftext, PREVIEW_BODY_CHARS));
            out.push_str("...");
        } else if !p.selftext.is_empty() {
            out.push_str("\n  ");
            out.push_str(&p.selftext);
        }
        out.push('\n');
    }
    out
}
