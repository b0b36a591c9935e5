use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::github::GitHubComment;
use crate::model::CommentItem;

/// Ordered entries of one review thread; the first entry is the root.
pub type Thread = Vec<CommentItem>;

/// Group flat review comments into threads.
///
/// Roots (no `in_reply_to_id`) open a thread in the order they were created.
/// Replies join their root's thread, also in creation order. A reply whose
/// root is missing becomes a thread of its own.
pub fn group_into_threads(mut comments: Vec<GitHubComment>) -> Vec<Thread> {
    comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

    let roots: HashMap<u64, usize> = comments
        .iter()
        .filter(|c| c.in_reply_to_id.is_none())
        .enumerate()
        .map(|(idx, c)| (c.id, idx))
        .collect();

    let mut threads: Vec<Thread> = vec![Vec::new(); roots.len()];
    for comment in &comments {
        let slot = match comment.in_reply_to_id {
            None => roots.get(&comment.id).copied(),
            Some(parent) => roots.get(&parent).copied(),
        };
        match slot {
            Some(idx) => threads[idx].push(comment.to_comment_item()),
            None => threads.push(vec![comment.to_comment_item()]),
        }
    }
    threads
}

/// Read threads from a JSON file shaped `[[{"payload": {...}}, ...], ...]`.
pub fn load_threads_file(path: &Path) -> Result<Vec<Thread>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read threads file {}", path.display()))?;
    let threads: Vec<Thread> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse threads file {}", path.display()))?;
    info!(count = threads.len(), path = %path.display(), "loaded threads file");
    Ok(threads)
}
