use anyhow::{Context, Result};
use serde::Deserialize;
use std::process::Command;
use tracing::{debug, info};

use crate::model::{
    CodeComment, CommentId, CommentItem, CommentPayload, PullRequestMetadata, RepoMetadata,
};

/// The pull request a review is loaded for, in the header's own terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTarget {
    pub repo: RepoMetadata,
    pub pull_req: PullRequestMetadata,
}

/// GitHub review comment from the API
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubComment {
    pub id: u64,
    #[serde(default)]
    pub body: String,
    pub path: Option<String>,
    pub line: Option<usize>,
    pub original_line: Option<usize>,
    pub in_reply_to_id: Option<u64>,
    pub user: Option<GitHubUser>,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

impl GitHubComment {
    /// Thread entry for this comment, anchored at its file and comment id.
    pub fn to_comment_item(&self) -> CommentItem {
        CommentItem {
            payload: Some(CommentPayload {
                id: Some(CommentId::from(self.id)),
                code_comment: Some(CodeComment {
                    path: self.path.clone(),
                    id: Some(CommentId::from(self.id)),
                    line: self.line.or(self.original_line),
                }),
                author: self.user.as_ref().map(|u| u.login.clone()),
                text: self.body.clone(),
                created_at: Some(self.created_at.clone()).filter(|s| !s.is_empty()),
            }),
        }
    }
}

/// `https://github.com/owner/repo/pull/42[/files...]`, scheme optional.
pub fn parse_pr_url(url: &str) -> Option<ReviewTarget> {
    let rest = url
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .strip_prefix("github.com/")?;
    let (repo_path, tail) = rest.split_once("/pull/")?;
    match repo_path.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {}
        _ => return None,
    }
    let number = tail
        .split(['/', '?', '#'])
        .next()?
        .parse::<u64>()
        .ok()
        .filter(|n| *n > 0)?;

    Some(ReviewTarget {
        repo: RepoMetadata {
            path: repo_path.to_string(),
        },
        pull_req: PullRequestMetadata { number },
    })
}

/// Run `gh` in `repo_root` and return its stdout. A non-zero exit becomes
/// an error carrying gh's stderr.
fn gh(args: &[&str], repo_root: &str) -> Result<String> {
    let output = Command::new("gh")
        .args(args)
        .current_dir(repo_root)
        .output()
        .context("GitHub CLI (gh) is not installed. Install it: https://cli.github.com")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("gh {} failed: {}", args.join(" "), stderr.trim());
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Fail early, with a hint, when gh is missing or logged out.
pub fn ensure_gh_ready(repo_root: &str) -> Result<()> {
    gh(&["auth", "status"], repo_root)
        .map(|_| ())
        .context("GitHub CLI is not ready. Run: gh auth login")
}

#[derive(Deserialize)]
struct PrView {
    url: String,
}

/// The PR of the current branch, or PR `number` of this repo.
pub fn current_pr(repo_root: &str, number: Option<u64>) -> Result<ReviewTarget> {
    let number = number.map(|n| n.to_string());
    let mut args = vec!["pr", "view"];
    args.extend(number.as_deref());
    args.extend(["--json", "url"]);

    let stdout = gh(&args, repo_root).context("No PR found for this branch")?;
    target_from_view(&stdout)
}

/// gh reports the PR's canonical URL; its base repo is where review comments live.
fn target_from_view(json: &str) -> Result<ReviewTarget> {
    let view: PrView = serde_json::from_str(json).context("Failed to parse gh pr view output")?;
    parse_pr_url(&view.url).with_context(|| format!("Unexpected PR URL from gh: {}", view.url))
}

/// Fetch all review comments for a PR
pub fn gh_pr_comments(target: &ReviewTarget, repo_root: &str) -> Result<Vec<GitHubComment>> {
    let endpoint = format!(
        "repos/{}/pulls/{}/comments",
        target.repo.path, target.pull_req.number
    );
    let stdout = gh(&["api", &endpoint, "--paginate"], repo_root)
        .context("Failed to fetch PR comments")?;
    let comments = parse_paginated_comments(&stdout)?;
    info!(count = comments.len(), pr = target.pull_req.number, "fetched review comments");
    Ok(comments)
}

/// `gh api --paginate` concatenates JSON arrays: `[...][...]`.
/// Each chunk is parsed separately and merged.
fn parse_paginated_comments(stdout: &str) -> Result<Vec<GitHubComment>> {
    if !stdout.contains("][") {
        let trimmed = stdout.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }
        return serde_json::from_str(trimmed).context("Failed to parse PR comments JSON");
    }

    let mut results = Vec::new();
    let mut page = 0usize;
    let mut depth = 0i32;
    let mut start = 0;
    let mut in_string = false;
    let mut escaped = false;
    for (i, ch) in stdout.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    let chunk = stdout[start..=i].trim();
                    let mut batch: Vec<GitHubComment> = serde_json::from_str(chunk)
                        .with_context(|| format!("Failed to parse PR comments page {}", page + 1))?;
                    debug!(page, count = batch.len(), "parsed comment page");
                    results.append(&mut batch);
                    page += 1;
                    start = i + 1;
                }
            }
            _ => {}
        }
    }
    Ok(results)
}
