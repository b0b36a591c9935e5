use serde::{Deserialize, Serialize};
use std::fmt;

/// Repository a thread belongs to. `path` is the routing key (`owner/repo`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoMetadata {
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestMetadata {
    pub number: u64,
}

/// Comment identifier. GitHub hands out integers, other hosts use opaque
/// strings, so both deserialize into the same textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawCommentId", into = "String")]
pub struct CommentId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCommentId {
    Number(u64),
    Text(String),
}

impl From<RawCommentId> for CommentId {
    fn from(raw: RawCommentId) -> Self {
        match raw {
            RawCommentId::Number(n) => CommentId(n.to_string()),
            RawCommentId::Text(s) => CommentId(s),
        }
    }
}

impl From<CommentId> for String {
    fn from(id: CommentId) -> Self {
        id.0
    }
}

impl From<u64> for CommentId {
    fn from(n: u64) -> Self {
        CommentId(n.to_string())
    }
}

impl From<&str> for CommentId {
    fn from(s: &str) -> Self {
        CommentId(s.to_string())
    }
}

impl CommentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anchor of a review comment inside the diff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeComment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CommentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CommentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_comment: Option<CodeComment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// One entry of a review thread. Every field below `payload` may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<CommentPayload>,
}

impl CommentItem {
    pub fn code_comment(&self) -> Option<&CodeComment> {
        self.payload.as_ref()?.code_comment.as_ref()
    }

    /// File path the comment is anchored to, if any.
    pub fn path(&self) -> Option<&str> {
        self.code_comment()?.path.as_deref()
    }

    pub fn comment_id(&self) -> Option<&CommentId> {
        self.code_comment()?.id.as_ref()
    }
}

/// First entry of a thread, `None` for an empty thread.
pub fn first_item(items: &[CommentItem]) -> Option<&CommentItem> {
    items.first()
}
