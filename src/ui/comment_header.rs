use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use tracing::{debug, warn};
use unicode_width::UnicodeWidthStr;

use crate::clipboard::Clipboard;
use crate::model::{first_item, CommentItem, PullRequestMetadata, RepoMetadata};
use crate::routes::{PullRequestSection, RouteParams, Routes};
use super::styles;
use super::utils::clamp_line;

pub const COPY_ICON: &str = "code-copy";
pub const COPY_ICON_SIZE: u16 = 14;

/// What the copy button does when activated. Bound to the path at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyAction {
    Copy(String),
    Noop,
}

impl CopyAction {
    pub fn for_path(path: Option<&str>) -> Self {
        match path {
            Some(p) if !p.is_empty() => CopyAction::Copy(p.to_string()),
            _ => CopyAction::Noop,
        }
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            CopyAction::Copy(text) => Some(text),
            CopyAction::Noop => None,
        }
    }

    /// Fire-and-forget: a failed write is logged, never returned.
    /// Returns whether the text reached the clipboard.
    pub fn activate(&self, clipboard: &dyn Clipboard) -> bool {
        match self {
            CopyAction::Noop => false,
            CopyAction::Copy(text) => match clipboard.copy(text) {
                Ok(()) => true,
                Err(err) => {
                    warn!(error = %err, path = %text, "clipboard write failed");
                    false
                }
            },
        }
    }
}

/// Path label. Clamped to one line; the full text is its tooltip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathLink {
    pub text: String,
    pub href: Option<String>,
    #[allow(dead_code)]
    pub line_clamp: u16,
}

/// Icon name and size are what a graphical toolkit would draw; the
/// terminal draws the configured glyph instead.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub struct IconButton {
    pub icon: &'static str,
    pub icon_size: u16,
    pub on_click: CopyAction,
}

/// Header row of a code comment thread: path link + copy button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeCommentHeader {
    pub link: PathLink,
    pub copy_button: IconButton,
}

impl CodeCommentHeader {
    /// Build the header from the first item of the thread.
    /// An empty thread has no header.
    pub fn new(
        repo: &RepoMetadata,
        pull_req: &PullRequestMetadata,
        comment_items: &[CommentItem],
        routes: &dyn Routes,
    ) -> Option<Self> {
        let first = first_item(comment_items)?;
        let path = first.path();

        let header = Self {
            link: PathLink {
                text: path.unwrap_or_default().to_string(),
                href: files_changed_link(repo, pull_req, first, routes),
                line_clamp: 1,
            },
            copy_button: IconButton {
                icon: COPY_ICON,
                icon_size: COPY_ICON_SIZE,
                on_click: CopyAction::for_path(path),
            },
        };
        debug!(path = %header.link.text, href = ?header.link.href, "built comment header");
        Some(header)
    }

    pub fn path(&self) -> &str {
        &self.link.text
    }

    pub fn href(&self) -> Option<&str> {
        self.link.href.as_deref()
    }

    /// Activate the copy button.
    pub fn copy(&self, clipboard: &dyn Clipboard) -> bool {
        self.copy_button.on_click.activate(clipboard)
    }

    /// Full label text, but only when a row of `width` columns is too
    /// narrow to show it.
    pub fn tooltip(&self, width: usize, copy_glyph: &str) -> Option<&str> {
        let (_, clamped) = clamp_line(&self.link.text, label_width(width, copy_glyph));
        clamped.then_some(self.link.text.as_str())
    }

    /// One terminal row: clamped path link followed by the copy icon.
    pub fn to_line(&self, width: usize, copy_glyph: &str, selected: bool) -> Line<'static> {
        let (label, _) = clamp_line(&self.link.text, label_width(width, copy_glyph));

        let bg = if selected { styles::SELECTED_BG } else { styles::PANEL };
        let label_style = if self.link.href.is_some() {
            Style::default()
                .fg(styles::BLUE)
                .bg(bg)
                .add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default().fg(styles::DIM).bg(bg)
        };
        let icon_style = match self.copy_button.on_click {
            CopyAction::Copy(_) => Style::default().fg(styles::MUTED).bg(bg),
            CopyAction::Noop => Style::default().fg(styles::BORDER).bg(bg),
        };

        let mut spans = vec![Span::styled(label, label_style)];
        spans.push(Span::styled(" ", Style::default().bg(bg)));
        spans.push(Span::styled(copy_glyph.to_string(), icon_style));
        Line::from(spans)
    }
}

/// Columns left for the label once the icon and its leading space are placed.
fn label_width(width: usize, copy_glyph: &str) -> usize {
    width.saturating_sub(copy_glyph.width().max(1) + 1)
}

/// `<files changed route>?path=<path>&commentId=<id>`, or `None` when the
/// comment has no path to link to. Values are not escaped.
pub fn files_changed_link(
    repo: &RepoMetadata,
    pull_req: &PullRequestMetadata,
    item: &CommentItem,
    routes: &dyn Routes,
) -> Option<String> {
    let path = item.path()?;
    let comment_id = item
        .comment_id()
        .or_else(|| item.payload.as_ref().and_then(|p| p.id.as_ref()))
        .map(|id| id.as_str())
        .unwrap_or_default();

    let pull_request_id = pull_req.number.to_string();
    let base = routes.to_pull_request(RouteParams {
        repo_path: &repo.path,
        pull_request_id: &pull_request_id,
        pull_request_section: Some(PullRequestSection::FilesChanged),
    });
    Some(format!("{}?path={}&commentId={}", base, path, comment_id))
}
