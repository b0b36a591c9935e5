use crate::clipboard::Clipboard;
use crate::config::RtConfig;
use crate::model::{PullRequestMetadata, RepoMetadata};
use crate::routes::WebRoutes;
use crate::threads::Thread;
use crate::ui::comment_header::CodeCommentHeader;
use anyhow::{Context, Result};
use std::process::{Command, Stdio};
use tracing::{info, warn};

/// Notifications clear after this many ticks (~2s at 100ms per tick)
const MESSAGE_TICKS: u16 = 20;

pub struct App {
    pub repo: RepoMetadata,
    pub pull_req: PullRequestMetadata,
    pub threads: Vec<Thread>,
    pub config: RtConfig,

    /// Index into `threads`. Always points at a non-empty thread when one exists.
    pub selected: usize,

    /// Transient notification shown in the bottom bar
    pub message: Option<String>,
    message_ticks: u16,

    pub should_quit: bool,

    routes: WebRoutes,
    clipboard: Box<dyn Clipboard>,
}

impl App {
    pub fn new(
        repo: RepoMetadata,
        pull_req: PullRequestMetadata,
        threads: Vec<Thread>,
        config: RtConfig,
        clipboard: Box<dyn Clipboard>,
    ) -> Self {
        let selected = threads.iter().position(|t| !t.is_empty()).unwrap_or(0);
        let routes = WebRoutes::new(&config.routes.base_url);
        info!(
            repo = %repo.path,
            pr = pull_req.number,
            threads = threads.len(),
            "opened review threads"
        );
        Self {
            repo,
            pull_req,
            threads,
            config,
            selected,
            message: None,
            message_ticks: 0,
            should_quit: false,
            routes,
            clipboard,
        }
    }

    /// Header of thread `idx`; `None` for an empty or out-of-range thread.
    pub fn header(&self, idx: usize) -> Option<CodeCommentHeader> {
        let items = self.threads.get(idx)?;
        CodeCommentHeader::new(&self.repo, &self.pull_req, items, &self.routes)
    }

    pub fn selected_header(&self) -> Option<CodeCommentHeader> {
        self.header(self.selected)
    }

    /// Number of threads that render a header
    pub fn visible_count(&self) -> usize {
        self.threads.iter().filter(|t| !t.is_empty()).count()
    }

    // ── Navigation ──

    pub fn select_next(&mut self) {
        if let Some(idx) = (self.selected + 1..self.threads.len()).find(|&i| !self.threads[i].is_empty()) {
            self.selected = idx;
        }
    }

    pub fn select_prev(&mut self) {
        if let Some(idx) = (0..self.selected).rev().find(|&i| !self.threads[i].is_empty()) {
            self.selected = idx;
        }
    }

    // ── Header actions ──

    /// Activate the selected header's copy button. Only a write that
    /// reached the clipboard is announced.
    pub fn copy_selected_path(&mut self) {
        let Some(header) = self.selected_header() else {
            return;
        };
        if header.copy(self.clipboard.as_ref()) {
            if let Some(path) = header.copy_button.on_click.target() {
                self.notify(&format!("Copied {}", path));
            }
        }
    }

    /// Open the selected header's link in the browser
    pub fn open_selected_link(&mut self) {
        let Some(href) = self.selected_header().and_then(|h| h.link.href) else {
            return;
        };
        if self.routes.is_relative() {
            self.notify(&format!("{} (set routes.base_url to open links)", href));
            return;
        }
        if let Err(err) = open_in_browser(&href) {
            warn!(error = %err, url = %href, "failed to open link");
            self.notify("Could not open link");
        } else {
            self.notify(&format!("Opened {}", href));
        }
    }

    // ── Notifications ──

    pub fn notify(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_ticks = 0;
    }

    /// Called on every event loop iteration; clears stale notifications
    pub fn tick(&mut self) {
        if self.message.is_some() {
            self.message_ticks += 1;
            if self.message_ticks > MESSAGE_TICKS {
                self.message = None;
                self.message_ticks = 0;
            }
        }
    }
}

/// Spawn the platform opener without waiting on it
fn open_in_browser(url: &str) -> Result<()> {
    let (cmd, args): (&str, Vec<&str>) = if cfg!(target_os = "macos") {
        ("open", vec![url])
    } else if cfg!(target_os = "windows") {
        ("cmd", vec!["/C", "start", "", url])
    } else {
        ("xdg-open", vec![url])
    };

    Command::new(cmd)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to run {}", cmd))?;
    Ok(())
}
