mod app;
mod clipboard;
mod config;
mod github;
mod model;
mod routes;
mod threads;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use model::{PullRequestMetadata, RepoMetadata};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use threads::Thread;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Terminal viewer for pull request review threads
#[derive(Parser)]
#[command(name = "rt", version, about)]
struct Cli {
    /// GitHub PR URL (e.g. https://github.com/owner/repo/pull/42)
    pr_url: Option<String>,

    /// PR number in the current repo
    #[arg(long, conflicts_with = "pr_url")]
    pr: Option<u64>,

    /// Repository path used in links (owner/repo)
    #[arg(long)]
    repo: Option<String>,

    /// Read threads from a JSON file instead of fetching them with gh
    #[arg(long)]
    threads: Option<PathBuf>,

    /// Override routes.base_url from the config (a host with /{repo}/pulls/{n}/changes pages)
    #[arg(long)]
    base_url: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let repo_root = std::env::current_dir()
        .context("Failed to read current directory")?
        .to_string_lossy()
        .to_string();

    let mut config = config::load_config(&repo_root);
    if let Some(ref base_url) = cli.base_url {
        config.routes.base_url = base_url.clone();
    }

    let (repo, pull_req, threads) = load_review(&cli, &repo_root)?;
    let clipboard = clipboard::SystemClipboard::from_config(&config.clipboard);
    let mut app = App::new(repo, pull_req, threads, config, Box::new(clipboard));

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Logs go to `rt.log` in the cache dir; the terminal belongs to the UI.
/// Filter with `RT_LOG`, e.g. `RT_LOG=debug`.
fn init_logging() {
    let Some(dir) = dirs::cache_dir().map(|d| d.join("rt")) else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = std::fs::File::create(dir.join("rt.log")) else {
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("RT_LOG").unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}

/// Resolve repo/PR metadata and the threads to show.
fn load_review(cli: &Cli, repo_root: &str) -> Result<(RepoMetadata, PullRequestMetadata, Vec<Thread>)> {
    if let Some(ref path) = cli.threads {
        let threads = threads::load_threads_file(path)?;
        let repo = RepoMetadata {
            path: cli.repo.clone().unwrap_or_else(|| "local/repo".to_string()),
        };
        let pull_req = PullRequestMetadata {
            number: cli.pr.unwrap_or(0),
        };
        return Ok((repo, pull_req, threads));
    }

    github::ensure_gh_ready(repo_root)?;
    let mut target = match cli.pr_url {
        Some(ref url) => github::parse_pr_url(url)
            .with_context(|| format!("Not a GitHub PR URL: {}", url))?,
        None => github::current_pr(repo_root, cli.pr)?,
    };
    info!(repo = %target.repo.path, pr = target.pull_req.number, "loading review threads");

    let comments = github::gh_pr_comments(&target, repo_root)?;
    let threads = threads::group_into_threads(comments);
    if let Some(ref repo) = cli.repo {
        target.repo.path = repo.clone();
    }
    Ok((target.repo, target.pull_req, threads))
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key);
                }
            }
        }

        // Auto-clear notifications
        app.tick();

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true
        }
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Char('y') => app.copy_selected_path(),
        KeyCode::Char('o') | KeyCode::Enter => app.open_selected_link(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn cli_rejects_pr_with_url() {
        let parsed = Cli::try_parse_from([
            "rt",
            "https://github.com/o/r/pull/1",
            "--pr",
            "2",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn cli_accepts_threads_file() {
        let cli = Cli::try_parse_from(["rt", "--threads", "t.json", "--repo", "org/repo", "--pr", "42"])
            .unwrap();
        assert_eq!(cli.threads, Some(PathBuf::from("t.json")));
        assert_eq!(cli.repo.as_deref(), Some("org/repo"));
        assert_eq!(cli.pr, Some(42));
    }

    #[test]
    fn threads_file_review_uses_cli_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("threads.json");
        fs::write(
            &path,
            r#"[[{"payload": {"code_comment": {"path": "src/main.go", "id": "c-9"}}}]]"#,
        )
        .unwrap();
        let cli = Cli::try_parse_from([
            "rt",
            "--threads",
            path.to_str().unwrap(),
            "--repo",
            "org/repo",
            "--pr",
            "42",
        ])
        .unwrap();

        let (repo, pull_req, threads) = load_review(&cli, ".").unwrap();
        assert_eq!(repo.path, "org/repo");
        assert_eq!(pull_req.number, 42);
        assert_eq!(threads.len(), 1);
    }

    #[test]
    fn threads_file_review_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("threads.json");
        fs::write(&path, "[]").unwrap();
        let cli = Cli::try_parse_from(["rt", "--threads", path.to_str().unwrap()]).unwrap();

        let (repo, pull_req, threads) = load_review(&cli, ".").unwrap();
        assert_eq!(repo.path, "local/repo");
        assert_eq!(pull_req.number, 0);
        assert!(threads.is_empty());
    }
}
