pub mod comment_header;
mod status_bar;
mod styles;
mod threads;
mod utils;

use crate::app::App;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

/// Render the entire UI
pub fn draw(f: &mut Frame, app: &App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // top bar
            Constraint::Min(1),    // thread list
            Constraint::Length(1), // bottom bar
        ])
        .split(f.area());

    status_bar::render_top_bar(f, outer[0], app);
    threads::render(f, outer[1], app);
    status_bar::render_bottom_bar(f, outer[2], app, threads::inner_width(outer[1]));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::testing::RecordingClipboard;
    use crate::config::RtConfig;
    use crate::model::{CodeComment, CommentId, CommentItem, CommentPayload, PullRequestMetadata, RepoMetadata};
    use crate::threads::Thread;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn item(path: Option<&str>, id: &str, author: &str, text: &str) -> CommentItem {
        CommentItem {
            payload: Some(CommentPayload {
                code_comment: Some(CodeComment {
                    path: path.map(String::from),
                    id: Some(CommentId::from(id)),
                    line: Some(3),
                }),
                author: Some(author.to_string()),
                text: text.to_string(),
                ..Default::default()
            }),
        }
    }

    fn render(threads: Vec<Thread>, width: u16, height: u16) -> (App, Vec<String>) {
        let app = App::new(
            RepoMetadata { path: "org/repo".into() },
            PullRequestMetadata { number: 42 },
            threads,
            RtConfig::default(),
            Box::new(RecordingClipboard::default()),
        );
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let rows = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect();
        (app, rows)
    }

    fn screen_contains(rows: &[String], needle: &str) -> bool {
        rows.iter().any(|r| r.contains(needle))
    }

    #[test]
    fn draws_header_and_body() {
        let (_, rows) = render(
            vec![vec![item(Some("src/main.go"), "c-9", "alice", "Needs a test")]],
            60,
            10,
        );
        assert!(screen_contains(&rows, "org/repo"));
        assert!(screen_contains(&rows, "PR #42"));
        assert!(screen_contains(&rows, "src/main.go ⧉"));
        assert!(screen_contains(&rows, "alice"));
        assert!(screen_contains(&rows, "Needs a test"));
    }

    #[test]
    fn empty_threads_draw_nothing() {
        let (_, rows) = render(vec![vec![], vec![]], 60, 10);
        assert!(screen_contains(&rows, "No review threads"));
        assert!(!screen_contains(&rows, "⧉"));
    }

    #[test]
    fn missing_path_draws_empty_label() {
        let (_, rows) = render(vec![vec![item(None, "1", "bob", "general note")]], 60, 10);
        assert!(screen_contains(&rows, "general note"));
        // label is empty, only the icon remains on the header row
        assert!(rows.iter().any(|r| r.trim_start_matches('│').trim_start().starts_with('⧉')));
    }

    #[test]
    fn narrow_terminal_clamps_label_and_shows_tooltip() {
        let (_, rows) = render(
            vec![vec![item(Some("src/deeply/nested/module/file.rs"), "1", "carol", "x")]],
            20,
            8,
        );
        assert!(screen_contains(&rows, "…"));
        // bottom bar carries the full path as the tooltip, itself clamped to the bar
        assert!(rows.last().is_some_and(|r| r.contains("src/deeply")));
    }

    #[test]
    fn wide_path_keeps_copy_icon_on_screen() {
        let (_, rows) = render(
            vec![vec![item(Some("文档/设计说明书.md"), "1", "dan", "x")]],
            20,
            8,
        );
        let header_row = rows.iter().find(|r| r.contains('文')).unwrap();
        assert!(header_row.contains('⧉'));
        assert!(header_row.contains('…'));
        assert!(rows.last().is_some_and(|r| r.contains('文')));
    }

    #[test]
    fn drawing_twice_is_identical() {
        let threads = vec![vec![item(Some("a.rs"), "1", "dev", "one")]];
        let (_, first) = render(threads.clone(), 40, 8);
        let (_, second) = render(threads, 40, 8);
        assert_eq!(first, second);
    }
}
