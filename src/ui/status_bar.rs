use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use super::styles;

/// Render the top bar: repo · PR #n · thread count
pub fn render_top_bar(f: &mut Frame, area: Rect, app: &App) {
    let count = app.visible_count();
    let spans = vec![
        Span::styled(
            format!(" {}", app.repo.path),
            Style::default().fg(styles::CYAN).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" · ", Style::default().fg(styles::BORDER)),
        Span::styled(
            format!("PR #{}", app.pull_req.number),
            Style::default().fg(styles::GREEN),
        ),
        Span::styled(" · ", Style::default().fg(styles::BORDER)),
        Span::styled(
            format!("{} thread{}", count, if count == 1 { "" } else { "s" }),
            Style::default().fg(styles::DIM),
        ),
    ];
    let bar = Paragraph::new(Line::from(spans)).style(styles::default_style());
    f.render_widget(bar, area);
}

/// Render the bottom bar. Priority: notification, then the selected
/// header's tooltip (full path of a clamped label), then key hints.
pub fn render_bottom_bar(f: &mut Frame, area: Rect, app: &App, row_width: usize) {
    let line = if let Some(ref msg) = app.message {
        Line::from(Span::styled(
            format!(" {}", msg),
            Style::default().fg(styles::YELLOW),
        ))
    } else if let Some(tooltip) = app
        .selected_header()
        .and_then(|h| h.tooltip(row_width, &app.config.display.copy_icon).map(str::to_string))
    {
        Line::from(Span::styled(
            format!(" {}", tooltip),
            Style::default().fg(styles::BRIGHT),
        ))
    } else {
        key_hints()
    };

    let bar = Paragraph::new(line).style(styles::default_style());
    f.render_widget(bar, area);
}

fn key_hints() -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (key, label) in [("j/k", "select"), ("y", "copy path"), ("o", "open"), ("q", "quit")] {
        spans.push(Span::styled(key, styles::key_hint_style()));
        spans.push(Span::styled(format!(" {}  ", label), Style::default().fg(styles::DIM)));
    }
    Line::from(spans)
}
