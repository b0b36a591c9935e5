use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::model::CommentItem;
use super::{styles, utils};

/// Width available to a thread row inside the list border
pub fn inner_width(area: Rect) -> usize {
    area.width.saturating_sub(2) as usize
}

/// Render every thread as its header row followed by its comments.
/// Empty threads have no header and draw nothing.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(Span::styled(" THREADS ", Style::default().fg(styles::CYAN)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(styles::BORDER))
        .style(styles::panel_style());

    let width = inner_width(area);
    let height = area.height.saturating_sub(2) as usize;

    if app.visible_count() == 0 {
        let empty = Paragraph::new(Line::from(Span::styled(
            "  No review threads",
            Style::default().fg(styles::MUTED),
        )))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    let mut selected_offset = 0usize;
    for (idx, thread) in app.threads.iter().enumerate() {
        let Some(header) = app.header(idx) else {
            continue;
        };
        let is_selected = idx == app.selected;
        if is_selected {
            selected_offset = lines.len();
        }
        lines.push(header.to_line(width, &app.config.display.copy_icon, is_selected));
        for item in thread {
            lines.extend(comment_lines(item, width, app.config.display.wrap_bodies));
        }
        lines.push(Line::from(""));
    }

    // Keep the selected header in the upper half of the list
    let scroll = selected_offset.saturating_sub(height / 2);

    let para = Paragraph::new(lines)
        .block(block)
        .scroll((scroll.min(u16::MAX as usize) as u16, 0));
    f.render_widget(para, area);
}

fn comment_lines(item: &CommentItem, width: usize, wrap: bool) -> Vec<Line<'static>> {
    let Some(payload) = item.payload.as_ref() else {
        return Vec::new();
    };

    let mut meta = vec![Span::raw("  ")];
    meta.push(Span::styled(
        payload.author.clone().unwrap_or_else(|| "unknown".to_string()),
        styles::author_style(),
    ));
    if let Some(line) = payload.code_comment.as_ref().and_then(|c| c.line) {
        meta.push(Span::styled(format!(" L{}", line), Style::default().fg(styles::DIM)));
    }
    if let Some(ref created_at) = payload.created_at {
        meta.push(Span::styled(format!(" · {}", created_at), Style::default().fg(styles::DIM)));
    }

    let mut lines = vec![Line::from(meta)];
    let body_width = width.saturating_sub(4);
    let body_style = Style::default().fg(styles::TEXT);
    if wrap {
        for row in utils::word_wrap(&payload.text, body_width) {
            lines.push(Line::from(Span::styled(format!("    {}", row), body_style)));
        }
    } else {
        for row in payload.text.lines() {
            let (row, _) = utils::clamp_line(row, body_width);
            lines.push(Line::from(Span::styled(format!("    {}", row), body_style)));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CommentPayload;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn payload_item(text: &str) -> CommentItem {
        CommentItem {
            payload: Some(CommentPayload {
                author: Some("alice".into()),
                text: text.into(),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn item_without_payload_has_no_lines() {
        assert!(comment_lines(&CommentItem::default(), 40, true).is_empty());
    }

    #[test]
    fn meta_line_then_wrapped_body() {
        let lines = comment_lines(&payload_item("one two three four"), 14, true);
        assert_eq!(text_of(&lines[0]), "  alice");
        assert_eq!(text_of(&lines[1]), "    one two");
        assert_eq!(text_of(&lines[2]), "    three four");
    }

    #[test]
    fn unwrapped_body_is_clamped_per_line() {
        let lines = comment_lines(&payload_item("abcdefghijkl\nok"), 12, false);
        assert_eq!(text_of(&lines[1]), "    abcdefg…");
        assert_eq!(text_of(&lines[2]), "    ok");
    }

    #[test]
    fn unknown_author_placeholder() {
        let item = CommentItem {
            payload: Some(CommentPayload::default()),
        };
        let lines = comment_lines(&item, 40, true);
        assert_eq!(text_of(&lines[0]), "  unknown");
    }

    #[test]
    fn inner_width_excludes_borders() {
        assert_eq!(inner_width(Rect::new(0, 0, 30, 5)), 28);
        assert_eq!(inner_width(Rect::new(0, 0, 1, 5)), 0);
    }
}
