use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Split off the longest prefix of `text` that fits in `max_width` columns.
fn split_at_width(text: &str, max_width: usize) -> (&str, &str) {
    let mut used = 0;
    for (i, c) in text.char_indices() {
        let w = char_width(c);
        if used + w > max_width {
            return text.split_at(i);
        }
        used += w;
    }
    (text, "")
}

/// Word-wrap text to `max_width` terminal columns.
/// Wide characters (CJK, emoji) count as two columns.
/// Words longer than a full row are split across rows.
pub(crate) fn word_wrap(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![text.to_string()];
    }
    let mut result = Vec::new();
    for line in text.lines() {
        if line.width() <= max_width {
            result.push(line.to_string());
            continue;
        }
        let mut current = String::new();
        for word in line.split_whitespace() {
            let mut word = word;
            while word.width() > max_width {
                if !current.is_empty() {
                    result.push(std::mem::take(&mut current));
                }
                let (head, tail) = split_at_width(word, max_width);
                // a single char wider than the row still has to go somewhere
                let (head, tail) = if head.is_empty() {
                    word.split_at(word.chars().next().map_or(0, char::len_utf8))
                } else {
                    (head, tail)
                };
                result.push(head.to_string());
                word = tail;
            }
            if current.is_empty() {
                current = word.to_string();
            } else if current.width() + 1 + word.width() <= max_width {
                current.push(' ');
                current.push_str(word);
            } else {
                result.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        if !current.is_empty() {
            result.push(current);
        }
    }
    if result.is_empty() {
        result.push(String::new());
    }
    result
}

/// Clamp text to a single line of `max_width` columns, ending in `…` when cut.
/// Line breaks become spaces. Returns the visible text and whether it
/// differs from the input.
pub(crate) fn clamp_line(text: &str, max_width: usize) -> (String, bool) {
    let single: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if single.width() <= max_width {
        let changed = single != text;
        return (single, changed);
    }
    let (head, _) = split_at_width(&single, max_width.saturating_sub(1));
    (format!("{}…", head), true)
}
