use crate::store::{Bookmark, Folder, FolderId};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};
use unicode_width::UnicodeWidthChar;

/// One folder panel: the direct child folders and bookmarks of a single open
/// folder, folders first, in document order.
pub struct PanelWidget<'a> {
    title: &'a str,
    folders: Vec<&'a Folder>,
    files: Vec<&'a Bookmark>,
    highlighted: &'a [FolderId],
    expanded: Option<FolderId>,
    active: bool,
    cursor: Option<usize>,
}

impl<'a> PanelWidget<'a> {
    pub fn new(
        title: &'a str,
        folders: Vec<&'a Folder>,
        files: Vec<&'a Bookmark>,
        highlighted: &'a [FolderId],
    ) -> Self {
        Self {
            title,
            folders,
            files,
            highlighted,
            expanded: None,
            active: false,
            cursor: None,
        }
    }

    /// Child folder whose own panel is open to the right, if any.
    pub fn expanded(mut self, expanded: Option<FolderId>) -> Self {
        self.expanded = expanded;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Row index of the selection cursor within this panel.
    pub fn cursor(mut self, cursor: Option<usize>) -> Self {
        self.cursor = cursor;
        self
    }
}

impl Widget for PanelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(truncate_to_width(self.title, area.width.saturating_sub(2) as usize));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let width = inner.width as usize;
        let mut row = 0usize;

        for folder in &self.folders {
            if row >= inner.height as usize {
                break;
            }

            let marker = if self.expanded == Some(folder.id) { "▾ " } else { "▸ " };
            let mut style = if self.highlighted.contains(&folder.id) {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan)
            };
            if self.cursor == Some(row) {
                style = style.bg(Color::DarkGray);
            }

            let text = truncate_to_width(&format!("{}{}", marker, folder.title), width);
            buf.set_stringn(inner.x, inner.y + row as u16, text, width, style);
            row += 1;
        }

        for file in &self.files {
            if row >= inner.height as usize {
                break;
            }

            let mut style = Style::default().fg(Color::White);
            if self.cursor == Some(row) {
                style = style.bg(Color::DarkGray);
            }

            let text = truncate_to_width(&format!("• {}", file.title), width);
            buf.set_stringn(inner.x, inner.y + row as u16, text, width, style);
            row += 1;
        }
    }
}

/// Cuts `text` down to at most `max` terminal cells, appending an ellipsis
/// when anything was dropped.
pub fn truncate_to_width(text: &str, max: usize) -> String {
    use unicode_width::UnicodeWidthStr;

    if max == 0 {
        return String::new();
    }
    if text.width() <= max {
        return text.to_string();
    }

    let mut width = 0usize;
    let mut out = String::new();
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        // Keep one cell free for the ellipsis.
        if width + ch_width + 1 > max {
            break;
        }
        out.push(ch);
        width += ch_width;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_to_width("work", 10), "work");
    }

    #[test]
    fn long_text_gets_an_ellipsis() {
        let out = truncate_to_width("a very long folder title", 8);
        assert!(out.ends_with('…'));
        assert!(out.chars().count() <= 8);
    }
}
