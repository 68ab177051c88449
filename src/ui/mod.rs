pub mod widgets;

use crate::config::AppConfig;
use crate::panels::PanelState;
use crate::store::{Bookmark, BookmarkStore, Folder, FolderId, ROOT_ID};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use widgets::PanelWidget;

/// One selectable row in a panel. Folders come first, then bookmarks, both
/// in document order, which is also the order the widget renders them in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowEntry<'a> {
    Folder(&'a Folder),
    File(&'a Bookmark),
}

/// Resolves the row at `row` within the panel for `panel_id`.
pub fn row_at(store: &BookmarkStore, panel_id: FolderId, row: usize) -> Option<RowEntry<'_>> {
    let folders = store.folders_under(panel_id);
    if row < folders.len() {
        return Some(RowEntry::Folder(folders[row]));
    }
    store
        .files_under(panel_id)
        .get(row - folders.len())
        .copied()
        .map(RowEntry::File)
}

pub fn panel_row_count(store: &BookmarkStore, panel_id: FolderId) -> usize {
    store.folders_under(panel_id).len() + store.files_under(panel_id).len()
}

/// View state: which panel has focus and where the row cursor sits. Pure
/// presentation concern, disjoint from the open/highlight state owned by
/// [`PanelState`].
pub struct Ui {
    active_panel: usize,
    cursor: usize,
    show_help: bool,
}

impl Ui {
    pub fn new() -> Self {
        Self {
            active_panel: 0,
            cursor: 0,
            show_help: false,
        }
    }

    pub fn draw(
        &mut self,
        frame: &mut Frame,
        store: &BookmarkStore,
        panels: &PanelState,
        config: &AppConfig,
    ) {
        self.clamp_selection(store, panels);

        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Min(3),    // Panels
                Constraint::Length(1), // Footer
            ])
            .split(size);

        self.draw_header(frame, chunks[0], store);
        self.draw_panels(frame, chunks[1], store, panels, config);
        self.draw_footer(frame, chunks[2], store, panels, config);

        if self.show_help {
            self.draw_help(frame);
        }
    }

    /// Keeps focus and cursor valid after panels open or close underneath
    /// them.
    fn clamp_selection(&mut self, store: &BookmarkStore, panels: &PanelState) {
        let open = panels.open_panels();
        if self.active_panel >= open.len() {
            self.active_panel = open.len().saturating_sub(1);
            self.cursor = 0;
        }

        let rows = panel_row_count(store, open[self.active_panel]);
        if self.cursor >= rows {
            self.cursor = rows.saturating_sub(1);
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect, store: &BookmarkStore) {
        let header_text = vec![
            Span::raw("[marks] "),
            Span::styled(
                format!("{} folders", store.folders().len()),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(", "),
            Span::styled(
                format!("{} bookmarks", store.files().len()),
                Style::default().fg(Color::Green),
            ),
        ];

        let header =
            Paragraph::new(Line::from(header_text)).style(Style::default().bg(Color::DarkGray));
        frame.render_widget(header, area);
    }

    fn draw_panels(
        &self,
        frame: &mut Frame,
        area: Rect,
        store: &BookmarkStore,
        panels: &PanelState,
        config: &AppConfig,
    ) {
        let open = panels.open_panels();
        let panel_width = config.appearance.panel_width.max(8);

        let mut constraints: Vec<Constraint> = open
            .iter()
            .map(|_| Constraint::Length(panel_width))
            .collect();
        constraints.push(Constraint::Min(0)); // Unused trailing space

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (i, &panel_id) in open.iter().enumerate() {
            let title = if panel_id == ROOT_ID {
                "Bookmarks"
            } else {
                store.folder(panel_id).map(|f| f.title.as_str()).unwrap_or("?")
            };

            let widget = PanelWidget::new(
                title,
                store.folders_under(panel_id),
                store.files_under(panel_id),
                panels.highlighted(),
            )
            .expanded(open.get(i + 1).copied())
            .active(i == self.active_panel)
            .cursor((i == self.active_panel).then_some(self.cursor));

            frame.render_widget(widget, columns[i]);
        }
    }

    fn draw_footer(
        &self,
        frame: &mut Frame,
        area: Rect,
        store: &BookmarkStore,
        panels: &PanelState,
        config: &AppConfig,
    ) {
        let mut footer_text = vec![
            Span::raw("["),
            Span::styled("q", Style::default().fg(Color::Yellow)),
            Span::raw(" Quit] ["),
            Span::styled("h/l", Style::default().fg(Color::Yellow)),
            Span::raw(" Panel] ["),
            Span::styled("j/k", Style::default().fg(Color::Yellow)),
            Span::raw(" Row] ["),
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" Toggle] ["),
            Span::styled("?", Style::default().fg(Color::Yellow)),
            Span::raw(" Help]"),
        ];

        if config.appearance.show_urls {
            let open = panels.open_panels();
            if let Some(&panel_id) = open.get(self.active_panel) {
                if let Some(RowEntry::File(file)) = row_at(store, panel_id, self.cursor) {
                    footer_text.push(Span::raw("  → "));
                    footer_text.push(Span::styled(
                        file.url.clone(),
                        Style::default().fg(Color::Blue),
                    ));
                }
            }
        }

        let footer =
            Paragraph::new(Line::from(footer_text)).style(Style::default().bg(Color::DarkGray));
        frame.render_widget(footer, area);
    }

    fn draw_help(&self, frame: &mut Frame) {
        let area = centered_rect(50, 50, frame.area());

        let block = Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::Cyan));

        let help_text = vec![
            "Navigation:",
            "  h / Left    - Focus panel to the left",
            "  l / Right   - Focus panel to the right",
            "  j / Down    - Next row",
            "  k / Up      - Previous row",
            "",
            "Folders:",
            "  Enter       - Open or close the selected folder",
            "",
            "Press ? or Esc to close help",
        ];

        let text = Paragraph::new(help_text.join("\n"))
            .block(block)
            .style(Style::default());

        frame.render_widget(ratatui::widgets::Clear, area);
        frame.render_widget(text, area);
    }

    pub fn focus_left(&mut self) {
        if self.active_panel > 0 {
            self.active_panel -= 1;
            self.cursor = 0;
        }
    }

    pub fn focus_right(&mut self, panel_count: usize) {
        if self.active_panel + 1 < panel_count {
            self.active_panel += 1;
            self.cursor = 0;
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self, row_count: usize) {
        if self.cursor + 1 < row_count {
            self.cursor += 1;
        }
    }

    /// Moves focus onto `panel_index`, e.g. the panel a click just opened.
    pub fn focus_panel(&mut self, panel_index: usize) {
        self.active_panel = panel_index;
        self.cursor = 0;
    }

    pub fn selection(&self) -> (usize, usize) {
        (self.active_panel, self.cursor)
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn help_visible(&self) -> bool {
        self.show_help
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store() -> BookmarkStore {
        BookmarkStore::from_parts(
            vec![
                Folder {
                    id: 2,
                    title: "work".to_string(),
                    parent_id: 1,
                },
                Folder {
                    id: 3,
                    title: "play".to_string(),
                    parent_id: 1,
                },
            ],
            vec![Bookmark {
                id: 10,
                title: "a".to_string(),
                url: "http://x".to_string(),
                parent_id: 1,
            }],
        )
    }

    #[test]
    fn rows_list_folders_before_files() {
        let store = store();
        assert_eq!(panel_row_count(&store, ROOT_ID), 3);

        match row_at(&store, ROOT_ID, 0) {
            Some(RowEntry::Folder(f)) => assert_eq!(f.id, 2),
            other => panic!("expected folder row, got {other:?}"),
        }
        match row_at(&store, ROOT_ID, 2) {
            Some(RowEntry::File(f)) => assert_eq!(f.id, 10),
            other => panic!("expected file row, got {other:?}"),
        }
        assert!(row_at(&store, ROOT_ID, 3).is_none());
    }

    #[test]
    fn cursor_navigation_is_clamped() {
        let mut ui = Ui::new();
        ui.move_up();
        assert_eq!(ui.selection(), (0, 0));

        ui.move_down(2);
        ui.move_down(2);
        assert_eq!(ui.selection(), (0, 1));

        ui.focus_right(1);
        assert_eq!(ui.selection(), (0, 1));

        ui.focus_right(2);
        assert_eq!(ui.selection(), (1, 0));
        ui.focus_left();
        assert_eq!(ui.selection(), (0, 0));
    }
}
