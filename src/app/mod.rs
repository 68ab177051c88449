use crate::config::AppConfig;
use crate::panels::PanelState;
use crate::store::{BookmarkStore, TreeIndex};
use crate::ui::{self, RowEntry, Ui};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

pub struct MarksApp {
    store: BookmarkStore,
    index: TreeIndex,
    panels: PanelState,
    ui: Ui,
    config: AppConfig,
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    should_quit: bool,
}

impl MarksApp {
    pub fn new(config: AppConfig) -> Result<Self> {
        tracing::info!(url = %config.source.url, "MarksApp::new");

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            store: BookmarkStore::empty(),
            index: TreeIndex::default(),
            panels: PanelState::new(),
            ui: Ui::new(),
            config,
            terminal,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        tracing::info!("App::run started");

        self.load_store().await;

        let mut needs_redraw = true;
        loop {
            if self.should_quit {
                tracing::debug!("Quit flag set, exiting loop");
                break;
            }

            if needs_redraw {
                let store = &self.store;
                let panels = &self.panels;
                let config = &self.config;
                let ui = &mut self.ui;
                match self.terminal.draw(|frame| {
                    ui.draw(frame, store, panels, config);
                }) {
                    Ok(_) => {}
                    Err(e) => tracing::error!("Draw failed: {}", e),
                }
                needs_redraw = false;
            }

            if event::poll(Duration::from_millis(100))? {
                match event::read()? {
                    Event::Key(key) => {
                        self.handle_key_event(key);
                        needs_redraw = true;
                    }
                    Event::Resize(width, height) => {
                        tracing::debug!("Terminal resized to {}x{}", width, height);
                        needs_redraw = true;
                    }
                    _ => {}
                }
            }
        }

        self.cleanup()?;
        Ok(())
    }

    /// One fetch per application lifetime. A failure is logged and leaves the
    /// store empty, so the UI shows just the root panel with nothing inside
    /// it. No retry, no error screen.
    async fn load_store(&mut self) {
        let timeout = Duration::from_secs(self.config.source.timeout_secs);
        match BookmarkStore::load(&self.config.source.url, timeout).await {
            Ok(store) => {
                self.index = TreeIndex::build(store.folders());
                self.store = store;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load bookmark document");
            }
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        tracing::debug!("Key event: {:?}", key.code);

        if self.ui.help_visible() {
            // Any dismissing key closes the overlay.
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.ui.toggle_help();
            }
            return;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Char('Q'), KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            (KeyCode::Char('h') | KeyCode::Left, _) => {
                self.ui.focus_left();
            }
            (KeyCode::Char('l') | KeyCode::Right, _) => {
                self.ui.focus_right(self.panels.open_panels().len());
            }
            (KeyCode::Char('j') | KeyCode::Down, _) => {
                let rows = self.active_panel_rows();
                self.ui.move_down(rows);
            }
            (KeyCode::Char('k') | KeyCode::Up, _) => {
                self.ui.move_up();
            }
            (KeyCode::Enter, _) => {
                self.activate_selection();
            }
            (KeyCode::Char('?'), _) => {
                self.ui.toggle_help();
            }
            _ => {}
        }
    }

    fn active_panel_rows(&self) -> usize {
        let (panel_index, _) = self.ui.selection();
        self.panels
            .open_panels()
            .get(panel_index)
            .map(|&id| ui::panel_row_count(&self.store, id))
            .unwrap_or(0)
    }

    /// Routes Enter on the selected row. A folder row is the click callback
    /// of the panel controller; a bookmark row has no action beyond the URL
    /// already shown in the footer.
    fn activate_selection(&mut self) {
        let (panel_index, row) = self.ui.selection();
        let Some(&panel_id) = self.panels.open_panels().get(panel_index) else {
            return;
        };

        match ui::row_at(&self.store, panel_id, row) {
            Some(RowEntry::Folder(folder)) => {
                let folder_id = folder.id;
                self.panels.handle_folder_click(folder_id, &self.index);

                if let Some(pos) = self
                    .panels
                    .open_panels()
                    .iter()
                    .position(|&id| id == folder_id)
                {
                    // The click opened the folder: focus its new panel.
                    self.ui.focus_panel(pos);
                }
                // On close, Ui::draw clamps focus back into range.
            }
            Some(RowEntry::File(file)) => {
                tracing::debug!(url = %file.url, "bookmark activated");
            }
            None => {}
        }
    }

    fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for MarksApp {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
