//! Interactive TUI (Terminal User Interface) for the Vitrine gallery.
//!
//! Provides a responsive gallery browser with:
//! - Debounced search-as-you-type over image names
//! - A masonry grid whose cells load lazily as they scroll near the view
//! - A detail panel for the activated image

use crate::app::resolve_manifest;
use crate::surface::{ColumnLayout, PanelDetail, TermCellFactory};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;
use vitrine_core::{
    Config, Gallery, ImageId, ImageRecord, ManifestSource, RecordSource, RecordStore,
};

/// TUI application state.
struct TuiApp {
    /// The gallery pipeline
    gallery: Gallery,

    /// Detail panel slot shared with the `PanelDetail` boundary
    detail: Rc<RefCell<Option<ImageRecord>>>,

    /// Current search box contents
    query_string: String,

    /// Selected position within the visible cells
    selected: usize,

    /// Vertical scroll offset in layout rows
    scroll: f32,

    /// Grid area dimensions from the last draw, in terminal cells
    grid_width: u16,
    grid_height: u16,

    /// Whether we should quit
    should_quit: bool,

    /// Status message
    status_message: Option<String>,
}

impl TuiApp {
    fn new(gallery: Gallery, detail: Rc<RefCell<Option<ImageRecord>>>) -> Self {
        TuiApp {
            gallery,
            detail,
            query_string: String::new(),
            selected: 0,
            scroll: 0.0,
            grid_width: 0,
            grid_height: 0,
            should_quit: false,
            status_message: None,
        }
    }

    /// Handle an input character: update the search box and hand the full
    /// text to the debouncer.
    fn on_char(&mut self, c: char, now: Instant) {
        self.query_string.push(c);
        self.gallery.on_input(&self.query_string, now);
    }

    /// Handle backspace.
    fn on_backspace(&mut self, now: Instant) {
        self.query_string.pop();
        self.gallery.on_input(&self.query_string, now);
    }

    fn visible_ids(&self) -> Vec<ImageId> {
        self.gallery.coordinator().visible_ids()
    }

    fn selected_id(&self) -> Option<ImageId> {
        self.visible_ids().get(self.selected).copied()
    }

    /// Move selection backward.
    fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.ensure_visible();
        }
    }

    /// Move selection forward.
    fn select_next(&mut self) {
        if self.selected + 1 < self.visible_ids().len() {
            self.selected += 1;
            self.ensure_visible();
        }
    }

    /// Keep the selection valid after a filter pass changed the visible
    /// set.
    fn clamp_selection(&mut self) {
        let count = self.visible_ids().len();
        self.selected = self.selected.min(count.saturating_sub(1));
        self.ensure_visible();
    }

    /// Scroll just enough to bring the selected cell into the grid area.
    fn ensure_visible(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let Some(placement) = self
            .gallery
            .coordinator()
            .placements()
            .into_iter()
            .find(|p| p.id == id)
        else {
            return;
        };

        let view_bottom = self.scroll + self.grid_height as f32;
        if placement.bounds.y < self.scroll {
            self.scroll = placement.bounds.y;
        } else if placement.bounds.bottom() > view_bottom {
            self.scroll = placement.bounds.bottom() - self.grid_height as f32;
        }
    }

    fn page_up(&mut self) {
        self.scroll = (self.scroll - self.grid_height as f32).max(0.0);
    }

    fn page_down(&mut self) {
        self.scroll = (self.scroll + self.grid_height as f32).min(self.max_scroll());
    }

    /// The farthest the grid can scroll: the content extent minus one grid
    /// height, never negative.
    fn max_scroll(&self) -> f32 {
        let content = self
            .gallery
            .coordinator()
            .placements()
            .iter()
            .map(|p| p.bounds.bottom())
            .fold(0.0, f32::max);
        (content - self.grid_height as f32).max(0.0)
    }

    /// Activate the selected cell, opening the detail panel.
    fn open_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.gallery.activate(id);
        }
    }

    /// The viewport over the laid-out grid, in layout rows.
    fn viewport(&self) -> vitrine_core::Rect {
        vitrine_core::Rect::new(
            0.0,
            self.scroll,
            self.grid_width as f32,
            self.grid_height as f32,
        )
    }
}

/// Run the TUI application.
pub fn run(config: Config, manifest: Option<PathBuf>) -> anyhow::Result<()> {
    let path = resolve_manifest(&config, manifest)?;
    let records = ManifestSource::new(&path).fetch()?;
    let store = RecordStore::from_records(records)?;

    if store.is_empty() {
        eprintln!("Gallery is empty: {}", path.display());
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Build the gallery over the terminal surface
    let (term_width, _) = crossterm::terminal::size()?;
    let columns = config.ui.columns.max(1);
    let column_width = (term_width.saturating_sub(2) / columns).max(10) as f32;

    let detail_slot = Rc::new(RefCell::new(None));
    let layout = ColumnLayout::new(columns, column_width);
    let panel = PanelDetail::new(Rc::clone(&detail_slot));

    let mut gallery = Gallery::new(store, Box::new(layout), Box::new(panel));
    gallery.set_quiet_period(config.debounce());
    gallery.set_visibility_thresholds(config.viewport.margin, config.viewport.min_ratio);

    let mut factory = TermCellFactory;
    gallery.render_all(&mut factory);

    let mut tui_app = TuiApp::new(gallery, detail_slot);

    // Main loop
    let result = run_loop(&mut terminal, &mut tui_app, &config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Main event loop.
fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut TuiApp,
    config: &Config,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(config.tick_interval())? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let now = Instant::now();
                    let detail_open = app.detail.borrow().is_some();
                    match key.code {
                        KeyCode::Esc => {
                            if detail_open {
                                *app.detail.borrow_mut() = None;
                            } else {
                                app.should_quit = true;
                            }
                        }
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            app.should_quit = true;
                        }
                        _ if detail_open => {
                            // any other key closes the panel
                            *app.detail.borrow_mut() = None;
                        }
                        KeyCode::Char(c) => {
                            app.on_char(c, now);
                        }
                        KeyCode::Backspace => {
                            app.on_backspace(now);
                        }
                        KeyCode::Left | KeyCode::Up => {
                            app.select_previous();
                        }
                        KeyCode::Right | KeyCode::Down => {
                            app.select_next();
                        }
                        KeyCode::PageUp => {
                            app.page_up();
                        }
                        KeyCode::PageDown => {
                            app.page_down();
                        }
                        KeyCode::Enter => {
                            app.open_selected();
                        }
                        _ => {}
                    }
                }
            }
        }

        // Drive the debounce timer and the lazy loader every tick
        if app.gallery.tick(Instant::now()) {
            app.clamp_selection();
            let visible = app.visible_ids().len();
            app.status_message = if app.gallery.active_query().is_some() {
                Some(format!("{} images match", visible))
            } else {
                None
            };
        }

        let viewport = app.viewport();
        app.gallery.observe_viewport(&viewport);

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

mod ui {
    use super::*;

    /// Draw the UI.
    pub fn draw(f: &mut Frame, app: &mut TuiApp) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Search box
                Constraint::Min(10),   // Gallery grid
                Constraint::Length(2), // Status bar
            ])
            .split(f.area());

        draw_search_box(f, app, chunks[0]);
        draw_grid(f, app, chunks[1]);
        draw_status_bar(f, app, chunks[2]);
        draw_detail_panel(f, app);
    }

    /// Draw the search input box.
    fn draw_search_box(f: &mut Frame, app: &TuiApp, area: Rect) {
        let title = if app.gallery.filter_pending() {
            " Search (typing...) "
        } else {
            " Search (type to filter) "
        };
        let input = Paragraph::new(app.query_string.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(input, area);

        f.set_cursor_position(Position::new(
            area.x + 1 + cursor_column(&app.query_string, area.width),
            area.y + 1,
        ));
    }

    /// Cursor column inside the search box: one column per character, not
    /// per byte, clamped to the box interior.
    pub(super) fn cursor_column(query: &str, area_width: u16) -> u16 {
        let chars = query.chars().count().min(u16::MAX as usize) as u16;
        chars.min(area_width.saturating_sub(2))
    }

    /// Draw the gallery grid: every visible cell whose placement overlaps
    /// the scrolled viewport.
    fn draw_grid(f: &mut Frame, app: &mut TuiApp, area: Rect) {
        app.grid_width = area.width;
        app.grid_height = area.height;

        let selected_id = app.selected_id();
        let placements = app.gallery.coordinator().placements();

        for placement in placements {
            let cell_top = placement.bounds.y - app.scroll;
            let cell_bottom = placement.bounds.bottom() - app.scroll;
            if cell_bottom <= 0.0 || cell_top >= area.height as f32 {
                continue;
            }

            // clip to the grid area
            let top = cell_top.max(0.0) as u16;
            let bottom = (cell_bottom.min(area.height as f32)) as u16;
            if bottom <= top {
                continue;
            }
            let x = area.x + placement.bounds.x as u16;
            let width = (placement.bounds.width as u16).min(area.width.saturating_sub(
                placement.bounds.x as u16,
            ));
            if width == 0 {
                continue;
            }
            let rect = Rect::new(x, area.y + top, width, bottom - top);

            let Some(record) = app.gallery.store().get(placement.id) else {
                continue;
            };
            let loaded = app
                .gallery
                .coordinator()
                .cell(placement.id)
                .and_then(|cell| cell.source())
                .is_some();

            let style = if Some(placement.id) == selected_id {
                Style::default().fg(Color::White).bg(Color::Blue)
            } else if loaded {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            let marker = if loaded { "\u{25a0}" } else { "\u{25a1}" };
            let body = format!("{} {}x{}", marker, record.width, record.height);
            let cell_widget = Paragraph::new(body).style(style).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(truncate(&record.name, width.saturating_sub(2) as usize)),
            );
            f.render_widget(cell_widget, rect);
        }
    }

    /// Draw the status bar.
    fn draw_status_bar(f: &mut Frame, app: &TuiApp, area: Rect) {
        let total = app.gallery.store().len();
        let visible = app.visible_ids().len();

        let status = if let Some(ref msg) = app.status_message {
            msg.clone()
        } else {
            format!(
                "{} images, {} shown | \u{2190}\u{2192}:Select Enter:Details PgUp/PgDn:Scroll Esc:Quit",
                total, visible
            )
        };

        let status_bar = Paragraph::new(status).style(Style::default().fg(Color::Gray));
        f.render_widget(status_bar, area);
    }

    /// Draw the detail panel over the grid when a cell was activated.
    fn draw_detail_panel(f: &mut Frame, app: &TuiApp) {
        let slot = app.detail.borrow();
        let Some(record) = slot.as_ref() else {
            return;
        };

        let area = centered_rect(60, 40, f.area());
        f.render_widget(Clear, area);

        let lines = vec![
            Line::from(Span::styled(
                record.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!("Width:    {} px", record.width)),
            Line::from(format!("Height:   {} px", record.height)),
            Line::from(format!(
                "Uploaded: {}",
                record.time.format("%a %b %e, %Y")
            )),
            Line::from(format!("Path:     {}", record.path)),
            Line::from(""),
            Line::from(Span::styled(
                "Esc to close",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let panel = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Image Details "),
        );
        f.render_widget(panel, area);
    }

    /// A centered sub-rectangle taking the given percentages of the frame.
    fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
        let vertical = Layout::default()
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
            .split(vertical[1])[1]
    }

    fn truncate(name: &str, max: usize) -> String {
        if name.chars().count() <= max {
            name.to_string()
        } else {
            let keep: String = name.chars().take(max.saturating_sub(1)).collect();
            format!("{}\u{2026}", keep)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn app_with(records: u64) -> TuiApp {
        let records = (1..=records)
            .map(|id| {
                ImageRecord::new(
                    ImageId::new(id),
                    format!("img-{}.png", id),
                    format!("/images/img-{}.png", id),
                    100,
                    400,
                    Utc.timestamp_opt(1_600_000_000, 0).unwrap(),
                )
            })
            .collect();
        let store = RecordStore::from_records(records).unwrap();

        let slot = Rc::new(RefCell::new(None));
        let layout = ColumnLayout::new(1, 6.0);
        let panel = PanelDetail::new(Rc::clone(&slot));
        let mut gallery = Gallery::new(store, Box::new(layout), Box::new(panel));
        let mut factory = TermCellFactory;
        gallery.render_all(&mut factory);

        TuiApp::new(gallery, slot)
    }

    #[test]
    fn test_page_down_stops_at_content_extent() {
        let mut app = app_with(10);
        app.grid_height = 20;

        let max = app.max_scroll();
        assert!(max > 0.0);

        for _ in 0..10 {
            app.page_down();
        }
        assert_eq!(app.scroll, max);

        // and page_up walks back to the top, never below zero
        for _ in 0..10 {
            app.page_up();
        }
        assert_eq!(app.scroll, 0.0);
    }

    #[test]
    fn test_short_content_never_scrolls() {
        let mut app = app_with(1);
        app.grid_height = 20;

        app.page_down();
        assert_eq!(app.scroll, 0.0);
    }

    #[test]
    fn test_cursor_column_counts_characters_not_bytes() {
        // 5 characters, 6 bytes
        assert_eq!(ui::cursor_column("h\u{e9}llo", 40), 5);
        // 3 characters, 9 bytes
        assert_eq!(ui::cursor_column("\u{65e5}\u{672c}\u{8a9e}", 40), 3);
        assert_eq!(ui::cursor_column("", 40), 0);
    }

    #[test]
    fn test_cursor_column_clamped_to_box_interior() {
        let long = "a".repeat(100);
        assert_eq!(ui::cursor_column(&long, 20), 18);
        assert_eq!(ui::cursor_column(&long, 1), 0);
    }
}
