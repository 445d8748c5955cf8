//! Terminal UI implementation using ratatui
//!
//! This module provides the concrete implementation of UIRenderer using ratatui
//! for a cross-platform terminal interface. It only draws; fetching and debouncing are
//! coordinated by the render loop.

use crate::error::Result;
use crate::render::ui::state::{FILTER_BOX_HEIGHT, STATUS_LINE_HEIGHT};
use crate::render::ui::{ColorTheme, UIRenderer, ViewState};
use ratatui::crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame, Terminal,
};
use std::io::{self, Stdout};
use unicode_width::UnicodeWidthStr;

type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Terminal UI implementation with ratatui backend
pub struct TerminalUI {
    terminal: Option<CrosstermTerminal>,
    theme: ColorTheme,
}

impl TerminalUI {
    pub fn new() -> Result<Self> {
        Self::with_theme(ColorTheme::default())
    }

    /// Create terminal UI with custom theme
    pub fn with_theme(theme: ColorTheme) -> Result<Self> {
        Ok(Self {
            terminal: None,
            theme,
        })
    }
}

/// Draw one complete frame: filter box, result list and status line.
pub fn draw_frame(frame: &mut Frame, view_state: &ViewState, theme: &ColorTheme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FILTER_BOX_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(STATUS_LINE_HEIGHT),
        ])
        .split(frame.size());

    render_filter_box(frame, chunks[0], view_state, theme);
    render_user_list(frame, chunks[1], view_state, theme);
    render_status(frame, chunks[2], view_state, theme);
}

fn render_filter_box(frame: &mut Frame, area: Rect, view_state: &ViewState, theme: &ColorTheme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.filter_border)
        .title("Filter by name");
    let inner_width = area.width.saturating_sub(2) as usize;

    // Keep the cursor inside the box by scrolling long filters horizontally.
    let before_cursor: String = view_state
        .filter_text
        .chars()
        .take(view_state.cursor)
        .collect();
    let cursor_col = before_cursor.width();
    let scroll = (cursor_col + 1).saturating_sub(inner_width);

    let mut text_style = Style::default();
    if let Some(color) = theme.filter_text {
        text_style = text_style.fg(color);
    }
    let input = Paragraph::new(view_state.filter_text.as_str())
        .style(text_style)
        .scroll((0, scroll as u16))
        .block(block);
    frame.render_widget(input, area);

    if area.width > 2 && area.height > 2 {
        frame.set_cursor(area.x + 1 + (cursor_col - scroll) as u16, area.y + 1);
    }
}

fn render_user_list(frame: &mut Frame, area: Rect, view_state: &ViewState, theme: &ColorTheme) {
    let mut item_style = Style::default();
    if let Some(color) = theme.list_item {
        item_style = item_style.fg(color);
    }

    // Rows are positional; the collection is always replaced whole, never patched.
    let items: Vec<ListItem> = view_state
        .visible_users()
        .map(|(_, user)| ListItem::new(user.name.as_str()).style(item_style))
        .collect();

    frame.render_widget(List::new(items), area);
}

fn render_status(frame: &mut Frame, area: Rect, view_state: &ViewState, theme: &ColorTheme) {
    let failed = view_state.status_line.failure.is_some();
    let status = Paragraph::new(view_state.format_status_line()).style(theme.status_style(failed));
    frame.render_widget(status, area);
}

impl UIRenderer for TerminalUI {
    fn render(&mut self, view_state: &ViewState) -> Result<()> {
        if let Some(ref mut terminal) = self.terminal {
            let theme = &self.theme;
            terminal.draw(move |frame| draw_frame(frame, view_state, theme))?;
        }
        Ok(())
    }

    fn initialize(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        self.terminal = Some(terminal);

        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.terminal.is_some() {
            disable_raw_mode()?;
            execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen)?;
            self.terminal = None;
        }
        Ok(())
    }

    fn get_terminal_size(&self) -> Result<(u16, u16)> {
        let (cols, rows) = ratatui::crossterm::terminal::size()?;
        Ok((cols, rows))
    }
}

impl Drop for TerminalUI {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
