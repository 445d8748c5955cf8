//! UI state management structures
//!
//! This module contains everything the renderer needs to draw one frame: the live filter
//! text, the displayed user collection and the status line. Fetching is handled elsewhere.

use crate::directory::User;

/// Rows taken by the bordered filter box.
pub const FILTER_BOX_HEIGHT: u16 = 3;
/// Rows taken by the status line.
pub const STATUS_LINE_HEIGHT: u16 = 1;

/// View state for rendering
#[derive(Debug)]
pub struct ViewState {
    /// Live filter text, updated on every keystroke
    pub filter_text: String,

    /// Cursor position inside `filter_text`, in chars
    pub cursor: usize,

    /// Displayed user collection, replaced wholesale on every accepted fetch
    pub users: Vec<User>,

    /// Index of the first user row currently on screen
    pub list_offset: usize,

    /// Status line content
    pub status_line: StatusLine,

    /// Viewport dimensions
    pub viewport_width: u16,
    pub viewport_height: u16,
}

impl ViewState {
    /// Create the state for a freshly mounted screen
    pub fn new(viewport_width: u16, viewport_height: u16) -> Self {
        Self {
            filter_text: String::new(),
            cursor: 0,
            users: Vec::new(),
            list_offset: 0,
            status_line: StatusLine::new(),
            viewport_width,
            viewport_height,
        }
    }

    /// Number of list rows that fit between the filter box and the status line
    pub fn lines_per_page(&self) -> u16 {
        self.viewport_height
            .saturating_sub(FILTER_BOX_HEIGHT + STATUS_LINE_HEIGHT)
    }

    /// Update the live filter text and cursor
    pub fn set_filter(&mut self, text: String, cursor: usize) {
        self.filter_text = text;
        self.cursor = cursor;
    }

    /// Replace the displayed collection and jump back to the top of the list
    pub fn replace_users(&mut self, users: Vec<User>) {
        self.users = users;
        self.list_offset = 0;
    }

    /// Users visible in the current page, paired with their absolute row index
    pub fn visible_users(&self) -> impl Iterator<Item = (usize, &User)> {
        self.users
            .iter()
            .enumerate()
            .skip(self.list_offset)
            .take(self.lines_per_page() as usize)
    }

    fn max_offset(&self) -> usize {
        self.users
            .len()
            .saturating_sub(self.lines_per_page() as usize)
    }

    /// Scroll the list by `delta` rows, clamped to the available content
    pub fn scroll_by(&mut self, delta: i64) {
        let target = if delta < 0 {
            self.list_offset.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            self.list_offset.saturating_add(delta as usize)
        };
        self.list_offset = target.min(self.max_offset());
    }

    pub fn go_to_start(&mut self) {
        self.list_offset = 0;
    }

    pub fn go_to_end(&mut self) {
        self.list_offset = self.max_offset();
    }

    /// Update terminal dimensions, keeping the list offset in range.
    /// Returns true if dimensions actually changed
    pub fn update_terminal_size(&mut self, width: u16, height: u16) -> bool {
        let changed = self.viewport_width != width || self.viewport_height != height;

        if changed {
            self.viewport_width = width;
            self.viewport_height = height;
            self.list_offset = self.list_offset.min(self.max_offset());
        }

        changed
    }

    /// Format the complete status line for this view state
    pub fn format_status_line(&self) -> String {
        self.status_line.format_status_line(self.users.len())
    }
}

/// Status line information
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    /// Filter of the collection currently on screen
    pub shown_filter: Option<String>,
    /// True while the response the screen is waiting for is outstanding
    pub loading: bool,
    /// Last fetch failure, kept until a later fetch succeeds
    pub failure: Option<String>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed fetch
    pub fn set_failure(&mut self, message: String) {
        self.failure = Some(message);
    }

    pub fn clear_failure(&mut self) {
        self.failure = None;
    }

    /// Format the status line for display
    pub fn format_status_line(&self, user_count: usize) -> String {
        let noun = if user_count == 1 { "user" } else { "users" };
        let mut parts = vec![format!("{} {}", user_count, noun)];

        match self.shown_filter.as_deref() {
            Some("") => parts.push("all names".to_string()),
            Some(filter) => parts.push(format!("name contains \"{}\"", filter)),
            None => {}
        }
        if self.loading {
            parts.push("loading…".to_string());
        }
        if let Some(ref failure) = self.failure {
            parts.push(format!("Request failed: {}", failure));
        }

        parts.join(" | ")
    }
}
