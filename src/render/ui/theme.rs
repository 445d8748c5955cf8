//! Color theme and styling definitions using ratatui colors
//!
//! This module provides color themes for terminal rendering using ratatui's
//! color system directly to avoid unnecessary abstractions.

use ratatui::style::{Color, Modifier, Style};

/// Color theme for terminal UI elements
#[derive(Debug, Clone)]
pub struct ColorTheme {
    /// Filter box border and title
    pub filter_border: Style,

    /// Text typed into the filter box (None uses terminal default)
    pub filter_text: Option<Color>,

    /// User names in the result list (None uses terminal default)
    pub list_item: Option<Color>,

    /// Status line background
    pub status_bg: Color,

    /// Status line text
    pub status_fg: Color,

    /// Status line while a fetch failure is shown
    pub error_text: Color,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            filter_border: Style::default().fg(Color::Cyan),
            filter_text: None,
            list_item: None,
            status_bg: Color::Blue,
            status_fg: Color::White,
            error_text: Color::Red,
        }
    }
}

impl ColorTheme {
    /// Create a monochrome theme for terminals without color support
    pub fn monochrome() -> Self {
        Self {
            filter_border: Style::default().add_modifier(Modifier::BOLD),
            filter_text: None,
            list_item: None,
            status_bg: Color::Black,
            status_fg: Color::White,
            error_text: Color::White,
        }
    }

    /// Create a high-contrast theme for accessibility
    pub fn high_contrast() -> Self {
        Self {
            filter_border: Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
            filter_text: Some(Color::White),
            list_item: Some(Color::White),
            status_bg: Color::White,
            status_fg: Color::Black,
            error_text: Color::LightRed,
        }
    }

    /// Look up a theme by the name used on the command line
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::default()),
            "monochrome" => Some(Self::monochrome()),
            "high-contrast" => Some(Self::high_contrast()),
            _ => None,
        }
    }

    /// Style for the status line, switching to the error color while a failure is shown
    pub fn status_style(&self, failed: bool) -> Style {
        let fg = if failed { self.error_text } else { self.status_fg };
        Style::default().bg(self.status_bg).fg(fg)
    }
}
