//! Layout definitions for the TUI
//!
//! Main panel above a one-line status bar; the wizard view splits its panel
//! into a progress header, the step form and a summary column.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Layout regions for the TUI
pub struct AppLayout {
    /// Main content area
    pub main: Rect,
    /// Status bar at the bottom
    pub status_bar: Rect,
}

impl AppLayout {
    /// Calculate layout from available area
    pub fn new(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Main area
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        Self {
            main: vertical[0],
            status_bar: vertical[1],
        }
    }
}

/// Layout for a wizard screen
pub struct WizardLayout {
    /// Flow title, step and progress gauge
    pub header: Rect,
    /// Fields of the current step
    pub form: Rect,
    /// Pricing, timer and reference
    pub summary: Rect,
}

impl WizardLayout {
    pub fn new(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Header
                Constraint::Min(5),    // Body
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(vertical[1]);

        Self {
            header: vertical[0],
            form: body[0],
            summary: body[1],
        }
    }
}
