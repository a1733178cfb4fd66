//! Status bar view
//!
//! Shows the quote countdown, the last status message and key hints

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::app::{ActiveView, App, InputMode};
use crate::wizard::TimerState;

/// Render the status bar
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![];

    if let Some(snapshot) = &app.snapshot {
        spans.push(Span::styled(
            format!(" {} ", snapshot.flow),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

        if let (Some(state), Some(remaining)) =
            (snapshot.timer_state, snapshot.timer_remaining_seconds)
        {
            let color = match state {
                TimerState::Active if remaining <= 30 => Color::Red,
                TimerState::Active => Color::Yellow,
                TimerState::Locked => Color::Green,
                TimerState::Expired => Color::Red,
            };
            spans.push(Span::raw("│ "));
            spans.push(Span::styled(
                format!("Quote {} {}:{:02} ", state, remaining / 60, remaining % 60),
                Style::default().fg(color),
            ));
        }
    }

    if let Some(ref message) = app.status_message {
        spans.push(Span::raw("│ "));
        spans.push(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Yellow),
        ));
    }

    let hints = match (app.active_view, app.input_mode) {
        (_, InputMode::Editing) => " Enter:Save  Esc:Discard ",
        (ActiveView::Dashboard, _) => " Enter:Start  1-3:Flow  q:Quit ",
        (ActiveView::Wizard, _) => " Enter:Edit  n:Next  b:Back  l:Lock  s:Swap  x:Reset  Esc:Home ",
    };

    let left_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding_len = (area.width as usize).saturating_sub(left_len + hints.len());
    spans.push(Span::raw(" ".repeat(padding_len.max(1))));
    spans.push(Span::styled(hints, Style::default().fg(Color::White)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
