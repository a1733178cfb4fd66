//! Wizard view
//!
//! Progress header, the current step's form and a summary of derived
//! values. Completed flows show their reference number.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::display::{format_pricing, format_timer};
use crate::tui::app::{App, InputMode};
use crate::tui::layout::WizardLayout;
use crate::wizard::WizardSnapshot;

/// Render the active wizard
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(snapshot) = &app.snapshot else {
        return;
    };
    let layout = WizardLayout::new(area);

    render_header(frame, snapshot, layout.header);
    render_form(frame, app, snapshot, layout.form);
    render_summary(frame, snapshot, layout.summary);
}

fn render_header(frame: &mut Frame, snapshot: &WizardSnapshot, area: Rect) {
    let title = format!(
        " {} · Step {} of {}: {} ",
        snapshot.flow, snapshot.step_number, snapshot.step_count, snapshot.step_label
    );
    let gauge = Gauge::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Cyan))
        .percent(u16::from(snapshot.progress_percent));
    frame.render_widget(gauge, area);
}

fn render_form(frame: &mut Frame, app: &App, snapshot: &WizardSnapshot, area: Rect) {
    let block = Block::default().title(" Details ").borders(Borders::ALL);
    let inner = block.inner(area);
    let fields = app.visible_fields();

    let lines: Vec<Line> = if snapshot.is_complete {
        vec![
            Line::from(Span::styled(
                " Done",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                " Reference: {}",
                snapshot.reference_id.as_deref().unwrap_or("-")
            )),
            Line::from(""),
            Line::from(" x: start over   Esc: home"),
        ]
    } else if fields.is_empty() {
        let mut lines: Vec<Line> = snapshot
            .fields
            .iter()
            .map(|(k, v)| Line::from(format!(" {:<16} {}", k, v)))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " Press n to continue",
            Style::default().fg(Color::Yellow),
        )));
        lines
    } else {
        fields
            .iter()
            .enumerate()
            .map(|(i, key)| {
                let style = if i == app.field_index {
                    Style::default().fg(Color::Black).bg(Color::Cyan)
                } else {
                    Style::default()
                };
                Line::from(Span::styled(
                    format!(" {:<16} {}", key, snapshot.field(key)),
                    style,
                ))
            })
            .collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);

    if app.input_mode == InputMode::Editing && app.field_index < usize::from(inner.height) {
        let row = Rect {
            x: inner.x + 1,
            y: inner.y + app.field_index as u16,
            width: inner.width.saturating_sub(1),
            height: 1,
        };
        frame.render_widget(Block::default(), row);
        frame.render_widget(&app.input, row);
    }
}

fn render_summary(frame: &mut Frame, snapshot: &WizardSnapshot, area: Rect) {
    let mut lines: Vec<Line> = format_pricing(snapshot)
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!(" {:<13}", label), Style::default().fg(Color::Cyan)),
                Span::raw(value),
            ])
        })
        .collect();

    if let Some(timer) = format_timer(snapshot) {
        lines.push(Line::from(""));
        lines.push(Line::from(format!(" Quote {}", timer)));
    }

    if lines.is_empty() {
        lines.push(Line::from(" Nothing to price"));
    }

    let block = Block::default().title(" Summary ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
