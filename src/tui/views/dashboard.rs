//! Dashboard view
//!
//! Flow menu, wallet balances and saved beneficiaries.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::catalog::ReferenceData;
use crate::models::BeneficiaryStatus;
use crate::tui::app::{App, MENU};

/// Render the dashboard
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(40)])
        .split(area);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(4)])
        .split(columns[1]);

    render_menu(frame, app, columns[0]);
    render_balances(frame, app, right[0]);
    render_beneficiaries(frame, app, right[1]);
}

fn render_menu(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = MENU
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            let text = format!(" {} {}", i + 1, kind);
            if i == app.menu_index {
                Line::from(Span::styled(
                    text,
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(text)
            }
        })
        .collect();

    let block = Block::default().title(" PayStreet ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_balances(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = app
        .session
        .catalog()
        .list_currencies()
        .iter()
        .map(|c| {
            Line::from(vec![
                Span::styled(format!(" {:<4}", c.code), Style::default().fg(Color::Cyan)),
                Span::raw(format!("{:>16}", c.balance.format(c.minor_units))),
                Span::styled(format!("  {}", c.name), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let block = Block::default().title(" Balances ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_beneficiaries(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = match app.session.catalog().list_beneficiaries() {
        Ok(list) if list.is_empty() => vec![Line::from(" No beneficiaries yet")],
        Ok(list) => list
            .iter()
            .map(|b| {
                let status_color = match b.status {
                    BeneficiaryStatus::Verified => Color::Green,
                    BeneficiaryStatus::Pending => Color::Yellow,
                    BeneficiaryStatus::Failed => Color::Red,
                };
                Line::from(vec![
                    Span::raw(if b.is_favorite { " * " } else { "   " }),
                    Span::raw(format!("{:<28}", b.legal_name)),
                    Span::styled(
                        format!("{:<10}", b.masked_account()),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(b.status.to_string(), Style::default().fg(status_color)),
                ])
            })
            .collect(),
        Err(e) => vec![Line::from(Span::styled(
            format!(" {}", e),
            Style::default().fg(Color::Red),
        ))],
    };

    let block = Block::default().title(" Beneficiaries ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
