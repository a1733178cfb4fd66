//! Event handler for the TUI
//!
//! Routes keyboard events to the appropriate handlers based on the current
//! view and input mode.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{ActiveView, App, InputMode, MENU};
use super::event::Event;

/// Handle an incoming event
pub fn handle_event(app: &mut App, event: Event) -> Result<()> {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::QuoteTick => {
            app.on_quote_tick();
            Ok(())
        }
        Event::Tick | Event::Resize(_, _) => Ok(()),
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return Ok(());
    }

    match app.input_mode {
        InputMode::Editing => handle_editing_key(app, key),
        InputMode::Normal => match app.active_view {
            ActiveView::Dashboard => handle_dashboard_key(app, key),
            ActiveView::Wizard => handle_wizard_key(app, key),
        },
    }
    Ok(())
}

fn handle_dashboard_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Enter => {
            if let Some(kind) = MENU.get(app.menu_index) {
                app.start_flow(*kind);
            }
        }
        KeyCode::Char(c @ '1'..='3') => {
            let index = c as usize - '1' as usize;
            app.menu_index = index;
            app.start_flow(MENU[index]);
        }
        _ => {}
    }
}

fn handle_wizard_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        KeyCode::Esc => app.leave_flow(),
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Enter | KeyCode::Char('e') => {
            if app.focused_field().is_some() {
                app.begin_edit();
            } else {
                app.advance();
            }
        }
        KeyCode::Char('n') | KeyCode::Right => app.advance(),
        KeyCode::Char('b') | KeyCode::Left => app.retreat(),
        KeyCode::Char('l') => app.lock_rate(),
        KeyCode::Char('s') => app.swap_currencies(),
        KeyCode::Char('x') => app.reset(),
        _ => {}
    }
}

fn handle_editing_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.commit_edit(),
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Backspace => app.input.backspace(),
        KeyCode::Left => app.input.move_left(),
        KeyCode::Right => app.input.move_right(),
        KeyCode::Char(c) => app.input.insert(c),
        _ => {}
    }
}
