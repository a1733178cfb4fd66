//! Terminal User Interface module
//!
//! An interactive front end over `FlowSession` built with ratatui: a
//! dashboard to pick a flow, one screen per wizard step, and a live quote
//! countdown in the status bar.

pub mod app;
pub mod event;
pub mod handler;
pub mod layout;
pub mod terminal;
pub mod views;
pub mod widgets;

pub use app::App;
pub use terminal::run_tui;
