//! TUI Views module
//!
//! The dashboard, the wizard screens and the status bar.

pub mod dashboard;
pub mod status_bar;
pub mod wizard;

use ratatui::Frame;

use super::app::{ActiveView, App};
use super::layout::AppLayout;

/// Render the entire application
pub fn render(frame: &mut Frame, app: &App) {
    let layout = AppLayout::new(frame.area());

    match app.active_view {
        ActiveView::Dashboard => dashboard::render(frame, app, layout.main),
        ActiveView::Wizard => wizard::render(frame, app, layout.main),
    }

    status_bar::render(frame, app, layout.status_bar);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{StaticCatalog, StaticRates};
    use crate::session::FlowSession;
    use crate::wizard::FlowKind;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::{mpsc, Arc};
    use std::time::Duration;

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app() -> App {
        let (tx, _rx) = mpsc::channel();
        let session = FlowSession::new(Arc::new(StaticCatalog::new()), Arc::new(StaticRates::new()));
        App::new(session, Duration::from_secs(3600), tx)
    }

    #[test]
    fn test_dashboard_lists_flows_and_beneficiaries() {
        let app = app();
        let text = screen(&app);
        assert!(text.contains("Send Money"));
        assert!(text.contains("Currency Conversion"));
        assert!(text.contains("Microsoft Corporation"));
        assert!(text.contains("24,580.00"));
    }

    #[test]
    fn test_wizard_screen() {
        let mut app = app();
        app.start_flow(FlowKind::SendMoney);
        let text = screen(&app);
        assert!(text.contains("Step 1 of 7: Recipient"));
        assert!(text.contains("recipient_name"));
        assert!(text.contains("Total debit"));
    }
}
