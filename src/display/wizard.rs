//! Wizard snapshot formatting
//!
//! Renders a `WizardSnapshot` as the plain-text summary printed by the
//! one-shot commands and shown on the review screens.

use crate::models::Money;
use crate::wizard::{FlowKind, WizardSnapshot};

/// Money in the snapshot's source currency
pub fn source_amount(snapshot: &WizardSnapshot, amount: Money) -> String {
    match &snapshot.source_currency {
        Some(code) => amount.format_with_code(snapshot.source_scale, code),
        None => amount.format(snapshot.source_scale),
    }
}

/// Money in the snapshot's target currency
pub fn target_amount(snapshot: &WizardSnapshot, amount: Money) -> String {
    match &snapshot.target_currency {
        Some(code) => amount.format_with_code(snapshot.target_scale, code),
        None => amount.format(snapshot.target_scale),
    }
}

/// "Step 3 of 7: Amount [#####-----] 33%"
pub fn format_progress(snapshot: &WizardSnapshot) -> String {
    let filled = usize::from(snapshot.progress_percent) / 10;
    format!(
        "Step {} of {}: {} [{}{}] {}%",
        snapshot.step_number,
        snapshot.step_count,
        snapshot.step_label,
        "#".repeat(filled),
        "-".repeat(10 - filled),
        snapshot.progress_percent
    )
}

/// Countdown as m:ss, or the timer state when it is not counting
pub fn format_timer(snapshot: &WizardSnapshot) -> Option<String> {
    let state = snapshot.timer_state?;
    let remaining = snapshot.timer_remaining_seconds.unwrap_or(0);
    Some(format!("{} {}:{:02}", state, remaining / 60, remaining % 60))
}

/// Pricing lines for the flow, empty for flows without pricing
pub fn format_pricing(snapshot: &WizardSnapshot) -> Vec<(String, String)> {
    let d = &snapshot.derived;
    let mut lines = Vec::new();

    match snapshot.flow {
        FlowKind::SendMoney => {
            if let Some(method) = &snapshot.payment_method {
                lines.push(("Method".to_string(), method.clone()));
            }
            if let Some(arrival) = &snapshot.expected_arrival {
                lines.push(("Arrives".to_string(), arrival.clone()));
            }
            lines.push(("Transfer fee".to_string(), source_amount(snapshot, d.fee)));
            lines.push(("Total debit".to_string(), source_amount(snapshot, d.total)));
        }
        FlowKind::Conversion => {
            if let Some(quote) = &snapshot.quote {
                lines.push((
                    "Rate".to_string(),
                    format!("1 {} = {} {}", quote.from, quote.rate, quote.to),
                ));
                if !quote.markup_percent.is_zero() {
                    lines.push((
                        "Interbank rate".to_string(),
                        format!(
                            "1 {} = {} {}",
                            quote.from,
                            quote.mid_market_rate().round_dp(4).normalize(),
                            quote.to
                        ),
                    ));
                }
                lines.push(("Markup".to_string(), format!("{}%", quote.markup_percent)));
                if quote.locked {
                    lines.push(("Rate lock".to_string(), "Locked".to_string()));
                }
            }
            lines.push(("Fee".to_string(), target_amount(snapshot, d.fee)));
            lines.push((
                "You receive".to_string(),
                target_amount(snapshot, d.converted_amount),
            ));
        }
        FlowKind::Beneficiary => {}
    }

    lines
}

/// Full plain-text summary of a snapshot
pub fn format_snapshot(snapshot: &WizardSnapshot) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", snapshot.flow));
    output.push_str(&format!("{}\n", format_progress(snapshot)));

    if let Some(timer) = format_timer(snapshot) {
        output.push_str(&format!("Quote: {}\n", timer));
    }

    output.push('\n');

    let width = snapshot
        .fields
        .keys()
        .map(|k| k.len())
        .chain(std::iter::once(12))
        .max()
        .unwrap_or(12);

    for (key, value) in &snapshot.fields {
        output.push_str(&format!("  {:<width$}  {}\n", key, value, width = width));
    }

    let pricing = format_pricing(snapshot);
    if !pricing.is_empty() {
        output.push('\n');
        for (label, value) in pricing {
            output.push_str(&format!("  {:<width$}  {}\n", label, value, width = width));
        }
    }

    if let Some(reference) = &snapshot.reference_id {
        output.push_str(&format!("\nReference: {}\n", reference));
    }

    output
}
