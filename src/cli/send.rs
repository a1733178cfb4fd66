//! Send money CLI command

use clap::Args;
use tracing::info;

use crate::catalog::ReferenceData;
use crate::error::PaystreetResult;
use crate::session::FlowSession;
use crate::wizard::FlowKind;

use super::{render_snapshot, run_to_completion, set_optional, OutputFormat};

/// Arguments for a one-shot payment
#[derive(Args, Debug)]
pub struct SendArgs {
    /// Saved beneficiary (ID or name) or a new recipient's name
    #[arg(short, long)]
    pub recipient: String,
    /// Recipient bank, filled from the beneficiary when omitted
    #[arg(short, long)]
    pub bank: Option<String>,
    /// Recipient account number
    #[arg(long)]
    pub account: Option<String>,
    /// Amount to send (e.g., "500" or "1,250.50")
    #[arg(short, long)]
    pub amount: String,
    /// Currency to send in (USD, EUR, GBP, JPY)
    #[arg(short, long)]
    pub currency: Option<String>,
    /// Purpose (business, goods, invoice, salary, other)
    #[arg(short, long)]
    pub purpose: String,
    /// Payment method (swift, ach, sepa, faster)
    #[arg(short, long, default_value = "swift")]
    pub method: String,
    /// Note for the recipient
    #[arg(short, long)]
    pub note: Option<String>,
    /// Execution date (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<String>,
    /// Repeat the payment
    #[arg(long)]
    pub recurring: bool,
    /// Repeat interval (weekly, monthly, quarterly, annually)
    #[arg(short, long)]
    pub frequency: Option<String>,
}

/// Handle the send command
pub fn handle_send_command(
    session: &mut FlowSession,
    format: OutputFormat,
    args: SendArgs,
) -> PaystreetResult<()> {
    session.start(FlowKind::SendMoney)?;

    match session.catalog().find_beneficiary_by_ref(&args.recipient) {
        Ok(beneficiary) => {
            session.select_beneficiary(beneficiary.id)?;
        }
        Err(e) if e.is_not_found() => {
            session.set_field("recipient_name", &args.recipient)?;
        }
        Err(e) => return Err(e),
    }

    set_optional(session, "bank_name", args.bank.as_deref())?;
    set_optional(session, "account_number", args.account.as_deref())?;
    set_optional(session, "currency", args.currency.as_deref())?;
    session.set_field("amount", &args.amount)?;
    session.set_field("purpose", &args.purpose)?;
    session.set_field("payment_method", &args.method)?;
    set_optional(session, "note", args.note.as_deref())?;
    set_optional(session, "scheduled_date", args.date.as_deref())?;
    if args.recurring {
        session.set_field("recurring", "yes")?;
    }
    set_optional(session, "frequency", args.frequency.as_deref())?;

    let snapshot = run_to_completion(session)?;
    info!(reference = ?snapshot.reference_id, "payment submitted");

    print!("{}", render_snapshot(&snapshot, format)?);
    if format == OutputFormat::Text {
        println!("Payment submitted.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{StaticCatalog, StaticRates};
    use crate::wizard::{MemorySink, WizardEvent};
    use std::sync::Arc;

    fn session() -> (FlowSession, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let session =
            FlowSession::new(Arc::new(StaticCatalog::new()), Arc::new(StaticRates::new()))
                .with_events(sink.clone());
        (session, sink)
    }

    fn args(recipient: &str) -> SendArgs {
        SendArgs {
            recipient: recipient.to_string(),
            bank: None,
            account: None,
            amount: "500".into(),
            currency: None,
            purpose: "invoice".into(),
            method: "swift".into(),
            note: None,
            date: None,
            recurring: false,
            frequency: None,
        }
    }

    #[test]
    fn test_send_to_saved_beneficiary() {
        let (mut session, sink) = session();
        handle_send_command(&mut session, OutputFormat::Json, args("Microsoft Corporation"))
            .unwrap();

        let snapshot = session.snapshot().unwrap();
        assert!(snapshot.is_complete);
        assert_eq!(snapshot.field("bank_name"), "JP Morgan Chase");
        assert_eq!(snapshot.derived.total.minor(), 52_500);
        assert!(matches!(sink.last(), Some(WizardEvent::Submitted { .. })));
    }

    #[test]
    fn test_new_recipient_needs_bank() {
        let (mut session, sink) = session();
        let err = handle_send_command(&mut session, OutputFormat::Text, args("Jane Doe"))
            .unwrap_err();

        assert_eq!(err.field(), Some("bank_name"));
        assert_eq!(session.snapshot().unwrap().current_step, "bank");
        assert!(sink.is_empty());
    }

    #[test]
    fn test_recurring_needs_frequency() {
        let (mut session, _) = session();
        let mut a = args("Shopify Inc.");
        a.recurring = true;
        let err = handle_send_command(&mut session, OutputFormat::Text, a).unwrap_err();
        assert_eq!(err.field(), Some("frequency"));
    }
}
