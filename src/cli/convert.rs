//! Currency conversion CLI command

use clap::Args;

use crate::error::PaystreetResult;
use crate::session::FlowSession;
use crate::wizard::FlowKind;

use super::{render_snapshot, run_to_completion, OutputFormat};

/// Arguments for a one-shot conversion
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Amount in the source currency
    #[arg(short, long)]
    pub amount: String,
    /// Source currency
    #[arg(short, long, default_value = "USD")]
    pub from: String,
    /// Target currency
    #[arg(short, long, default_value = "EUR")]
    pub to: String,
    /// Lock the quoted rate before converting (adds the lock fee)
    #[arg(short, long)]
    pub lock: bool,
}

/// Handle the convert command
pub fn handle_convert_command(
    session: &mut FlowSession,
    format: OutputFormat,
    args: ConvertArgs,
) -> PaystreetResult<()> {
    session.start(FlowKind::Conversion)?;
    session.set_field("from", &args.from)?;
    session.set_field("to", &args.to)?;
    session.set_field("amount", &args.amount)?;

    // quote → review issues the quote
    session.advance()?;
    if args.lock {
        session.lock_rate()?;
    }

    let snapshot = run_to_completion(session)?;
    print!("{}", render_snapshot(&snapshot, format)?);
    if format == OutputFormat::Text {
        println!("Conversion complete.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{StaticCatalog, StaticRates};
    use std::sync::Arc;

    fn session() -> FlowSession {
        FlowSession::new(Arc::new(StaticCatalog::new()), Arc::new(StaticRates::new()))
    }

    fn args(amount: &str, lock: bool) -> ConvertArgs {
        ConvertArgs {
            amount: amount.to_string(),
            from: "USD".into(),
            to: "EUR".into(),
            lock,
        }
    }

    #[test]
    fn test_convert() {
        let mut session = session();
        handle_convert_command(&mut session, OutputFormat::Json, args("1000", false)).unwrap();

        let snapshot = session.snapshot().unwrap();
        assert!(snapshot.is_complete);
        assert_eq!(snapshot.derived.converted_amount.minor(), 84_500);
        assert!(snapshot.reference_id.unwrap().starts_with("CNV"));
    }

    #[test]
    fn test_convert_with_lock_adds_fee() {
        let mut session = session();
        handle_convert_command(&mut session, OutputFormat::Json, args("1000", true)).unwrap();

        let snapshot = session.snapshot().unwrap();
        assert_eq!(snapshot.derived.fee.minor(), 750);
        assert_eq!(snapshot.derived.converted_amount.minor(), 84_250);
    }

    #[test]
    fn test_same_currency_rejected() {
        let mut session = session();
        let mut a = args("10", false);
        a.to = "USD".into();
        let err = handle_convert_command(&mut session, OutputFormat::Text, a).unwrap_err();
        assert!(err.is_validation());
    }
}
