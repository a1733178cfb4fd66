//! Beneficiary CLI commands
//!
//! Lists saved beneficiaries and runs the onboarding wizard for new ones.

use clap::Subcommand;

use crate::display::{format_beneficiary_details, format_beneficiary_list};
use crate::error::{PaystreetError, PaystreetResult};
use crate::session::FlowSession;
use crate::wizard::FlowKind;

use super::{run_to_completion, set_optional, OutputFormat};

/// Beneficiary subcommands
#[derive(Subcommand, Debug)]
pub enum BeneficiaryCommands {
    /// List saved beneficiaries
    List {
        /// Filter by name, bank or country
        #[arg(short, long, default_value = "")]
        search: String,
        /// Only show favorites
        #[arg(short, long)]
        favorites: bool,
    },
    /// Add a new beneficiary
    Add {
        /// Registered legal name
        #[arg(short = 'n', long)]
        legal_name: String,
        /// Bank country (us, uk, de, jp, in)
        #[arg(short = 'c', long)]
        country: String,
        /// Bank name
        #[arg(short, long)]
        bank: String,
        /// Account number or IBAN
        #[arg(short, long)]
        account: String,
        /// SWIFT/BIC code
        #[arg(long)]
        swift: Option<String>,
        /// ABA routing number (required for US banks)
        #[arg(long)]
        routing: Option<String>,
        /// Street address
        #[arg(long)]
        address: Option<String>,
        /// Payout currency, defaults to the country's currency
        #[arg(long)]
        currency: Option<String>,
        /// Mark as favorite
        #[arg(long)]
        favorite: bool,
        /// Make this the default beneficiary
        #[arg(long)]
        default: bool,
    },
}

/// Handle a beneficiary command
pub fn handle_beneficiary_command(
    session: &mut FlowSession,
    format: OutputFormat,
    cmd: BeneficiaryCommands,
) -> PaystreetResult<()> {
    match cmd {
        BeneficiaryCommands::List { search, favorites } => {
            let list = session.catalog().search_beneficiaries(&search, favorites)?;
            match format.serialize(&list)? {
                Some(out) => print!("{}", out),
                None => println!("{}", format_beneficiary_list(&list)),
            }
        }
        BeneficiaryCommands::Add {
            legal_name,
            country,
            bank,
            account,
            swift,
            routing,
            address,
            currency,
            favorite,
            default,
        } => {
            session.start(FlowKind::Beneficiary)?;
            session.set_field("legal_name", &legal_name)?;
            session.set_field("country", &country)?;
            set_optional(session, "address", address.as_deref())?;
            session.set_field("bank_name", &bank)?;
            session.set_field("account_number", &account)?;
            set_optional(session, "swift_code", swift.as_deref())?;
            set_optional(session, "routing_number", routing.as_deref())?;
            set_optional(session, "currency", currency.as_deref())?;
            if favorite {
                session.set_field("favorite", "yes")?;
            }
            if default {
                session.set_field("default", "yes")?;
            }

            let snapshot = run_to_completion(session)?;
            let beneficiary = session.last_registered().cloned().ok_or_else(|| {
                PaystreetError::Catalog("Beneficiary was not registered".into())
            })?;

            match format.serialize(&beneficiary)? {
                Some(out) => print!("{}", out),
                None => {
                    println!("Added beneficiary: {}", beneficiary.legal_name);
                    if let Some(reference) = &snapshot.reference_id {
                        println!("  Reference: {}", reference);
                    }
                    print!("{}", format_beneficiary_details(&beneficiary));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ReferenceData, StaticCatalog, StaticRates};
    use crate::models::BeneficiaryStatus;
    use std::sync::Arc;

    fn session() -> FlowSession {
        FlowSession::new(Arc::new(StaticCatalog::new()), Arc::new(StaticRates::new()))
    }

    fn add(name: &str, country: &str, routing: Option<&str>) -> BeneficiaryCommands {
        BeneficiaryCommands::Add {
            legal_name: name.to_string(),
            country: country.to_string(),
            bank: "Barclays".into(),
            account: "GB29NWBK60161331926819".into(),
            swift: Some("barcgb22".into()),
            routing: routing.map(String::from),
            address: None,
            currency: None,
            favorite: true,
            default: false,
        }
    }

    #[test]
    fn test_add_registers_pending_beneficiary() {
        let mut session = session();
        handle_beneficiary_command(&mut session, OutputFormat::Json, add("Acme Ltd", "uk", None))
            .unwrap();

        let added = session.catalog().find_beneficiary_by_ref("Acme Ltd").unwrap();
        assert_eq!(added.status, BeneficiaryStatus::Pending);
        assert_eq!(added.currency, "GBP");
        assert_eq!(added.swift_code.as_deref(), Some("BARCGB22"));
        assert!(added.is_favorite);
        assert_eq!(session.snapshot().unwrap().current_step, "manage");
    }

    #[test]
    fn test_add_us_without_routing_fails() {
        let mut session = session();
        let err = handle_beneficiary_command(&mut session, OutputFormat::Text, add("Acme Inc", "us", None))
            .unwrap_err();

        assert_eq!(err.field(), Some("routing_number"));
        assert_eq!(session.catalog().list_beneficiaries().unwrap().len(), 3);
    }

    #[test]
    fn test_add_duplicate_fails() {
        let mut session = session();
        handle_beneficiary_command(&mut session, OutputFormat::Json, add("Acme Ltd", "uk", None))
            .unwrap();
        let err = handle_beneficiary_command(&mut session, OutputFormat::Json, add("Acme Ltd", "uk", None))
            .unwrap_err();

        assert!(matches!(err, PaystreetError::Duplicate { .. }));
        assert_eq!(session.catalog().list_beneficiaries().unwrap().len(), 4);
    }
}
