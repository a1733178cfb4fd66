//! Reference data CLI commands

use clap::Subcommand;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalog::{ReferenceData, StaticCatalog, StaticRates};
use crate::display::{format_currencies, format_payment_methods, format_rates};
use crate::error::PaystreetResult;

use super::OutputFormat;

/// Catalog subcommands
#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    /// List payment methods with their fees
    Methods,
    /// List wallet currencies and balances
    Currencies,
    /// List exchange rates against the base currency
    Rates,
}

#[derive(Serialize)]
struct RateListing<'a> {
    base: &'a str,
    rates: Vec<(String, Decimal)>,
}

/// Handle a catalog command
pub fn handle_catalog_command(
    catalog: &StaticCatalog,
    rates: &StaticRates,
    format: OutputFormat,
    cmd: CatalogCommands,
) -> PaystreetResult<()> {
    let output = match cmd {
        CatalogCommands::Methods => {
            let methods = catalog.list_payment_methods();
            format
                .serialize(&methods)?
                .unwrap_or_else(|| format_payment_methods(&methods))
        }
        CatalogCommands::Currencies => {
            let currencies = catalog.list_currencies();
            format
                .serialize(&currencies)?
                .unwrap_or_else(|| format_currencies(&currencies))
        }
        CatalogCommands::Rates => {
            let listing = RateListing {
                base: rates.base(),
                rates: rates.quoted(),
            };
            format
                .serialize(&listing)?
                .unwrap_or_else(|| format_rates(listing.base, &listing.rates))
        }
    };

    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}
