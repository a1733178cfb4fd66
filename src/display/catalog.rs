//! Reference data display formatting
//!
//! Beneficiaries are laid out by hand like the rest of the command output;
//! the fixed-shape lists (payment methods, currencies, rates) go through
//! `tabled`.

use rust_decimal::Decimal;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Beneficiary, Currency, PaymentMethod, FEE_SCALE};

/// Format beneficiaries as a table
pub fn format_beneficiary_list(beneficiaries: &[Beneficiary]) -> String {
    if beneficiaries.is_empty() {
        return "No beneficiaries found.".to_string();
    }

    let name_width = beneficiaries
        .iter()
        .map(|b| b.legal_name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let bank_width = beneficiaries
        .iter()
        .map(|b| b.bank_name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<name_width$}  {:<bank_width$}  {:<8}  {:<3}  {:<8}  {}\n",
        "ID",
        "Name",
        "Bank",
        "Account",
        "Cur",
        "Status",
        "",
        name_width = name_width,
        bank_width = bank_width,
    ));

    output.push_str(&format!(
        "{:-<12}  {:-<name_width$}  {:-<bank_width$}  {:-<8}  {:-<3}  {:-<8}  {:-<3}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
        bank_width = bank_width,
    ));

    for b in beneficiaries {
        let mut marks = String::new();
        if b.is_favorite {
            marks.push('*');
        }
        if b.is_default {
            marks.push_str(" (default)");
        }

        output.push_str(&format!(
            "{:<12}  {:<name_width$}  {:<bank_width$}  {:<8}  {:<3}  {:<8}  {}\n",
            b.id.short(),
            b.legal_name,
            b.bank_name,
            b.masked_account(),
            b.currency,
            b.status,
            marks.trim(),
            name_width = name_width,
            bank_width = bank_width,
        ));
    }

    output.push_str(&format!("\n{} beneficiaries\n", beneficiaries.len()));
    output
}

/// Format a single beneficiary's details
pub fn format_beneficiary_details(b: &Beneficiary) -> String {
    let mut output = String::new();
    output.push_str(&format!("Beneficiary: {}\n", b.legal_name));
    output.push_str(&format!("  ID:       {}\n", b.id));
    output.push_str(&format!("  Country:  {}\n", b.country));
    output.push_str(&format!("  Bank:     {}\n", b.bank_name));
    output.push_str(&format!("  Account:  {}\n", b.masked_account()));

    if let Some(swift) = &b.swift_code {
        output.push_str(&format!("  SWIFT:    {}\n", swift));
    }
    if let Some(routing) = &b.routing_number {
        output.push_str(&format!("  Routing:  {}\n", routing));
    }
    if let Some(address) = &b.address {
        output.push_str(&format!("  Address:  {}\n", address));
    }

    output.push_str(&format!("  Currency: {}\n", b.currency));
    output.push_str(&format!("  Status:   {}\n", b.status));

    if b.is_favorite {
        output.push_str("  Favorite: Yes\n");
    }
    if b.is_default {
        output.push_str("  Default:  Yes\n");
    }

    output
}

#[derive(Tabled)]
struct MethodRow {
    #[tabled(rename = "ID")]
    id: &'static str,
    #[tabled(rename = "Method")]
    name: String,
    #[tabled(rename = "Fee")]
    fee: String,
    #[tabled(rename = "Arrival")]
    arrival: String,
}

/// Format payment methods as a table
pub fn format_payment_methods(methods: &[PaymentMethod]) -> String {
    if methods.is_empty() {
        return "No payment methods found.".to_string();
    }

    let rows = methods.iter().map(|m| MethodRow {
        id: m.kind.id(),
        name: m.name.clone(),
        fee: m.fee.format(FEE_SCALE),
        arrival: m.arrival.clone(),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

#[derive(Tabled)]
struct CurrencyRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Decimals")]
    minor_units: u32,
    #[tabled(rename = "Balance")]
    balance: String,
}

/// Format wallet currencies and balances as a table
pub fn format_currencies(currencies: &[Currency]) -> String {
    if currencies.is_empty() {
        return "No currencies found.".to_string();
    }

    let rows = currencies.iter().map(|c| CurrencyRow {
        code: c.code.clone(),
        name: c.name.clone(),
        minor_units: c.minor_units,
        balance: c.balance.format(c.minor_units),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

#[derive(Tabled)]
struct RateRow {
    #[tabled(rename = "Pair")]
    pair: String,
    #[tabled(rename = "Rate")]
    rate: String,
}

/// Format base-relative rates as a table
pub fn format_rates(base: &str, rates: &[(String, Decimal)]) -> String {
    if rates.is_empty() {
        return "No rates found.".to_string();
    }

    let rows = rates.iter().map(|(code, rate)| RateRow {
        pair: format!("{}/{}", base, code),
        rate: rate.to_string(),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}
