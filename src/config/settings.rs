//! User settings for PayStreet
//!
//! Pricing inputs for the derivation engine (fees, markup, quote lifetime),
//! the UI tick rate and logging preferences.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::paths::PaystreetPaths;
use crate::error::PaystreetError;
use crate::models::Money;

/// Pricing configuration
///
/// Amounts are in major units of whichever currency they are charged in and
/// are rounded to that currency's scale when applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Lifetime of an unlocked quote, and the window granted by a rate lock
    #[serde(default = "default_quote_ttl")]
    pub quote_ttl_seconds: u32,

    /// Flat surcharge for locking a conversion rate
    #[serde(default = "default_rate_lock_fee")]
    pub rate_lock_fee: Decimal,

    /// Flat fee deducted from converted amounts
    #[serde(default = "default_conversion_fee")]
    pub conversion_fee: Decimal,

    /// Markup disclosed on conversion quotes, in percent
    #[serde(default = "default_markup_percent")]
    pub markup_percent: Decimal,
}

fn default_quote_ttl() -> u32 {
    300
}

fn default_rate_lock_fee() -> Decimal {
    Decimal::new(250, 2)
}

fn default_conversion_fee() -> Decimal {
    Decimal::new(500, 2)
}

fn default_markup_percent() -> Decimal {
    Decimal::new(5, 1)
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            quote_ttl_seconds: default_quote_ttl(),
            rate_lock_fee: default_rate_lock_fee(),
            conversion_fee: default_conversion_fee(),
            markup_percent: default_markup_percent(),
        }
    }
}

impl PricingSettings {
    /// Rate lock surcharge at a currency's scale
    pub fn rate_lock_fee_in(&self, scale: u32) -> Result<Money, PaystreetError> {
        to_money(self.rate_lock_fee, scale, "rate_lock_fee")
    }

    /// Conversion fee at a currency's scale
    pub fn conversion_fee_in(&self, scale: u32) -> Result<Money, PaystreetError> {
        to_money(self.conversion_fee, scale, "conversion_fee")
    }

    /// Check the values make sense
    pub fn validate(&self) -> Result<(), PaystreetError> {
        if self.quote_ttl_seconds == 0 {
            return Err(PaystreetError::Config(
                "pricing.quote_ttl_seconds must be greater than zero".into(),
            ));
        }
        if self.rate_lock_fee.is_sign_negative() || self.conversion_fee.is_sign_negative() {
            return Err(PaystreetError::Config("pricing fees cannot be negative".into()));
        }
        if self.markup_percent.is_sign_negative() || self.markup_percent >= Decimal::ONE_HUNDRED {
            return Err(PaystreetError::Config(
                "pricing.markup_percent must be between 0 and 100".into(),
            ));
        }
        Ok(())
    }
}

fn to_money(value: Decimal, scale: u32, name: &str) -> Result<Money, PaystreetError> {
    Money::from_decimal(value, scale)
        .map_err(|e| PaystreetError::Config(format!("Invalid {}: {}", name, e)))
}

/// User settings for PayStreet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Fee, markup and quote lifetime configuration
    #[serde(default)]
    pub pricing: PricingSettings,

    /// Currency preselected in the send and conversion flows
    #[serde(default = "default_currency")]
    pub default_currency: String,

    /// Interval between timer ticks in interactive mode
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    /// Whether wizard events are appended to the audit log
    #[serde(default = "default_true")]
    pub audit_enabled: bool,

    /// Default tracing filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_tick_interval() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            pricing: PricingSettings::default(),
            default_currency: default_currency(),
            tick_interval_ms: default_tick_interval(),
            audit_enabled: true,
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &PaystreetPaths) -> Result<Self, PaystreetError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                PaystreetError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                PaystreetError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.pricing.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &PaystreetPaths) -> Result<(), PaystreetError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            PaystreetError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            PaystreetError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}
