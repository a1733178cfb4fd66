//! Configuration module for PayStreet
//!
//! This module provides configuration management including:
//! - Platform path resolution
//! - User settings persistence
//! - Pricing inputs for the wizards

pub mod paths;
pub mod settings;

pub use paths::PaystreetPaths;
pub use settings::{PricingSettings, Settings};
