use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use paystreet_cli::audit::AuditLogger;
use paystreet_cli::catalog::{StaticCatalog, StaticRates};
use paystreet_cli::cli::{
    handle_audit_command, handle_beneficiary_command, handle_catalog_command,
    handle_convert_command, handle_send_command, OutputFormat,
};
use paystreet_cli::config::{paths::PaystreetPaths, settings::Settings};
use paystreet_cli::session::FlowSession;
use paystreet_cli::wizard::{EventSink, FlowKind, NullSink};
use paystreet_cli::{logging, PaystreetError};

#[derive(Parser)]
#[command(
    name = "paystreet",
    version,
    about = "Send money, onboard beneficiaries and convert currencies from the terminal",
    long_about = "PayStreet walks you through multi-step payment wizards: sending money \
                  to a beneficiary, adding a new beneficiary, and converting between \
                  wallet currencies with a time-limited rate quote."
)]
struct Cli {
    /// Output format for command results
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive TUI
    #[command(alias = "ui")]
    Tui {
        /// Open a flow straight away (send, convert, beneficiary)
        flow: Option<String>,
    },

    /// Send money in one step
    Send(paystreet_cli::cli::SendArgs),

    /// Convert between wallet currencies
    Convert(paystreet_cli::cli::ConvertArgs),

    /// Beneficiary management commands
    #[command(subcommand)]
    Beneficiary(paystreet_cli::cli::BeneficiaryCommands),

    /// Reference data: payment methods, currencies, rates
    #[command(subcommand)]
    Catalog(paystreet_cli::cli::CatalogCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
        /// Only show one flow (send, convert, beneficiary)
        #[arg(short, long)]
        flow: Option<String>,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = PaystreetPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let interactive = matches!(cli.command, Some(Commands::Tui { .. }));
    if interactive {
        paths.ensure_directories()?;
        logging::init(&settings.log_level, Some(&paths.log_file()))?;
    } else {
        logging::init(&settings.log_level, None)?;
    }
    debug!(base_dir = %paths.base_dir().display(), "paths resolved");

    let audit = AuditLogger::new(paths.audit_log());
    let events: Arc<dyn EventSink> = if settings.audit_enabled {
        paths.ensure_directories()?;
        Arc::new(AuditLogger::new(paths.audit_log()))
    } else {
        Arc::new(NullSink)
    };

    let catalog = Arc::new(StaticCatalog::new());
    let rates = Arc::new(StaticRates::new());
    let mut session = FlowSession::new(catalog.clone(), rates.clone())
        .with_pricing(settings.pricing.clone())
        .with_events(events);

    match cli.command {
        Some(Commands::Tui { flow }) => {
            let start = flow
                .map(|f| {
                    FlowKind::parse(&f).ok_or_else(|| {
                        PaystreetError::validation(
                            "flow",
                            format!("Unknown flow '{}'. Use send, convert or beneficiary", f),
                        )
                    })
                })
                .transpose()?;
            paystreet_cli::tui::run_tui(session, &settings, start)?;
        }
        Some(Commands::Send(args)) => {
            handle_send_command(&mut session, cli.format, args)?;
        }
        Some(Commands::Convert(args)) => {
            handle_convert_command(&mut session, cli.format, args)?;
        }
        Some(Commands::Beneficiary(cmd)) => {
            handle_beneficiary_command(&mut session, cli.format, cmd)?;
        }
        Some(Commands::Catalog(cmd)) => {
            handle_catalog_command(&catalog, &rates, cli.format, cmd)?;
        }
        Some(Commands::Audit { count, flow }) => {
            handle_audit_command(&audit, cli.format, count, flow.as_deref())?;
        }
        Some(Commands::Config) => {
            println!("PayStreet Configuration");
            println!("=======================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Default currency:  {}", settings.default_currency);
            println!("  Quote TTL:         {}s", settings.pricing.quote_ttl_seconds);
            println!("  Rate lock fee:     {}", settings.pricing.rate_lock_fee);
            println!("  Conversion fee:    {}", settings.pricing.conversion_fee);
            println!("  Markup:            {}%", settings.pricing.markup_percent);
            println!("  Audit enabled:     {}", settings.audit_enabled);
            println!("  Log level:         {}", settings.log_level);
        }
        None => {
            println!("PayStreet - payment wizards for the terminal");
            println!();
            println!("Run 'paystreet --help' for usage information.");
            println!("Run 'paystreet tui' to launch the interactive interface.");
        }
    }

    Ok(())
}
