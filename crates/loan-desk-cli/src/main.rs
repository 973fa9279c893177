mod commands;
mod input;
mod output;
mod store;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::pricing::{MaxLoanArgs, PriceArgs, QuoteArgs};
use commands::review::{ApplicationsArgs, SetStatusArgs};
use commands::wizard::WizardArgs;

/// Loan pricing, collateral sizing and application review
#[derive(Parser)]
#[command(
    name = "loandesk",
    version,
    about = "Loan pricing, collateral sizing and application review",
    long_about = "Prices flat-rate consumer loans under the duplum cap, sizes secured \
                  loans against collateral by loan-to-value, replays the borrower \
                  application wizard and manages the admin review queue."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log decisions to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a loan: interest, duplum cap, total and monthly installment
    Price(PriceArgs),
    /// Maximum principal against a collateral asset
    MaxLoan(MaxLoanArgs),
    /// Size, price and check a loan request against origination policy
    Quote(QuoteArgs),
    /// Replay application wizard events and show the resulting state
    Wizard(WizardArgs),
    /// List applications latest first, with volume statistics
    Applications(ApplicationsArgs),
    /// Approve, reject or otherwise update one application
    SetStatus(SetStatusArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Price(args) => commands::pricing::run_price(args),
        Commands::MaxLoan(args) => commands::pricing::run_max_loan(args),
        Commands::Quote(args) => commands::pricing::run_quote(args),
        Commands::Wizard(args) => commands::wizard::run_wizard(args),
        Commands::Applications(args) => commands::review::run_applications(args),
        Commands::SetStatus(args) => commands::review::run_set_status(args),
        Commands::Version => {
            println!("loandesk {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
