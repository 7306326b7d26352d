mod commands;
mod input;
mod logging;
mod output;
mod settings;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process;

use commands::portfolio::PortfolioArgs;
use commands::scenario::{CompareArgs, ScenarioArgs};
use commands::validate::{CheckSymbolArgs, CheckTypeArgs, ValidateArgs};

/// Portfolio risk profiling, diversification and scenario analysis
#[derive(Parser)]
#[command(
    name = "prisk",
    version,
    about = "Portfolio risk profiling, diversification and scenario analysis",
    long_about = "A CLI for validating portfolio holdings and scoring them with decimal \
                  precision. Supports concentration, volatility and credit risk profiles, \
                  diversification analysis, and hypothetical economic scenarios."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Path to a TOML settings file (PRISK__* environment variables override it)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level filter, e.g. "debug" or "portfolio_risk_core=trace". RUST_LOG wins.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a holdings file and report errors and warnings
    Validate(ValidateArgs),
    /// Compute the risk profile (concentration, volatility, credit)
    Profile(PortfolioArgs),
    /// Score diversification across asset types, sectors and regions
    Diversification(PortfolioArgs),
    /// Validate, profile, score diversification and break down allocations
    Analyze(PortfolioArgs),
    /// Project one scenario onto the portfolio
    Scenario(ScenarioArgs),
    /// Run several scenarios and rank them worst first
    Compare(CompareArgs),
    /// List the built-in scenarios
    Scenarios,
    /// Check a ticker symbol's format
    CheckSymbol(CheckSymbolArgs),
    /// Check an asset type token against the supported set
    CheckType(CheckTypeArgs),
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

fn main() {
    let cli = Cli::parse();

    let settings = match settings::load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| settings.logging.level.clone());
    logging::setup_logging(&level, cli.json_logs || settings.logging.json);
    tracing::debug!(config = ?cli.config, "settings loaded");

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Validate(args) => commands::validate::run_validate(args, &settings),
        Commands::Profile(args) => commands::portfolio::run_profile(args, &settings),
        Commands::Diversification(args) => {
            commands::portfolio::run_diversification(args, &settings)
        }
        Commands::Analyze(args) => commands::portfolio::run_analyze(args, &settings),
        Commands::Scenario(args) => commands::scenario::run_scenario(args, &settings),
        Commands::Compare(args) => commands::scenario::run_compare(args, &settings),
        Commands::Scenarios => commands::scenario::run_list_scenarios(),
        Commands::CheckSymbol(args) => commands::validate::run_check_symbol(args),
        Commands::CheckType(args) => commands::validate::run_check_type(args),
        Commands::Version => {
            println!("prisk {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
