use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use configuration::{ConfigOverrides, load_config};
use market::{Market, RandomShock};
use portfolio::Portfolio;
use std::io;
use std::path::PathBuf;
use tracing::info;

mod logging;
mod render;
mod shell;
mod simulate;

/// The main entry point for the TradeSim application.
fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_overrides(&cli.overrides);
    config.validate()?;

    // Held until exit so the file writer flushes.
    let _log_guard = logging::init(&config.logging)?;

    let market = Market::new(config.seed_quotes()?).context("Failed to build the market")?;
    let mut shocks = match config.market.rng_seed {
        Some(seed) => RandomShock::seeded(seed),
        None => RandomShock::from_entropy(),
    };
    info!(
        symbols = market.len(),
        initial_balance = %config.portfolio.initial_balance,
        seed = ?config.market.rng_seed,
        "Market opened"
    );

    // Execute the appropriate command
    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            let portfolio = Portfolio::new(config.portfolio.initial_balance)
                .context("Failed to open the portfolio")?;
            let mut session = shell::Session::new(market, portfolio, shocks);
            session.run(io::stdin().lock(), io::stdout().lock())?;
        }
        Commands::Simulate(args) => {
            let start = args.from.unwrap_or_else(|| Local::now().date_naive());
            let report = simulate::run_buy_and_hold(
                market,
                &mut shocks,
                config.portfolio.initial_balance,
                start,
                args.days,
            )?;
            simulate::print_report(&mut io::stdout().lock(), &report, args.json)?;
        }
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A console stock-trading simulator.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (defaults to ./config.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: ConfigOverrides,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive trading menu (the default).
    Shell,
    /// Buy an equal-weight basket and let the market drift for a number of days.
    Simulate(SimulateArgs),
}

#[derive(Parser)]
struct SimulateArgs {
    /// Number of simulated days after the opening day.
    #[arg(long, default_value_t = 30)]
    days: u32,

    /// The opening date (format: YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Print the report as JSON instead of tables.
    #[arg(long)]
    json: bool,
}
