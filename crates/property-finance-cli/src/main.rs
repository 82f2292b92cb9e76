mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::affordability::AffordabilityArgs;
use commands::amortize::AmortizeArgs;
use commands::investment::InvestmentArgs;
use commands::mortgage::MortgageArgs;
use commands::rent_vs_buy::RentVsBuyArgs;

/// Real-estate investment projections
#[derive(Parser)]
#[command(
    name = "pfa",
    version,
    about = "Real-estate investment projections with decimal precision",
    long_about = "A CLI for real-estate financial projections with decimal \
                  precision. Supports amortization schedules, mortgage cost \
                  breakdowns, affordability search, rental investment returns, \
                  and rent-vs-buy comparison."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a fixed-rate amortization schedule
    Amortize(AmortizeArgs),
    /// Full monthly mortgage cost breakdown (P&I + escrow + PMI + HOA)
    Mortgage(MortgageArgs),
    /// Find the maximum affordable home price under a DTI budget
    Affordability(AffordabilityArgs),
    /// Rental investment returns (cash-on-cash, cap rate, ROI)
    Investment(InvestmentArgs),
    /// Compare buying against renting and investing the difference
    RentVsBuy(RentVsBuyArgs),
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

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Amortize(args) => commands::amortize::run_amortize(args),
        Commands::Mortgage(args) => commands::mortgage::run_mortgage(args),
        Commands::Affordability(args) => commands::affordability::run_affordability(args),
        Commands::Investment(args) => commands::investment::run_investment(args),
        Commands::RentVsBuy(args) => commands::rent_vs_buy::run_rent_vs_buy(args),
        Commands::Version => {
            println!("pfa {}", env!("CARGO_PKG_VERSION"));
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
