use clap::Args;
use serde_json::Value;

use property_finance_core::investment::{self, InvestmentInput};

use crate::input;

/// Arguments for the rental investment analysis
#[derive(Args)]
pub struct InvestmentArgs {
    /// Path to a JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_investment(args: InvestmentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let invest_input: InvestmentInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file> or stdin required for investment analysis".into());
    };
    let result = investment::analyze_investment(&invest_input)?;
    Ok(serde_json::to_value(result)?)
}
