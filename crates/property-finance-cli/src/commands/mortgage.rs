use clap::Args;
use serde_json::Value;

use property_finance_core::mortgage::{self, MortgageInput};

use crate::input;

/// Arguments for the mortgage cost breakdown
#[derive(Args)]
pub struct MortgageArgs {
    /// Path to a JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_mortgage(args: MortgageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mortgage_input: MortgageInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file> or stdin required for mortgage breakdown".into());
    };
    let result = mortgage::plan_mortgage(&mortgage_input)?;
    Ok(serde_json::to_value(result)?)
}
