use clap::Args;
use serde_json::Value;

use property_finance_core::affordability::{self, AffordabilityInput};

use crate::input;

/// Arguments for the affordability search
#[derive(Args)]
pub struct AffordabilityArgs {
    /// Path to a JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_affordability(args: AffordabilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let afford_input: AffordabilityInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file> or stdin required for affordability search".into());
    };
    let result = affordability::solve_affordability(&afford_input)?;
    Ok(serde_json::to_value(result)?)
}
