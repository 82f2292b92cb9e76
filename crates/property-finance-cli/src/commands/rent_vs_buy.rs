use clap::Args;
use serde_json::Value;

use property_finance_core::rent_vs_buy::{self, RentVsBuyInput};

use crate::input;

/// Arguments for the rent-vs-buy comparison
#[derive(Args)]
pub struct RentVsBuyArgs {
    /// Path to a JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_rent_vs_buy(args: RentVsBuyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let compare_input: RentVsBuyInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file> or stdin required for rent-vs-buy comparison".into());
    };
    let result = rent_vs_buy::compare_rent_vs_buy(&compare_input)?;
    Ok(serde_json::to_value(result)?)
}
