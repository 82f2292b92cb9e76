use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use property_finance_core::amortization::{self, AmortizationInput, LoanTerms, ScheduleDetail};

/// Arguments for schedule generation
#[derive(Args)]
pub struct AmortizeArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Decimal,

    /// Annual interest rate in percent (6.5 = 6.5%)
    #[arg(long)]
    pub rate: Decimal,

    /// Loan term in years
    #[arg(long)]
    pub term_years: u32,

    /// How much of the schedule to include in the output
    #[arg(long, default_value = "truncated")]
    pub schedule: ScheduleArg,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ScheduleArg {
    SummaryOnly,
    Truncated,
    Full,
}

impl From<ScheduleArg> for ScheduleDetail {
    fn from(arg: ScheduleArg) -> Self {
        match arg {
            ScheduleArg::SummaryOnly => ScheduleDetail::SummaryOnly,
            ScheduleArg::Truncated => ScheduleDetail::Truncated,
            ScheduleArg::Full => ScheduleDetail::Full,
        }
    }
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = AmortizationInput {
        terms: LoanTerms {
            principal: args.principal,
            annual_rate_percent: args.rate,
            term_years: args.term_years,
        },
        schedule: args.schedule.into(),
    };
    let result = amortization::build_schedule(&input)?;
    Ok(serde_json::to_value(result)?)
}
