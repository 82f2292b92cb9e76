use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{
    monthly_payment, LoanTerms, MAX_ANNUAL_RATE_PERCENT, MAX_TERM_YEARS, MIN_TERM_YEARS,
};
use crate::error::PropertyFinanceError;
use crate::types::{round_cents, with_metadata, ComputationOutput, Money, Percent};
use crate::PropertyFinanceResult;

pub const MIN_HORIZON_YEARS: u32 = 1;
pub const MAX_HORIZON_YEARS: u32 = 50;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Ownership-side parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyingParams {
    pub property_price: Money,
    pub down_payment: Money,
    /// Annual mortgage rate on the 0-100 scale.
    pub annual_rate_percent: Percent,
    pub term_years: u32,
    pub annual_property_tax: Money,
    pub annual_insurance: Money,
    pub annual_maintenance: Money,
    pub annual_hoa: Money,
    pub appreciation_rate_percent: Percent,
    /// Marginal income-tax rate applied to the mortgage-interest
    /// deduction, on the 0-100 scale.
    pub tax_bracket_percent: Percent,
}

/// Renting-side parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentingParams {
    pub monthly_rent: Money,
    pub annual_rent_growth_percent: Percent,
    pub annual_renters_insurance: Money,
    /// Assumed annual return on the renter's invested cash differential,
    /// on the 0-100 scale.
    pub investment_return_percent: Percent,
}

/// Input for the rent-vs-buy simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentVsBuyInput {
    pub buying: BuyingParams,
    pub renting: RentingParams,
    pub horizon_years: u32,
}

/// One simulated year, end-of-year values, currency rounded to the cent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyComparison {
    pub year: u32,
    pub buying_annual_cost: Money,
    pub buying_cumulative_cost: Money,
    pub home_equity: Money,
    pub renting_annual_cost: Money,
    pub renting_cumulative_cost: Money,
    pub investment_value: Money,
}

/// Which side ends the horizon with more net worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Buy,
    Rent,
}

/// Horizon-end comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentVsBuySummary {
    pub buying_net_worth: Money,
    pub renting_net_worth: Money,
    pub recommendation: Recommendation,
    pub net_worth_difference: Money,
    /// First year in which buying equity exceeds the renter's investment
    /// value; `None` when it never happens within the horizon.
    pub break_even_year: Option<u32>,
}

/// Year rows plus the final comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentVsBuyOutput {
    pub years: Vec<YearlyComparison>,
    pub summary: RentVsBuySummary,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &RentVsBuyInput) -> PropertyFinanceResult<()> {
    let buying = &input.buying;
    let renting = &input.renting;

    if buying.property_price <= Decimal::ZERO {
        return Err(PropertyFinanceError::InvalidInput {
            field: "buying.property_price".into(),
            reason: "Property price must be positive".into(),
        });
    }
    if buying.down_payment < Decimal::ZERO || buying.down_payment > buying.property_price {
        return Err(PropertyFinanceError::InvalidInput {
            field: "buying.down_payment".into(),
            reason: "Down payment must be between 0 and the property price".into(),
        });
    }
    if buying.annual_rate_percent < Decimal::ZERO
        || buying.annual_rate_percent > MAX_ANNUAL_RATE_PERCENT
    {
        return Err(PropertyFinanceError::InvalidInput {
            field: "buying.annual_rate_percent".into(),
            reason: format!(
                "Annual rate must be between 0 and {MAX_ANNUAL_RATE_PERCENT} percent"
            ),
        });
    }
    if buying.term_years < MIN_TERM_YEARS || buying.term_years > MAX_TERM_YEARS {
        return Err(PropertyFinanceError::InvalidInput {
            field: "buying.term_years".into(),
            reason: format!(
                "Term must be between {MIN_TERM_YEARS} and {MAX_TERM_YEARS} years"
            ),
        });
    }
    for (field, value) in [
        ("buying.annual_property_tax", buying.annual_property_tax),
        ("buying.annual_insurance", buying.annual_insurance),
        ("buying.annual_maintenance", buying.annual_maintenance),
        ("buying.annual_hoa", buying.annual_hoa),
        ("renting.monthly_rent", renting.monthly_rent),
        (
            "renting.annual_renters_insurance",
            renting.annual_renters_insurance,
        ),
    ] {
        if value < Decimal::ZERO {
            return Err(PropertyFinanceError::InvalidInput {
                field: field.into(),
                reason: "Value must be non-negative".into(),
            });
        }
    }
    if buying.tax_bracket_percent < Decimal::ZERO || buying.tax_bracket_percent > dec!(100) {
        return Err(PropertyFinanceError::InvalidInput {
            field: "buying.tax_bracket_percent".into(),
            reason: "Tax bracket must be between 0 and 100 percent".into(),
        });
    }
    for (field, value) in [
        (
            "buying.appreciation_rate_percent",
            buying.appreciation_rate_percent,
        ),
        (
            "renting.annual_rent_growth_percent",
            renting.annual_rent_growth_percent,
        ),
    ] {
        if value <= dec!(-100) {
            return Err(PropertyFinanceError::InvalidInput {
                field: field.into(),
                reason: "Growth rate must exceed -100 percent".into(),
            });
        }
    }
    if renting.investment_return_percent < Decimal::ZERO
        || renting.investment_return_percent > dec!(100)
    {
        return Err(PropertyFinanceError::InvalidInput {
            field: "renting.investment_return_percent".into(),
            reason: "Investment return must be between 0 and 100 percent".into(),
        });
    }
    if input.horizon_years < MIN_HORIZON_YEARS || input.horizon_years > MAX_HORIZON_YEARS {
        return Err(PropertyFinanceError::InvalidInput {
            field: "horizon_years".into(),
            reason: format!(
                "Horizon must be between {MIN_HORIZON_YEARS} and {MAX_HORIZON_YEARS} years"
            ),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------

/// Simulate home-ownership net worth against a renter who invests the
/// cost differential, year by year over the horizon.
///
/// The simulation is inherently sequential: each year's ending loan
/// balance, home value, rent level, and investment balance seed the
/// next year. The renter starts with the buyer's down payment invested.
/// In years where buying costs more, the monthly surplus is contributed
/// to the investment; in years where renting costs more, the balance
/// only compounds. Nothing is ever withdrawn to cover a renting
/// shortfall.
pub fn compare_rent_vs_buy(
    input: &RentVsBuyInput,
) -> PropertyFinanceResult<ComputationOutput<RentVsBuyOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let buying = &input.buying;
    let renting = &input.renting;

    let loan_amount = buying.property_price - buying.down_payment;
    let terms = LoanTerms {
        principal: loan_amount,
        annual_rate_percent: buying.annual_rate_percent,
        term_years: buying.term_years,
    };
    let payment = monthly_payment(&terms)?;
    let monthly_loan_rate = terms.monthly_rate();
    let monthly_invest_rate = renting.investment_return_percent / dec!(100) / dec!(12);
    let appreciation_factor = Decimal::ONE + buying.appreciation_rate_percent / dec!(100);
    let rent_growth_factor =
        Decimal::ONE + renting.annual_rent_growth_percent / dec!(100);

    let fixed_ownership_costs = buying.annual_property_tax
        + buying.annual_insurance
        + buying.annual_maintenance
        + buying.annual_hoa;

    let mut loan_balance = loan_amount;
    let mut home_value = buying.property_price;
    let mut investment_balance = buying.down_payment;
    let mut current_rent = renting.monthly_rent;
    let mut buying_cumulative = Decimal::ZERO;
    let mut renting_cumulative = Decimal::ZERO;
    let mut break_even_year: Option<u32> = None;

    let mut years = Vec::with_capacity(input.horizon_years as usize);

    for year in 1..=input.horizon_years {
        // One year of amortization on the running balance; payments stop
        // once the loan is repaid.
        let mut year_interest = Decimal::ZERO;
        let mut year_mortgage_paid = Decimal::ZERO;
        for _ in 0..12 {
            if loan_balance <= Decimal::ZERO {
                break;
            }
            let interest = loan_balance * monthly_loan_rate;
            let principal = (payment - interest).min(loan_balance);
            loan_balance -= principal;
            year_interest += interest;
            year_mortgage_paid += interest + principal;
        }

        // Interest deduction is applied annually, not monthly.
        let tax_shield = year_interest * buying.tax_bracket_percent / dec!(100);
        let buying_annual_cost = year_mortgage_paid + fixed_ownership_costs - tax_shield;

        home_value *= appreciation_factor;
        let home_equity = home_value - loan_balance;

        let renting_annual_cost = current_rent * dec!(12) + renting.annual_renters_insurance;

        // The renter invests only what buying would have cost on top of
        // renting; a renting shortfall is never funded from the balance.
        let monthly_surplus = (buying_annual_cost - renting_annual_cost) / dec!(12);
        if monthly_surplus > Decimal::ZERO {
            for _ in 0..12 {
                investment_balance =
                    investment_balance * (Decimal::ONE + monthly_invest_rate) + monthly_surplus;
            }
        } else {
            for _ in 0..12 {
                investment_balance *= Decimal::ONE + monthly_invest_rate;
            }
        }

        buying_cumulative += buying_annual_cost;
        renting_cumulative += renting_annual_cost;

        if break_even_year.is_none() && home_equity > investment_balance {
            break_even_year = Some(year);
        }

        years.push(YearlyComparison {
            year,
            buying_annual_cost: round_cents(buying_annual_cost),
            buying_cumulative_cost: round_cents(buying_cumulative),
            home_equity: round_cents(home_equity),
            renting_annual_cost: round_cents(renting_annual_cost),
            renting_cumulative_cost: round_cents(renting_cumulative),
            investment_value: round_cents(investment_balance),
        });

        // Rent escalates for the following year.
        current_rent *= rent_growth_factor;
    }

    let buying_net_worth = home_value - loan_balance;
    let renting_net_worth = investment_balance;
    let recommendation = if buying_net_worth >= renting_net_worth {
        Recommendation::Buy
    } else {
        Recommendation::Rent
    };

    if break_even_year.is_none() {
        warnings.push(
            "Buying equity never overtakes the renter's investment within the horizon".into(),
        );
    }

    let output = RentVsBuyOutput {
        years,
        summary: RentVsBuySummary {
            buying_net_worth: round_cents(buying_net_worth),
            renting_net_worth: round_cents(renting_net_worth),
            recommendation,
            net_worth_difference: round_cents((buying_net_worth - renting_net_worth).abs()),
            break_even_year,
        },
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rent vs Buy Comparison (year-by-year net worth simulation)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
