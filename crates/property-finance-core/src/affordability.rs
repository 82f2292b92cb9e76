use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{MAX_ANNUAL_RATE_PERCENT, MAX_TERM_YEARS, MIN_TERM_YEARS};
use crate::error::PropertyFinanceError;
use crate::mortgage::monthly_cost_at_price;
use crate::types::{round_cents, with_metadata, ComputationOutput, Money, Percent};
use crate::PropertyFinanceResult;

/// Bracket width at which the price search stops. Home prices are coarse;
/// tighter tolerance is wasted precision.
pub const PRICE_TOLERANCE: Decimal = dec!(100);

const MAX_BISECTION_ITERATIONS: u32 = 64;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for the maximum-price search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    pub annual_income: Money,
    /// Existing monthly debt obligations (car loans, student debt, cards).
    pub monthly_debts: Money,
    pub down_payment: Money,
    /// Annual mortgage rate on the 0-100 scale.
    pub annual_rate_percent: Percent,
    pub term_years: u32,
    /// Annual property tax as a percentage of home price.
    pub property_tax_rate_percent: Percent,
    /// Annual insurance as a percentage of home price.
    pub insurance_rate_percent: Percent,
    /// Maximum share of gross monthly income available for housing plus
    /// existing debts, on the 0-100 scale.
    pub max_dti_percent: Percent,
}

/// Terminal state of the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffordabilityStatus {
    /// The bisection converged on a maximum affordable price.
    Converged,
    /// Existing debts consume the entire DTI allowance. A valid outcome,
    /// not an error; the price fields are zero.
    DebtsExceedDtiCeiling,
}

/// Result of the maximum-price search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityResult {
    pub status: AffordabilityStatus,
    pub max_home_price: Money,
    pub max_loan_amount: Money,
    pub monthly_budget: Money,
    pub estimated_payment: Money,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &AffordabilityInput) -> PropertyFinanceResult<()> {
    for (field, value) in [
        ("annual_income", input.annual_income),
        ("monthly_debts", input.monthly_debts),
        ("down_payment", input.down_payment),
        ("property_tax_rate_percent", input.property_tax_rate_percent),
        ("insurance_rate_percent", input.insurance_rate_percent),
    ] {
        if value < Decimal::ZERO {
            return Err(PropertyFinanceError::InvalidInput {
                field: field.into(),
                reason: "Value must be non-negative".into(),
            });
        }
    }
    if input.max_dti_percent < Decimal::ZERO || input.max_dti_percent > dec!(100) {
        return Err(PropertyFinanceError::InvalidInput {
            field: "max_dti_percent".into(),
            reason: "DTI ratio must be between 0 and 100 percent".into(),
        });
    }
    if input.annual_rate_percent < Decimal::ZERO
        || input.annual_rate_percent > MAX_ANNUAL_RATE_PERCENT
    {
        return Err(PropertyFinanceError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: format!(
                "Annual rate must be between 0 and {MAX_ANNUAL_RATE_PERCENT} percent"
            ),
        });
    }
    if input.term_years < MIN_TERM_YEARS || input.term_years > MAX_TERM_YEARS {
        return Err(PropertyFinanceError::InvalidInput {
            field: "term_years".into(),
            reason: format!(
                "Term must be between {MIN_TERM_YEARS} and {MAX_TERM_YEARS} years"
            ),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

/// Find the maximum home price whose total monthly cost fits the DTI
/// budget, by bisection over candidate prices.
///
/// Total monthly cost is non-decreasing in price, so the bracket narrows
/// monotonically: the lower bound only ever moves to affordable prices
/// and is reported when the bracket closes below [`PRICE_TOLERANCE`].
pub fn solve_affordability(
    input: &AffordabilityInput,
) -> PropertyFinanceResult<ComputationOutput<AffordabilityResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let monthly_income = input.annual_income / dec!(12);
    let monthly_budget =
        monthly_income * input.max_dti_percent / dec!(100) - input.monthly_debts;

    if monthly_budget <= Decimal::ZERO {
        warnings.push(
            "Existing monthly debts consume the entire DTI allowance; no price is affordable"
                .into(),
        );
        let result = AffordabilityResult {
            status: AffordabilityStatus::DebtsExceedDtiCeiling,
            max_home_price: Decimal::ZERO,
            max_loan_amount: Decimal::ZERO,
            monthly_budget: round_cents(monthly_budget),
            estimated_payment: Decimal::ZERO,
        };
        let elapsed = start.elapsed().as_micros() as u64;
        return Ok(with_metadata(
            "Affordability Search (DTI-constrained bisection)",
            input,
            warnings,
            elapsed,
            result,
        ));
    }

    let cost_at = |price: Money| -> PropertyFinanceResult<Money> {
        monthly_cost_at_price(
            price,
            input.down_payment,
            input.annual_rate_percent,
            input.term_years,
            input.property_tax_rate_percent,
            input.insurance_rate_percent,
        )
    };

    // Upper bound: twice the price a full budget could repay interest-free
    // over the term. The true answer is always strictly interior.
    let mut lo = Decimal::ZERO;
    let mut hi = monthly_budget * dec!(12) * Decimal::from(input.term_years) * dec!(2);
    let mut iterations: u32 = 0;

    while hi - lo > PRICE_TOLERANCE {
        if iterations >= MAX_BISECTION_ITERATIONS {
            return Err(PropertyFinanceError::ConvergenceFailure {
                function: "affordability bisection".into(),
                iterations,
                bracket_width: hi - lo,
            });
        }
        iterations += 1;

        let mid = (lo + hi) / dec!(2);
        if cost_at(mid)? <= monthly_budget {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    // Recompute once at the converged price so bracket-boundary rounding
    // never leaks into the reported payment.
    let estimated_payment = cost_at(lo)?;
    let max_loan_amount = (lo - input.down_payment).max(Decimal::ZERO);

    let result = AffordabilityResult {
        status: AffordabilityStatus::Converged,
        max_home_price: round_cents(lo),
        max_loan_amount: round_cents(max_loan_amount),
        monthly_budget: round_cents(monthly_budget),
        estimated_payment: round_cents(estimated_payment),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Affordability Search (DTI-constrained bisection)",
        input,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
