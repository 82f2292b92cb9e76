use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PropertyFinanceError;
use crate::types::{round_cents, with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::PropertyFinanceResult;

pub const MIN_TERM_YEARS: u32 = 1;
pub const MAX_TERM_YEARS: u32 = 50;
pub const MAX_ANNUAL_RATE_PERCENT: Decimal = dec!(30);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Terms of a fixed-rate, fully amortizing loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Annual interest rate on the 0-100 scale (6.5 = 6.5%).
    pub annual_rate_percent: Percent,
    pub term_years: u32,
}

impl LoanTerms {
    /// Fraction-scale periodic rate: annual percent / 100 / 12.
    pub fn monthly_rate(&self) -> Rate {
        self.annual_rate_percent / dec!(100) / dec!(12)
    }

    /// Number of monthly payments over the term.
    pub fn periods(&self) -> u32 {
        self.term_years * 12
    }
}

/// How much of the schedule to materialize in the response.
///
/// `Truncated` keeps the first twelve periods plus each anniversary
/// period. This is a display convenience that bounds the response size
/// for long terms, not a correctness boundary: the full schedule is
/// always simulated internally and the summary totals reflect every
/// period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleDetail {
    /// Summary figures only, no rows.
    SummaryOnly,
    /// First year of rows plus one row per anniversary period.
    #[default]
    Truncated,
    /// Every period.
    Full,
}

/// Input for schedule generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    pub terms: LoanTerms,
    #[serde(default)]
    pub schedule: ScheduleDetail,
}

/// One period of an amortization schedule. Currency fields are rounded
/// to the cent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub period: u32,
    pub payment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub remaining_balance: Money,
    pub cumulative_interest: Money,
    pub cumulative_principal: Money,
}

/// Schedule summary plus the requested rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub monthly_payment: Money,
    pub periods: u32,
    pub total_paid: Money,
    pub total_interest: Money,
    pub rows: Vec<AmortizationRow>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject structurally impossible loan terms before any iteration runs.
pub(crate) fn validate_terms(terms: &LoanTerms) -> PropertyFinanceResult<()> {
    if terms.principal < Decimal::ZERO {
        return Err(PropertyFinanceError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be non-negative".into(),
        });
    }
    if terms.annual_rate_percent < Decimal::ZERO
        || terms.annual_rate_percent > MAX_ANNUAL_RATE_PERCENT
    {
        return Err(PropertyFinanceError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: format!(
                "Annual rate must be between 0 and {MAX_ANNUAL_RATE_PERCENT} percent"
            ),
        });
    }
    if terms.term_years < MIN_TERM_YEARS || terms.term_years > MAX_TERM_YEARS {
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
// Payment formula
// ---------------------------------------------------------------------------

/// Compute (1 + rate)^n via iterative multiplication (avoids Decimal::powd drift).
pub fn compound(rate: Rate, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE + rate;
    for _ in 0..n {
        result *= factor;
    }
    result
}

/// Level monthly payment for a fully amortizing loan:
/// P * r(1+r)^n / ((1+r)^n - 1), or P / n when the rate is zero.
///
/// Returns full precision; callers round at their own response boundary.
pub fn monthly_payment(terms: &LoanTerms) -> PropertyFinanceResult<Money> {
    validate_terms(terms)?;

    let n = terms.periods();
    let r = terms.monthly_rate();

    if r.is_zero() {
        // Interest-free: straight-line amortization
        return Ok(terms.principal / Decimal::from(n));
    }

    let factor = compound(r, n);
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(PropertyFinanceError::DivisionByZero {
            context: "amortization payment denominator".into(),
        });
    }

    Ok(terms.principal * r * factor / denominator)
}

// ---------------------------------------------------------------------------
// Schedule generation
// ---------------------------------------------------------------------------

/// Walk the full schedule at full precision and round at row emission.
///
/// Row portions are deltas of the rounded cumulatives, so the emitted
/// portions always sum to the rounded totals and the final balance lands
/// on exactly zero. Returns the selected rows plus the full-precision
/// cumulative interest over all n periods.
pub(crate) fn schedule_rows(
    terms: &LoanTerms,
    payment: Money,
    detail: ScheduleDetail,
) -> (Vec<AmortizationRow>, Money) {
    let n = terms.periods();
    let r = terms.monthly_rate();
    let payment_rounded = round_cents(payment);
    let principal_rounded = round_cents(terms.principal);

    let mut rows = Vec::new();
    let mut balance = terms.principal;
    let mut cum_interest = Decimal::ZERO;
    let mut cum_principal = Decimal::ZERO;
    let mut prev_cum_interest_rounded = Decimal::ZERO;
    let mut prev_cum_principal_rounded = Decimal::ZERO;

    for period in 1..=n {
        let interest = balance * r;
        // The level payment overshoots the residue on the final period;
        // the principal portion absorbs it so the balance lands on zero.
        let principal_portion = if period == n {
            balance
        } else {
            (payment - interest).min(balance)
        };
        balance -= principal_portion;
        cum_interest += interest;
        cum_principal += principal_portion;

        let cum_interest_rounded = round_cents(cum_interest);
        let cum_principal_rounded = round_cents(cum_principal);

        let keep = match detail {
            ScheduleDetail::SummaryOnly => false,
            ScheduleDetail::Full => true,
            ScheduleDetail::Truncated => period <= 12 || period % 12 == 0,
        };
        if keep {
            rows.push(AmortizationRow {
                period,
                payment: payment_rounded,
                principal_portion: cum_principal_rounded - prev_cum_principal_rounded,
                interest_portion: cum_interest_rounded - prev_cum_interest_rounded,
                remaining_balance: (principal_rounded - cum_principal_rounded)
                    .max(Decimal::ZERO),
                cumulative_interest: cum_interest_rounded,
                cumulative_principal: cum_principal_rounded,
            });
        }
        prev_cum_interest_rounded = cum_interest_rounded;
        prev_cum_principal_rounded = cum_principal_rounded;
    }

    (rows, cum_interest)
}

/// Build an amortization schedule for the given loan terms.
pub fn build_schedule(
    input: &AmortizationInput,
) -> PropertyFinanceResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    let payment = monthly_payment(&input.terms)?;
    let (rows, total_interest) = schedule_rows(&input.terms, payment, input.schedule);

    let output = AmortizationOutput {
        monthly_payment: round_cents(payment),
        periods: input.terms.periods(),
        total_paid: round_cents(input.terms.principal + total_interest),
        total_interest: round_cents(total_interest),
        rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Rate Amortization Schedule",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
