use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{monthly_payment, schedule_rows, AmortizationRow, LoanTerms, ScheduleDetail};
use crate::error::PropertyFinanceError;
use crate::types::{round_cents, round_percent, with_metadata, ComputationOutput, Money, Percent};
use crate::PropertyFinanceResult;

/// Below this down-payment share of the price, lenders require PMI.
pub const PMI_THRESHOLD_PERCENT: Decimal = dec!(20);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for a full monthly cost breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageInput {
    pub property_price: Money,
    pub down_payment: Money,
    /// Annual interest rate on the 0-100 scale.
    pub annual_rate_percent: Percent,
    pub term_years: u32,
    /// Annual property tax, escrowed in equal monthly installments.
    pub annual_property_tax: Money,
    /// Annual homeowner insurance premium, escrowed monthly.
    pub annual_home_insurance: Money,
    /// Monthly PMI premium quoted by the lender. Ignored when the down
    /// payment reaches 20% of the price.
    pub monthly_pmi: Money,
    pub monthly_hoa: Money,
    #[serde(default)]
    pub schedule: ScheduleDetail,
}

/// Lifetime cost figures for the loan term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermTotals {
    pub total_of_payments: Money,
    pub total_interest: Money,
}

/// Full monthly and lifetime cost breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageBreakdown {
    pub loan_amount: Money,
    pub down_payment_percent: Percent,
    pub principal_and_interest: Money,
    pub escrow_tax: Money,
    pub escrow_insurance: Money,
    pub pmi: Money,
    pub hoa: Money,
    pub total_monthly: Money,
    pub totals_over_term: TermTotals,
    pub schedule: Vec<AmortizationRow>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &MortgageInput) -> PropertyFinanceResult<()> {
    if input.property_price <= Decimal::ZERO {
        return Err(PropertyFinanceError::InvalidInput {
            field: "property_price".into(),
            reason: "Property price must be positive".into(),
        });
    }
    if input.down_payment < Decimal::ZERO {
        return Err(PropertyFinanceError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment must be non-negative".into(),
        });
    }
    if input.down_payment >= input.property_price {
        return Err(PropertyFinanceError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment must leave a positive loan amount".into(),
        });
    }
    for (field, value) in [
        ("annual_property_tax", input.annual_property_tax),
        ("annual_home_insurance", input.annual_home_insurance),
        ("monthly_pmi", input.monthly_pmi),
        ("monthly_hoa", input.monthly_hoa),
    ] {
        if value < Decimal::ZERO {
            return Err(PropertyFinanceError::InvalidInput {
                field: field.into(),
                reason: "Escrow and fee amounts must be non-negative".into(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Planner
// ---------------------------------------------------------------------------

/// Compose principal-and-interest with escrow items into a full monthly
/// and lifetime cost breakdown.
pub fn plan_mortgage(
    input: &MortgageInput,
) -> PropertyFinanceResult<ComputationOutput<MortgageBreakdown>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let loan_amount = input.property_price - input.down_payment;
    let terms = LoanTerms {
        principal: loan_amount,
        annual_rate_percent: input.annual_rate_percent,
        term_years: input.term_years,
    };
    let pi = monthly_payment(&terms)?;

    let down_payment_percent = input.down_payment / input.property_price * dec!(100);

    // The threshold decision uses the caller's actual equity, not the
    // possibly stale premium a client carried over from a prior quote.
    let pmi = if down_payment_percent < PMI_THRESHOLD_PERCENT {
        input.monthly_pmi
    } else {
        if input.monthly_pmi > Decimal::ZERO {
            warnings.push(
                "Down payment is 20% or more of price; supplied PMI premium ignored".into(),
            );
        }
        Decimal::ZERO
    };

    let escrow_tax = input.annual_property_tax / dec!(12);
    let escrow_insurance = input.annual_home_insurance / dec!(12);
    let total_monthly = pi + escrow_tax + escrow_insurance + pmi + input.monthly_hoa;

    // Lifetime totals derive from the closed-form payment rather than a
    // schedule sum, keeping them consistent with the payment formula.
    let n = Decimal::from(terms.periods());
    let totals_over_term = TermTotals {
        total_of_payments: round_cents(total_monthly * n),
        total_interest: round_cents(pi * n - loan_amount),
    };

    let (schedule, _) = schedule_rows(&terms, pi, input.schedule);

    let output = MortgageBreakdown {
        loan_amount: round_cents(loan_amount),
        down_payment_percent: round_percent(down_payment_percent),
        principal_and_interest: round_cents(pi),
        escrow_tax: round_cents(escrow_tax),
        escrow_insurance: round_cents(escrow_insurance),
        pmi: round_cents(pmi),
        hoa: round_cents(input.monthly_hoa),
        total_monthly: round_cents(total_monthly),
        totals_over_term,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Mortgage Cost Breakdown (P&I + escrow)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Total monthly housing cost at a candidate price, with tax and
/// insurance given as annual percentages of that price.
///
/// This is the planner's cost model as a pure function of price; the
/// affordability search inverts it. A price at or below the down payment
/// is a free-and-clear purchase with no P&I component. Returns full
/// precision.
pub fn monthly_cost_at_price(
    price: Money,
    down_payment: Money,
    annual_rate_percent: Percent,
    term_years: u32,
    property_tax_rate_percent: Percent,
    insurance_rate_percent: Percent,
) -> PropertyFinanceResult<Money> {
    if price < Decimal::ZERO {
        return Err(PropertyFinanceError::InvalidInput {
            field: "price".into(),
            reason: "Candidate price must be non-negative".into(),
        });
    }

    let loan_amount = price - down_payment;
    let pi = if loan_amount > Decimal::ZERO {
        monthly_payment(&LoanTerms {
            principal: loan_amount,
            annual_rate_percent,
            term_years,
        })?
    } else {
        Decimal::ZERO
    };

    let escrow =
        price * (property_tax_rate_percent + insurance_rate_percent) / dec!(100) / dec!(12);
    Ok(pi + escrow)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// 10% down on a $400k purchase, PMI applies
    fn sample_input() -> MortgageInput {
        MortgageInput {
            property_price: dec!(400000),
            down_payment: dec!(40000),
            annual_rate_percent: dec!(6.5),
            term_years: 30,
            annual_property_tax: dec!(4800),
            annual_home_insurance: dec!(1800),
            monthly_pmi: dec!(180),
            monthly_hoa: dec!(75),
            schedule: ScheduleDetail::SummaryOnly,
        }
    }

    #[test]
    fn test_breakdown_composition() {
        let out = plan_mortgage(&sample_input()).unwrap().result;

        assert_eq!(out.loan_amount, dec!(360000));
        assert_eq!(out.down_payment_percent, dec!(10));
        assert_eq!(out.escrow_tax, dec!(400));
        assert_eq!(out.escrow_insurance, dec!(150));
        assert_eq!(out.pmi, dec!(180));
        assert_eq!(out.hoa, dec!(75));

        // $360k at 6.5% over 30 years: P&I in the $2,250-$2,300 band
        assert!(
            out.principal_and_interest > dec!(2250) && out.principal_and_interest < dec!(2300),
            "P&I {} outside expected band",
            out.principal_and_interest
        );
        assert_eq!(
            out.total_monthly,
            out.principal_and_interest + dec!(400) + dec!(150) + dec!(180) + dec!(75)
        );
    }

    #[test]
    fn test_pmi_threshold_boundaries() {
        // 19.99% down: PMI stays
        let mut input = sample_input();
        input.property_price = dec!(100000);
        input.down_payment = dec!(19990);
        input.monthly_pmi = dec!(120);
        let out = plan_mortgage(&input).unwrap().result;
        assert_eq!(out.pmi, dec!(120));

        // Exactly 20.00%: PMI forced to zero
        input.down_payment = dec!(20000);
        let result = plan_mortgage(&input).unwrap();
        assert_eq!(result.result.pmi, Decimal::ZERO);
        assert!(result.warnings.iter().any(|w| w.contains("PMI")));

        // 20.01%: PMI forced to zero
        input.down_payment = dec!(20010);
        let out = plan_mortgage(&input).unwrap().result;
        assert_eq!(out.pmi, Decimal::ZERO);
        assert_eq!(
            out.total_monthly,
            out.principal_and_interest + out.escrow_tax + out.escrow_insurance + out.hoa
        );
    }

    #[test]
    fn test_term_totals_use_closed_form() {
        let input = sample_input();
        let out = plan_mortgage(&input).unwrap().result;

        let terms = LoanTerms {
            principal: dec!(360000),
            annual_rate_percent: dec!(6.5),
            term_years: 30,
        };
        let pi = monthly_payment(&terms).unwrap();
        assert_eq!(
            out.totals_over_term.total_interest,
            round_cents(pi * dec!(360) - dec!(360000))
        );
        assert_eq!(
            out.totals_over_term.total_of_payments,
            round_cents((pi + dec!(400) + dec!(150) + dec!(180) + dec!(75)) * dec!(360))
        );
    }

    #[test]
    fn test_schedule_detail_is_honored() {
        let mut input = sample_input();
        input.schedule = ScheduleDetail::Truncated;
        let out = plan_mortgage(&input).unwrap().result;
        // 12 first-year rows plus anniversaries 24..=360
        assert_eq!(out.schedule.len(), 41);
        assert_eq!(out.schedule.last().unwrap().remaining_balance, Decimal::ZERO);

        input.schedule = ScheduleDetail::SummaryOnly;
        let out = plan_mortgage(&input).unwrap().result;
        assert!(out.schedule.is_empty());
    }

    #[test]
    fn test_loan_must_be_positive() {
        let mut input = sample_input();
        input.down_payment = dec!(400000);
        assert!(plan_mortgage(&input).is_err());

        input.down_payment = dec!(450000);
        match plan_mortgage(&input) {
            Err(PropertyFinanceError::InvalidInput { field, .. }) => {
                assert_eq!(field, "down_payment");
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_escrow_rejected() {
        let mut input = sample_input();
        input.annual_property_tax = dec!(-1);
        assert!(plan_mortgage(&input).is_err());
    }

    #[test]
    fn test_monthly_cost_at_price_free_and_clear() {
        // Candidate price below the down payment: escrow only
        let cost =
            monthly_cost_at_price(dec!(30000), dec!(40000), dec!(6), 30, dec!(1.2), dec!(0.5))
                .unwrap();
        // 30000 * 1.7% / 12 = 42.50
        assert_eq!(cost, dec!(42.50));
    }

    #[test]
    fn test_monthly_cost_at_price_is_nondecreasing() {
        let cost = |price| {
            monthly_cost_at_price(price, dec!(40000), dec!(6), 30, dec!(1.2), dec!(0.5)).unwrap()
        };
        let mut prev = cost(dec!(0));
        for price in [dec!(40000), dec!(100000), dec!(250000), dec!(500000)] {
            let c = cost(price);
            assert!(c >= prev, "cost model decreased at price {price}");
            prev = c;
        }
    }
}
