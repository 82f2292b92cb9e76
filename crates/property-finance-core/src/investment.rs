use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{
    compound, monthly_payment, LoanTerms, MAX_ANNUAL_RATE_PERCENT, MAX_TERM_YEARS, MIN_TERM_YEARS,
};
use crate::error::PropertyFinanceError;
use crate::types::{round_cents, round_percent, with_metadata, ComputationOutput, Money, Percent};
use crate::PropertyFinanceResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Mortgage terms for a financed acquisition. The loan amount is the
/// purchase price net of the down payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancingTerms {
    /// Annual rate on the 0-100 scale.
    pub annual_rate_percent: Percent,
    pub term_years: u32,
}

/// Input parameters for a rental acquisition analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentInput {
    pub purchase_price: Money,
    pub down_payment: Money,
    pub closing_costs: Money,
    pub renovation_costs: Money,
    /// Absent for an all-cash purchase.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financing: Option<FinancingTerms>,
    pub gross_monthly_rent: Money,
    pub vacancy_rate_percent: Percent,
    /// Management fee as a percentage of gross scheduled rent.
    pub management_rate_percent: Percent,
    /// Maintenance reserve as a percentage of gross scheduled rent.
    pub maintenance_rate_percent: Percent,
    pub annual_property_tax: Money,
    pub annual_insurance: Money,
    pub annual_hoa: Money,
    pub appreciation_rate_percent: Percent,
    pub holding_period_years: u32,
}

/// Return metrics for the acquisition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentReturns {
    pub total_cash_invested: Money,
    pub monthly_debt_service: Money,
    pub monthly_cash_flow: Money,
    pub annual_cash_flow: Money,
    /// Net operating income, before debt service by definition.
    pub annual_noi: Money,
    pub cap_rate_percent: Percent,
    pub cash_on_cash_percent: Percent,
    pub total_roi_percent: Percent,
    pub annualized_roi_percent: Percent,
    pub projected_future_value: Money,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &InvestmentInput) -> PropertyFinanceResult<()> {
    if input.purchase_price <= Decimal::ZERO {
        return Err(PropertyFinanceError::InvalidInput {
            field: "purchase_price".into(),
            reason: "Purchase price must be positive".into(),
        });
    }
    if input.down_payment < Decimal::ZERO || input.down_payment > input.purchase_price {
        return Err(PropertyFinanceError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment must be between 0 and the purchase price".into(),
        });
    }
    if input.holding_period_years == 0 {
        return Err(PropertyFinanceError::InvalidInput {
            field: "holding_period_years".into(),
            reason: "Holding period must be at least 1 year".into(),
        });
    }
    for (field, value) in [
        ("closing_costs", input.closing_costs),
        ("renovation_costs", input.renovation_costs),
        ("gross_monthly_rent", input.gross_monthly_rent),
        ("annual_property_tax", input.annual_property_tax),
        ("annual_insurance", input.annual_insurance),
        ("annual_hoa", input.annual_hoa),
    ] {
        if value < Decimal::ZERO {
            return Err(PropertyFinanceError::InvalidInput {
                field: field.into(),
                reason: "Value must be non-negative".into(),
            });
        }
    }
    for (field, value) in [
        ("vacancy_rate_percent", input.vacancy_rate_percent),
        ("management_rate_percent", input.management_rate_percent),
        ("maintenance_rate_percent", input.maintenance_rate_percent),
    ] {
        if value < Decimal::ZERO || value > dec!(100) {
            return Err(PropertyFinanceError::InvalidInput {
                field: field.into(),
                reason: "Rate must be between 0 and 100 percent".into(),
            });
        }
    }
    if input.appreciation_rate_percent <= dec!(-100) {
        return Err(PropertyFinanceError::InvalidInput {
            field: "appreciation_rate_percent".into(),
            reason: "Appreciation rate must exceed -100 percent".into(),
        });
    }
    if let Some(ref financing) = input.financing {
        if financing.annual_rate_percent < Decimal::ZERO
            || financing.annual_rate_percent > MAX_ANNUAL_RATE_PERCENT
        {
            return Err(PropertyFinanceError::InvalidInput {
                field: "financing.annual_rate_percent".into(),
                reason: format!(
                    "Annual rate must be between 0 and {MAX_ANNUAL_RATE_PERCENT} percent"
                ),
            });
        }
        if financing.term_years < MIN_TERM_YEARS || financing.term_years > MAX_TERM_YEARS {
            return Err(PropertyFinanceError::InvalidInput {
                field: "financing.term_years".into(),
                reason: format!(
                    "Term must be between {MIN_TERM_YEARS} and {MAX_TERM_YEARS} years"
                ),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

/// Compute cash-on-cash return, cap rate, and holding-period ROI for a
/// rental acquisition.
pub fn analyze_investment(
    input: &InvestmentInput,
) -> PropertyFinanceResult<ComputationOutput<InvestmentReturns>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let total_cash_invested =
        input.down_payment + input.closing_costs + input.renovation_costs;

    // Debt service is zero for an all-cash purchase or a loan amount
    // that nets out to nothing.
    let loan_amount = input.purchase_price - input.down_payment;
    let monthly_debt_service = match input.financing {
        Some(ref financing) if loan_amount > Decimal::ZERO => monthly_payment(&LoanTerms {
            principal: loan_amount,
            annual_rate_percent: financing.annual_rate_percent,
            term_years: financing.term_years,
        })?,
        _ => Decimal::ZERO,
    };

    // Management and maintenance are percentages of gross scheduled
    // rent, not the vacancy-adjusted figure.
    let effective_rent =
        input.gross_monthly_rent * (Decimal::ONE - input.vacancy_rate_percent / dec!(100));
    let management = input.gross_monthly_rent * input.management_rate_percent / dec!(100);
    let maintenance = input.gross_monthly_rent * input.maintenance_rate_percent / dec!(100);
    let fixed_monthly =
        (input.annual_property_tax + input.annual_insurance + input.annual_hoa) / dec!(12);

    let monthly_noi = effective_rent - management - maintenance - fixed_monthly;
    let annual_noi = monthly_noi * dec!(12);

    let monthly_cash_flow = monthly_noi - monthly_debt_service;
    let annual_cash_flow = monthly_cash_flow * dec!(12);
    if annual_cash_flow < Decimal::ZERO {
        warnings.push("Annual cash flow is negative; the property does not carry itself".into());
    }

    // Cap rate is financing-independent by definition.
    let cap_rate = annual_noi / input.purchase_price * dec!(100);

    let cash_on_cash = if total_cash_invested.is_zero() {
        warnings.push("No cash invested; cash-on-cash and ROI reported as zero".into());
        Decimal::ZERO
    } else {
        annual_cash_flow / total_cash_invested * dec!(100)
    };

    let holding = input.holding_period_years;
    let future_value = input.purchase_price
        * compound(input.appreciation_rate_percent / dec!(100), holding);

    // Total return over the hold: appreciation gain plus cumulative
    // after-debt-service cash flow.
    let (total_roi, annualized_roi) = if total_cash_invested.is_zero() {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        let total_profit =
            future_value - input.purchase_price + annual_cash_flow * Decimal::from(holding);
        let total_roi = total_profit / total_cash_invested * dec!(100);
        let growth_base = Decimal::ONE + total_roi / dec!(100);
        let annualized = if growth_base > Decimal::ZERO {
            (growth_base.powd(Decimal::ONE / Decimal::from(holding)) - Decimal::ONE) * dec!(100)
        } else {
            warnings.push(
                "Total losses exceed invested capital; annualized ROI floored at -100%".into(),
            );
            dec!(-100)
        };
        (total_roi, annualized)
    };

    let output = InvestmentReturns {
        total_cash_invested: round_cents(total_cash_invested),
        monthly_debt_service: round_cents(monthly_debt_service),
        monthly_cash_flow: round_cents(monthly_cash_flow),
        annual_cash_flow: round_cents(annual_cash_flow),
        annual_noi: round_cents(annual_noi),
        cap_rate_percent: round_percent(cap_rate),
        cash_on_cash_percent: round_percent(cash_on_cash),
        total_roi_percent: round_percent(total_roi),
        annualized_roi_percent: round_percent(annualized_roi),
        projected_future_value: round_cents(future_value),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rental Investment Returns (cash-on-cash, cap rate, holding-period ROI)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// Financed duplex: $250k price, 20% down, modest cash flow
    fn sample_input() -> InvestmentInput {
        InvestmentInput {
            purchase_price: dec!(250000),
            down_payment: dec!(50000),
            closing_costs: dec!(5000),
            renovation_costs: dec!(10000),
            financing: Some(FinancingTerms {
                annual_rate_percent: dec!(6.5),
                term_years: 30,
            }),
            gross_monthly_rent: dec!(2200),
            vacancy_rate_percent: dec!(5),
            management_rate_percent: dec!(8),
            maintenance_rate_percent: dec!(5),
            annual_property_tax: dec!(3000),
            annual_insurance: dec!(1200),
            annual_hoa: Decimal::ZERO,
            appreciation_rate_percent: dec!(3),
            holding_period_years: 5,
        }
    }

    #[test]
    fn test_noi_and_cap_rate() {
        let out = analyze_investment(&sample_input()).unwrap().result;

        // Effective rent 2090, mgmt 176, maint 110, fixed 350:
        // monthly NOI 1454, annual 17448, cap 17448/250000 = 6.98%
        assert_eq!(out.annual_noi, dec!(17448));
        assert_eq!(out.cap_rate_percent, dec!(6.98));
    }

    #[test]
    fn test_cap_rate_is_financing_independent() {
        let financed = analyze_investment(&sample_input()).unwrap().result;

        let mut cash = sample_input();
        cash.financing = None;
        let unfinanced = analyze_investment(&cash).unwrap().result;

        let mut repriced = sample_input();
        repriced.financing = Some(FinancingTerms {
            annual_rate_percent: dec!(9),
            term_years: 15,
        });
        repriced.down_payment = dec!(25000);
        let releveraged = analyze_investment(&repriced).unwrap().result;

        assert_eq!(financed.cap_rate_percent, unfinanced.cap_rate_percent);
        assert_eq!(financed.cap_rate_percent, releveraged.cap_rate_percent);
    }

    #[test]
    fn test_cash_on_cash_with_financing() {
        let out = analyze_investment(&sample_input()).unwrap().result;

        // $200k at 6.5%/30yr services at ~$1,264/mo
        assert!(
            out.monthly_debt_service > dec!(1260) && out.monthly_debt_service < dec!(1270),
            "debt service {} outside expected band",
            out.monthly_debt_service
        );
        assert_eq!(out.total_cash_invested, dec!(65000));
        // ~$190/mo of cash flow on $65k invested: ~3.5% cash-on-cash
        assert!(
            out.cash_on_cash_percent > dec!(3.4) && out.cash_on_cash_percent < dec!(3.6),
            "cash-on-cash {} outside expected band",
            out.cash_on_cash_percent
        );
    }

    #[test]
    fn test_cash_purchase_has_no_debt_service() {
        let mut input = sample_input();
        input.financing = None;
        input.down_payment = dec!(250000);
        let out = analyze_investment(&input).unwrap().result;

        assert_eq!(out.monthly_debt_service, Decimal::ZERO);
        assert_eq!(out.total_cash_invested, dec!(265000));
        assert_eq!(out.annual_cash_flow, out.annual_noi);
        // Cash-on-cash collapses to NOI over invested cash
        assert_eq!(
            out.cash_on_cash_percent,
            round_percent(dec!(17448) / dec!(265000) * dec!(100))
        );
    }

    #[test]
    fn test_financing_ignored_when_loan_nets_to_zero() {
        let mut input = sample_input();
        input.down_payment = dec!(250000);
        // Financing present but nothing left to borrow
        let out = analyze_investment(&input).unwrap().result;
        assert_eq!(out.monthly_debt_service, Decimal::ZERO);
    }

    #[test]
    fn test_zero_cash_invested_guards_division() {
        let mut input = sample_input();
        input.down_payment = Decimal::ZERO;
        input.closing_costs = Decimal::ZERO;
        input.renovation_costs = Decimal::ZERO;

        let result = analyze_investment(&input).unwrap();
        let out = &result.result;
        assert_eq!(out.cash_on_cash_percent, Decimal::ZERO);
        assert_eq!(out.total_roi_percent, Decimal::ZERO);
        assert_eq!(out.annualized_roi_percent, Decimal::ZERO);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("No cash invested")));
    }

    #[test]
    fn test_management_and_maintenance_use_gross_rent() {
        // Characterized behavior: with 50% vacancy the expense base is
        // still the full $2,000 of scheduled rent.
        let input = InvestmentInput {
            purchase_price: dec!(200000),
            down_payment: dec!(200000),
            closing_costs: Decimal::ZERO,
            renovation_costs: Decimal::ZERO,
            financing: None,
            gross_monthly_rent: dec!(2000),
            vacancy_rate_percent: dec!(50),
            management_rate_percent: dec!(10),
            maintenance_rate_percent: Decimal::ZERO,
            annual_property_tax: Decimal::ZERO,
            annual_insurance: Decimal::ZERO,
            annual_hoa: Decimal::ZERO,
            appreciation_rate_percent: Decimal::ZERO,
            holding_period_years: 1,
        };
        let out = analyze_investment(&input).unwrap().result;

        // Effective rent 1000 minus management 200 (10% of gross, not
        // 100 on the effective figure): monthly NOI 800
        assert_eq!(out.annual_noi, dec!(9600));
    }

    #[test]
    fn test_future_value_compounds_annually() {
        let out = analyze_investment(&sample_input()).unwrap().result;
        // 250000 * 1.03^5 = 289,818.518575 -> 289,818.52
        assert_eq!(out.projected_future_value, dec!(289818.52));
    }

    #[test]
    fn test_holding_period_roi_bands() {
        let out = analyze_investment(&sample_input()).unwrap().result;
        // ~39.8k appreciation + ~11.4k cumulative cash flow on 65k
        assert!(
            out.total_roi_percent > dec!(77) && out.total_roi_percent < dec!(80),
            "total ROI {} outside expected band",
            out.total_roi_percent
        );
        // Geometric annualization of ~78.8% over 5 years: ~12.3%/yr
        assert!(
            out.annualized_roi_percent > dec!(12) && out.annualized_roi_percent < dec!(12.7),
            "annualized ROI {} outside expected band",
            out.annualized_roi_percent
        );
    }

    #[test]
    fn test_zero_holding_period_rejected() {
        let mut input = sample_input();
        input.holding_period_years = 0;
        match analyze_investment(&input) {
            Err(PropertyFinanceError::InvalidInput { field, .. }) => {
                assert_eq!(field, "holding_period_years");
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_cash_flow_is_reported_not_rejected() {
        let mut input = sample_input();
        input.gross_monthly_rent = dec!(1200);
        let result = analyze_investment(&input).unwrap();
        assert!(result.result.annual_cash_flow < Decimal::ZERO);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("negative")));
    }
}
