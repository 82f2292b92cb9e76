use property_finance_core::rent_vs_buy::{
    compare_rent_vs_buy, BuyingParams, Recommendation, RentVsBuyInput, RentingParams,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn scenario(horizon_years: u32) -> RentVsBuyInput {
    RentVsBuyInput {
        buying: BuyingParams {
            property_price: dec!(350000),
            down_payment: dec!(70000),
            annual_rate_percent: dec!(6.5),
            term_years: 30,
            annual_property_tax: dec!(4200),
            annual_insurance: dec!(1400),
            annual_maintenance: dec!(3500),
            annual_hoa: Decimal::ZERO,
            appreciation_rate_percent: dec!(3),
            tax_bracket_percent: dec!(22),
        },
        renting: RentingParams {
            monthly_rent: dec!(1800),
            annual_rent_growth_percent: dec!(3),
            annual_renters_insurance: dec!(240),
            investment_return_percent: dec!(7),
        },
        horizon_years,
    }
}

// ===========================================================================
// Horizon extension is purely additive
// ===========================================================================

#[test]
fn test_every_horizon_is_a_prefix_of_the_longer_run() {
    let full = compare_rent_vs_buy(&scenario(12)).unwrap().result;

    for horizon in 1..=12u32 {
        let partial = compare_rent_vs_buy(&scenario(horizon)).unwrap().result;
        assert_eq!(
            partial.years[..],
            full.years[..horizon as usize],
            "horizon {horizon} perturbed earlier rows"
        );
    }
}

// ===========================================================================
// Recommendation follows the larger net worth
// ===========================================================================

#[test]
fn test_strong_appreciation_recommends_buying() {
    let mut input = scenario(10);
    input.buying.appreciation_rate_percent = dec!(6);
    input.renting.investment_return_percent = dec!(2);

    let out = compare_rent_vs_buy(&input).unwrap().result;
    assert_eq!(out.summary.recommendation, Recommendation::Buy);
    assert!(out.summary.buying_net_worth > out.summary.renting_net_worth);
    assert_eq!(out.summary.break_even_year, Some(1));
}

#[test]
fn test_flat_market_with_rich_portfolio_recommends_renting() {
    // Thin equity build-up against a strong portfolio: tiny down
    // payment, no appreciation, expensive ownership, cheap rent.
    let input = RentVsBuyInput {
        buying: BuyingParams {
            property_price: dec!(500000),
            down_payment: dec!(5000),
            annual_rate_percent: dec!(8),
            term_years: 30,
            annual_property_tax: dec!(10000),
            annual_insurance: dec!(3000),
            annual_maintenance: dec!(6000),
            annual_hoa: dec!(4800),
            appreciation_rate_percent: Decimal::ZERO,
            tax_bracket_percent: Decimal::ZERO,
        },
        renting: RentingParams {
            monthly_rent: dec!(1200),
            annual_rent_growth_percent: Decimal::ZERO,
            annual_renters_insurance: dec!(240),
            investment_return_percent: dec!(10),
        },
        horizon_years: 8,
    };

    let out = compare_rent_vs_buy(&input).unwrap().result;
    assert_eq!(out.summary.recommendation, Recommendation::Rent);
    assert_eq!(out.summary.break_even_year, None);
}

#[test]
fn test_net_worth_gap_is_consistent() {
    let out = compare_rent_vs_buy(&scenario(10)).unwrap().result;
    let gap = (out.summary.buying_net_worth - out.summary.renting_net_worth).abs();
    assert!((gap - out.summary.net_worth_difference).abs() <= dec!(0.01));
}

// ===========================================================================
// State carried between years
// ===========================================================================

#[test]
fn test_equity_growth_reflects_amortization_and_appreciation() {
    let out = compare_rent_vs_buy(&scenario(10)).unwrap().result;

    // Equity starts above the down payment (year-1 principal plus
    // appreciation) and grows every year of this scenario
    assert!(out.years[0].home_equity > dec!(70000));
    for pair in out.years.windows(2) {
        assert!(pair[1].home_equity > pair[0].home_equity);
    }
}

#[test]
fn test_rent_escalation_compounds_cumulative_cost() {
    let out = compare_rent_vs_buy(&scenario(3)).unwrap().result;

    // Year 1: 1800 * 12 + 240 = 21840; rent then grows 3% per year
    assert_eq!(out.years[0].renting_annual_cost, dec!(21840));
    assert_eq!(out.years[1].renting_annual_cost, dec!(22488));
    assert!(out.years[2].renting_annual_cost > out.years[1].renting_annual_cost);
}

// ===========================================================================
// Serialization boundary
// ===========================================================================

#[test]
fn test_absent_break_even_serializes_as_null() {
    let mut input = scenario(2);
    input.buying.down_payment = dec!(5000);
    input.buying.appreciation_rate_percent = Decimal::ZERO;
    input.renting.investment_return_percent = dec!(10);
    input.renting.monthly_rent = dec!(500);

    let result = compare_rent_vs_buy(&input).unwrap();
    assert_eq!(result.result.summary.break_even_year, None);

    let value = serde_json::to_value(&result).unwrap();
    assert!(value["result"]["summary"]["break_even_year"].is_null());
    assert_eq!(
        value["result"]["years"].as_array().unwrap().len(),
        2
    );
}
