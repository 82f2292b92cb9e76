use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

/// Flat input shape for the web layer: loan terms plus an optional
/// schedule detail selector.
#[derive(serde::Deserialize)]
struct AmortizationBindingInput {
    #[serde(flatten)]
    terms: property_finance_core::amortization::LoanTerms,
    #[serde(default)]
    schedule: property_finance_core::amortization::ScheduleDetail,
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let binding_input: AmortizationBindingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let input = property_finance_core::amortization::AmortizationInput {
        terms: binding_input.terms,
        schedule: binding_input.schedule,
    };
    let output = property_finance_core::amortization::build_schedule(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Quote just the level monthly payment for a set of loan terms.
#[napi]
pub fn monthly_payment(input_json: String) -> NapiResult<String> {
    let terms: property_finance_core::amortization::LoanTerms =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let payment: rust_decimal::Decimal =
        property_finance_core::amortization::monthly_payment(&terms).map_err(to_napi_error)?;
    Ok(property_finance_core::round_cents(payment).to_string())
}

// ---------------------------------------------------------------------------
// Mortgage planning
// ---------------------------------------------------------------------------

#[napi]
pub fn plan_mortgage(input_json: String) -> NapiResult<String> {
    let input: property_finance_core::mortgage::MortgageInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        property_finance_core::mortgage::plan_mortgage(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn solve_affordability(input_json: String) -> NapiResult<String> {
    let input: property_finance_core::affordability::AffordabilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = property_finance_core::affordability::solve_affordability(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Investment analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_investment(input_json: String) -> NapiResult<String> {
    let input: property_finance_core::investment::InvestmentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = property_finance_core::investment::analyze_investment(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_rent_vs_buy(input_json: String) -> NapiResult<String> {
    let input: property_finance_core::rent_vs_buy::RentVsBuyInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = property_finance_core::rent_vs_buy::compare_rent_vs_buy(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
