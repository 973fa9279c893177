use napi::Result as NapiResult;
use napi_derive::napi;
use serde_json::json;

use loan_desk_core::admin::application::{self, ApplicationRecord};
use loan_desk_core::origination::quote::{self, QuoteRequest};
use loan_desk_core::origination::submission;
use loan_desk_core::origination::wizard::{self, WizardEvent, WizardState};
use loan_desk_core::policy::OriginationPolicy;
use loan_desk_core::pricing::collateral::{self, CollateralSizingInput};
use loan_desk_core::pricing::pricer::{self, LoanPricingInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse an optional policy document; defaults when absent or empty.
fn parse_policy(policy_json: Option<String>) -> NapiResult<OriginationPolicy> {
    let policy = match policy_json.as_deref().map(str::trim) {
        None | Some("") => OriginationPolicy::default(),
        Some(raw) => serde_json::from_str(raw).map_err(to_napi_error)?,
    };
    policy.validate().map_err(to_napi_error)?;
    Ok(policy)
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

#[napi]
pub fn price_loan(input_json: String) -> NapiResult<String> {
    let input: LoanPricingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = pricer::price_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn max_loan(input_json: String) -> NapiResult<String> {
    let input: CollateralSizingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = collateral::size_collateral(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Origination
// ---------------------------------------------------------------------------

#[napi]
pub fn quote_loan(input_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let policy = parse_policy(policy_json)?;
    let request: QuoteRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = quote::quote_loan(&request, &policy).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Fresh wizard state for the given policy.
#[napi]
pub fn wizard_initial_state(policy_json: Option<String>) -> NapiResult<String> {
    let policy = parse_policy(policy_json)?;
    serde_json::to_string(&WizardState::new(&policy)).map_err(to_napi_error)
}

/// Apply one event to a serialized state and return the next state.
#[napi]
pub fn wizard_transition(
    state_json: String,
    event_json: String,
    policy_json: Option<String>,
) -> NapiResult<String> {
    let policy = parse_policy(policy_json)?;
    let state: WizardState = serde_json::from_str(&state_json).map_err(to_napi_error)?;
    let event: WizardEvent = serde_json::from_str(&event_json).map_err(to_napi_error)?;
    let next = wizard::transition(&state, event, &policy).map_err(to_napi_error)?;
    serde_json::to_string(&next).map_err(to_napi_error)
}

#[napi]
pub fn build_submission(state_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let policy = parse_policy(policy_json)?;
    let state: WizardState = serde_json::from_str(&state_json).map_err(to_napi_error)?;
    let payload = submission::build_submission(&state, &policy).map_err(to_napi_error)?;
    serde_json::to_string(&payload).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// Review queue (latest first) and volume statistics for a set of records.
#[napi]
pub fn summarize_applications(records_json: String) -> NapiResult<String> {
    let records: Vec<ApplicationRecord> =
        serde_json::from_str(&records_json).map_err(to_napi_error)?;
    let output = json!({
        "stats": application::summarize(&records),
        "applications": application::review_queue(&records),
    });
    serde_json::to_string(&output).map_err(to_napi_error)
}
