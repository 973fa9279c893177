use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_desk_core::origination::quote::{self, CollateralInput, QuoteRequest};
use loan_desk_core::pricing::collateral::{self, CollateralSizingInput};
use loan_desk_core::pricing::pricer::{self, LoanPricingInput};
use loan_desk_core::LoanType;

use crate::input;

/// Arguments for loan pricing
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PriceArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Principal in KES
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Repayment term in months
    #[arg(long, alias = "months")]
    pub term: Option<Decimal>,
}

/// Arguments for collateral sizing
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct MaxLoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Collateral category: vehicle, equipment or land
    #[arg(long)]
    pub category: Option<String>,

    /// Appraised asset value in KES
    #[arg(long)]
    pub asset_value: Option<Decimal>,
}

/// Arguments for a policy-checked quote
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct QuoteArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Origination policy file (JSON or YAML)
    #[arg(long)]
    pub policy: Option<String>,

    /// secured or unsecured
    #[arg(long)]
    pub loan_type: Option<String>,

    /// Principal in KES
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Repayment term in months
    #[arg(long, alias = "months")]
    pub term: Option<u32>,

    /// Collateral category (secured loans)
    #[arg(long)]
    pub category: Option<String>,

    /// Appraised asset value in KES (secured loans)
    #[arg(long)]
    pub asset_value: Option<Decimal>,
}

pub fn run_price(args: PriceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let pricing_input: LoanPricingInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        LoanPricingInput {
            principal: args.principal
                .ok_or("--principal is required (or provide --input)")?,
            term_months: args.term
                .ok_or("--term is required (or provide --input)")?,
        }
    };

    let result = pricer::price_loan(&pricing_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_max_loan(args: MaxLoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sizing_input: CollateralSizingInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        CollateralSizingInput {
            category: args.category
                .ok_or("--category is required (or provide --input)")?,
            asset_value: args.asset_value
                .ok_or("--asset-value is required (or provide --input)")?,
        }
    };

    let result = collateral::size_collateral(&sizing_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_quote(args: QuoteArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let policy = input::file::read_policy(args.policy.as_deref())?;

    let request: QuoteRequest = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let loan_type = match args.loan_type.as_deref().map(str::trim) {
            Some("secured") => LoanType::Secured,
            Some("unsecured") => LoanType::Unsecured,
            Some(other) => {
                return Err(format!("--loan-type must be secured or unsecured (got '{other}')").into())
            }
            None => return Err("--loan-type is required (or provide --input)".into()),
        };
        let collateral = match (args.category, args.asset_value) {
            (Some(category), Some(asset_value)) => Some(CollateralInput {
                category: category.parse()?,
                asset_value,
            }),
            (None, None) => None,
            _ => return Err("--category and --asset-value must be given together".into()),
        };
        QuoteRequest {
            loan_type,
            principal: args.principal
                .ok_or("--principal is required (or provide --input)")?,
            term_months: args.term.unwrap_or(policy.default_term),
            collateral,
        }
    };

    let result = quote::quote_loan(&request, &policy)?;
    Ok(serde_json::to_value(result)?)
}
