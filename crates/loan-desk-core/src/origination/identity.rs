//! Borrower identity: phone/ID normalisation, contact validation and
//! returning-borrower matching.

use serde::{Deserialize, Serialize};

use crate::error::LoanDeskError;
use crate::LoanDeskResult;

const KENYA_DIAL_CODE: &str = "254";
const LOCAL_NUMBER_LEN: usize = 10;

/// A borrower already on file, as returned by the lookup endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowerRecord {
    pub borrower_id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_collateral: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub mpesa_number: String,
    pub full_name: String,
    pub email: String,
}

impl ContactDetails {
    /// Report the first invalid field.
    pub fn validate(&self) -> LoanDeskResult<()> {
        if !is_valid_mpesa_number(&self.mpesa_number) {
            return Err(LoanDeskError::InvalidInput {
                field: "mpesa_number".into(),
                reason: "Enter a Kenyan mobile number such as 0712 345 678.".into(),
            });
        }
        if !is_valid_full_name(&self.full_name) {
            return Err(LoanDeskError::InvalidInput {
                field: "full_name".into(),
                reason: "Enter at least a first and last name.".into(),
            });
        }
        if !is_valid_email(&self.email) {
            return Err(LoanDeskError::InvalidInput {
                field: "email".into(),
                reason: "Enter a valid email address.".into(),
            });
        }
        Ok(())
    }
}

/// Canonical borrower id: digits only, local `0` prefix replaced by `254`.
pub fn normalize_borrower_id(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    match digits.strip_prefix('0') {
        Some(rest) => format!("{KENYA_DIAL_CODE}{rest}"),
        None => digits,
    }
}

/// Shape free-form phone input into a local 10-digit number.
pub fn format_phone_input(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let local = match digits.strip_prefix(KENYA_DIAL_CODE) {
        Some(rest) => format!("0{rest}"),
        None => digits,
    };
    local.chars().take(LOCAL_NUMBER_LEN).collect()
}

/// `07XXXXXXXX`, `01XXXXXXXX`, `2547XXXXXXXX`, `+2541XXXXXXXX` and so on.
pub fn is_valid_mpesa_number(raw: &str) -> bool {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let subscriber = cleaned
        .strip_prefix("+254")
        .or_else(|| cleaned.strip_prefix(KENYA_DIAL_CODE))
        .or_else(|| cleaned.strip_prefix('0'));

    match subscriber {
        Some(rest) => {
            rest.len() == 9
                && (rest.starts_with('7') || rest.starts_with('1'))
                && rest.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

pub fn is_valid_full_name(name: &str) -> bool {
    let trimmed = name.trim();
    trimmed.chars().count() >= 3 && trimmed.split_whitespace().count() >= 2
}

pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Find a borrower on file whose normalised id matches `raw_id`.
pub fn find_returning_borrower<'a>(
    records: &'a [BorrowerRecord],
    raw_id: &str,
) -> Option<&'a BorrowerRecord> {
    let wanted = normalize_borrower_id(raw_id);
    if wanted.is_empty() {
        return None;
    }
    records
        .iter()
        .find(|r| normalize_borrower_id(&r.borrower_id) == wanted)
}
