//! The borrower-facing application wizard as an explicit state machine.
//!
//! `WizardState` is a plain serialisable record. Every change goes through
//! [`transition`], a pure `(state, event) -> state` function that never
//! mutates its input. Step order depends on the loan type (secured loans add
//! a collateral step) and on whether the borrower is already on file
//! (returning borrowers may reuse their documents).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::LoanDeskError;
use crate::format::format_kes;
use crate::policy::OriginationPolicy;
use crate::pricing::collateral::{max_loan, CollateralCategory, CollateralLimit};
use crate::pricing::pricer::{price, LoanTerms};
use crate::types::{LoanType, Money};
use crate::LoanDeskResult;

use super::documents::{missing_documents, replace_documents, DocumentKind, DocumentRef};
use super::identity::{
    format_phone_input, is_valid_mpesa_number, normalize_borrower_id, BorrowerRecord,
    ContactDetails,
};
use super::quote::principal_ceiling;

/// Digits expected in a phone number or national ID at the identity step.
const BORROWER_ID_DIGITS: usize = 10;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Identity,
    Type,
    Collateral,
    Amount,
    /// Returning borrowers choose between reusing documents on file and
    /// uploading new ones.
    DocChoice,
    Documents,
    Mpesa,
    Review,
    Success,
}

impl WizardStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::Identity => "identity",
            WizardStep::Type => "type",
            WizardStep::Collateral => "collateral",
            WizardStep::Amount => "amount",
            WizardStep::DocChoice => "doc_choice",
            WizardStep::Documents => "documents",
            WizardStep::Mpesa => "mpesa",
            WizardStep::Review => "review",
            WizardStep::Success => "success",
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What is known about the borrower after the identity lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowerProfile {
    pub borrower_id: String,
    pub is_repeat: bool,
    pub docs_reused: bool,
    pub collateral_changed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_collateral: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardState {
    pub step: WizardStep,
    pub loan_type: Option<LoanType>,
    pub amount: Money,
    pub term_months: u32,
    pub collateral_category: Option<CollateralCategory>,
    pub asset_value: Money,
    /// `"<category>: <asset value>"`, compared against a returning
    /// borrower's previous collateral.
    pub collateral_description: String,
    pub documents: Vec<DocumentRef>,
    pub contact: ContactDetails,
    pub borrower: Option<BorrowerProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WizardEvent {
    IdentifyBorrower {
        borrower_id: String,
        /// Result of the external borrower lookup, if any.
        #[serde(default)]
        matched: Option<BorrowerRecord>,
    },
    SelectLoanType {
        loan_type: LoanType,
    },
    SetCollateral {
        category: CollateralCategory,
        asset_value: Money,
    },
    SetAmount {
        amount: Money,
    },
    SetTerm {
        term_months: u32,
    },
    AttachDocuments {
        kind: DocumentKind,
        file_names: Vec<String>,
    },
    RemoveDocument {
        file_name: String,
    },
    ChooseDocumentReuse {
        reuse: bool,
    },
    SetContact(ContactDetails),
    Next,
    Back,
    Submit,
    Reset,
}

impl WizardEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WizardEvent::IdentifyBorrower { .. } => "identify_borrower",
            WizardEvent::SelectLoanType { .. } => "select_loan_type",
            WizardEvent::SetCollateral { .. } => "set_collateral",
            WizardEvent::SetAmount { .. } => "set_amount",
            WizardEvent::SetTerm { .. } => "set_term",
            WizardEvent::AttachDocuments { .. } => "attach_documents",
            WizardEvent::RemoveDocument { .. } => "remove_document",
            WizardEvent::ChooseDocumentReuse { .. } => "choose_document_reuse",
            WizardEvent::SetContact(_) => "set_contact",
            WizardEvent::Next => "next",
            WizardEvent::Back => "back",
            WizardEvent::Submit => "submit",
            WizardEvent::Reset => "reset",
        }
    }
}

impl WizardState {
    pub fn new(policy: &OriginationPolicy) -> Self {
        Self {
            step: WizardStep::Identity,
            loan_type: None,
            amount: policy.default_amount,
            term_months: policy.default_term,
            collateral_category: None,
            asset_value: Decimal::ZERO,
            collateral_description: String::new(),
            documents: Vec::new(),
            contact: ContactDetails::default(),
            borrower: None,
        }
    }

    pub fn is_repeat_borrower(&self) -> bool {
        self.borrower.as_ref().is_some_and(|b| b.is_repeat)
    }

    pub fn docs_reused(&self) -> bool {
        self.borrower.as_ref().is_some_and(|b| b.docs_reused)
    }

    /// Steps this borrower will walk through, in order.
    pub fn step_order(&self) -> Vec<WizardStep> {
        let mut steps = vec![WizardStep::Identity, WizardStep::Type];
        if self.loan_type == Some(LoanType::Secured) {
            steps.push(WizardStep::Collateral);
        }
        steps.push(WizardStep::Amount);
        if self.is_repeat_borrower() {
            steps.push(WizardStep::DocChoice);
        }
        steps.extend([
            WizardStep::Documents,
            WizardStep::Mpesa,
            WizardStep::Review,
            WizardStep::Success,
        ]);
        steps
    }

    /// The step shown on the progress bar; the document choice counts as
    /// the documents step.
    pub fn progress_step(&self) -> WizardStep {
        match self.step {
            WizardStep::DocChoice => WizardStep::Documents,
            step => step,
        }
    }

    /// LTV limit for the pledged collateral, once category and value are set.
    pub fn collateral_limit(&self) -> Option<CollateralLimit> {
        if self.loan_type != Some(LoanType::Secured) {
            return None;
        }
        let category = self.collateral_category?;
        if self.asset_value <= Decimal::ZERO {
            return None;
        }
        max_loan(category, self.asset_value).ok()
    }

    pub fn max_principal(&self, policy: &OriginationPolicy) -> Money {
        principal_ceiling(
            self.loan_type.unwrap_or(LoanType::Unsecured),
            self.collateral_limit().as_ref(),
            policy,
        )
    }

    /// Repayment terms for the current amount and term.
    pub fn terms(&self) -> LoanDeskResult<LoanTerms> {
        price(self.amount, self.term_months)
    }

    /// Re-check every gate a submitted application must have passed.
    pub fn validate_for_review(&self, policy: &OriginationPolicy) -> LoanDeskResult<()> {
        let loan_type = self.require_loan_type()?;
        if loan_type == LoanType::Secured {
            self.check_collateral(policy)?;
        }
        self.check_amount(policy)?;
        if !self.docs_reused() {
            self.check_documents(loan_type)?;
        }
        self.contact.validate()
    }

    // -- gates ---------------------------------------------------------------

    fn require_loan_type(&self) -> LoanDeskResult<LoanType> {
        self.loan_type.ok_or_else(|| LoanDeskError::InvalidInput {
            field: "loan_type".into(),
            reason: "Choose a secured or unsecured loan.".into(),
        })
    }

    fn check_identity(&self) -> LoanDeskResult<()> {
        match self.borrower {
            Some(_) => Ok(()),
            None => Err(LoanDeskError::InvalidInput {
                field: "borrower_id".into(),
                reason: "Enter your phone number or national ID to begin.".into(),
            }),
        }
    }

    fn check_collateral(&self, policy: &OriginationPolicy) -> LoanDeskResult<()> {
        let category = self.collateral_category.ok_or_else(|| LoanDeskError::InvalidInput {
            field: "collateral_category".into(),
            reason: "Choose the type of collateral.".into(),
        })?;
        if self.asset_value < policy.min_asset_value {
            return Err(LoanDeskError::InvalidInput {
                field: "asset_value".into(),
                reason: format!(
                    "Asset value must be at least {}.",
                    format_kes(policy.min_asset_value)
                ),
            });
        }
        let limit = max_loan(category, self.asset_value)?;
        if limit.max_principal < policy.min_amount {
            return Err(LoanDeskError::InvalidInput {
                field: "asset_value".into(),
                reason: format!(
                    "This {} supports at most {}, below the minimum loan of {}.",
                    category,
                    format_kes(limit.max_principal),
                    format_kes(policy.min_amount)
                ),
            });
        }
        Ok(())
    }

    fn check_amount(&self, policy: &OriginationPolicy) -> LoanDeskResult<()> {
        let ceiling = self.max_principal(policy);
        if !policy.amount_in_bounds(self.amount, ceiling) {
            return Err(LoanDeskError::InvalidInput {
                field: "amount".into(),
                reason: format!(
                    "Amount must be between {} and {}.",
                    format_kes(policy.min_amount),
                    format_kes(ceiling)
                ),
            });
        }
        if !policy.term_in_bounds(self.term_months) {
            return Err(LoanDeskError::InvalidInput {
                field: "term_months".into(),
                reason: format!(
                    "Term must be between {} and {} months.",
                    policy.min_term, policy.max_term
                ),
            });
        }
        Ok(())
    }

    fn check_documents(&self, loan_type: LoanType) -> LoanDeskResult<()> {
        let missing = missing_documents(loan_type, &self.documents);
        if missing.is_empty() {
            return Ok(());
        }
        let names: Vec<&str> = missing.iter().map(|k| k.as_str()).collect();
        Err(LoanDeskError::InvalidInput {
            field: "documents".into(),
            reason: format!("Missing required documents: {}.", names.join(", ")),
        })
    }

    fn gate(&self, policy: &OriginationPolicy) -> LoanDeskResult<()> {
        match self.step {
            WizardStep::Identity => self.check_identity(),
            WizardStep::Type => self.require_loan_type().map(|_| ()),
            WizardStep::Collateral => self.check_collateral(policy),
            WizardStep::Amount => self.check_amount(policy),
            WizardStep::Documents => self.check_documents(self.require_loan_type()?),
            WizardStep::Mpesa => self.contact.validate(),
            WizardStep::DocChoice | WizardStep::Review | WizardStep::Success => Ok(()),
        }
    }

    fn advance(&mut self) {
        let order = self.step_order();
        if let Some(i) = order.iter().position(|s| *s == self.step) {
            if let Some(next) = order.get(i + 1) {
                self.step = *next;
            }
        }
    }

    fn retreat(&mut self) {
        if self.step == WizardStep::DocChoice {
            self.step = WizardStep::Amount;
            return;
        }
        if self.step == WizardStep::Mpesa && self.docs_reused() {
            self.step = WizardStep::DocChoice;
            return;
        }
        let order = self.step_order();
        if let Some(i) = order.iter().position(|s| *s == self.step) {
            if i > 0 {
                self.step = order[i - 1];
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Apply one event, returning the next state. The input state is untouched.
pub fn transition(
    state: &WizardState,
    event: WizardEvent,
    policy: &OriginationPolicy,
) -> LoanDeskResult<WizardState> {
    let event_name = event.name();
    let mut next = state.clone();

    match (state.step, event) {
        (_, WizardEvent::Reset) => {
            next = WizardState::new(policy);
        }

        (WizardStep::Identity, WizardEvent::IdentifyBorrower { borrower_id, matched }) => {
            identify(&mut next, &borrower_id, matched)?;
            next.step = WizardStep::Type;
        }

        (WizardStep::Type, WizardEvent::SelectLoanType { loan_type }) => {
            next.loan_type = Some(loan_type);
            if loan_type == LoanType::Unsecured {
                next.collateral_category = None;
                next.asset_value = Decimal::ZERO;
                next.collateral_description.clear();
                next.documents
                    .retain(|d| !matches!(d.kind, DocumentKind::Asset | DocumentKind::Photo));
            }
            next.advance();
        }

        (WizardStep::Collateral, WizardEvent::SetCollateral { category, asset_value }) => {
            if asset_value < Decimal::ZERO {
                return Err(LoanDeskError::InvalidAmount {
                    field: "asset_value".into(),
                    reason: format!("Asset value cannot be negative (got {asset_value})."),
                });
            }
            next.collateral_category = Some(category);
            next.asset_value = asset_value;
            next.collateral_description = format!("{category}: {asset_value}");
            if let Some(borrower) = next.borrower.as_mut() {
                if let (true, Some(previous)) = (borrower.is_repeat, &borrower.previous_collateral) {
                    borrower.collateral_changed = *previous != next.collateral_description;
                }
            }
        }

        (WizardStep::Amount, WizardEvent::SetAmount { amount }) => {
            next.amount = amount;
        }

        (WizardStep::Amount, WizardEvent::SetTerm { term_months }) => {
            next.term_months = term_months;
        }

        (WizardStep::Documents, WizardEvent::AttachDocuments { kind, file_names }) => {
            next.documents = replace_documents(&state.documents, kind, &file_names);
        }

        (WizardStep::Documents, WizardEvent::RemoveDocument { file_name }) => {
            next.documents.retain(|d| d.file_name != file_name);
        }

        (WizardStep::DocChoice, WizardEvent::ChooseDocumentReuse { reuse }) => {
            if let Some(borrower) = next.borrower.as_mut() {
                borrower.docs_reused = reuse;
            }
            next.step = if reuse {
                WizardStep::Mpesa
            } else {
                WizardStep::Documents
            };
        }

        (WizardStep::Mpesa, WizardEvent::SetContact(contact)) => {
            next.contact = ContactDetails {
                mpesa_number: format_phone_input(&contact.mpesa_number),
                full_name: contact.full_name,
                email: contact.email.trim().to_string(),
            };
        }

        (step, WizardEvent::Next)
            if !matches!(
                step,
                WizardStep::DocChoice | WizardStep::Review | WizardStep::Success
            ) =>
        {
            state.gate(policy)?;
            next.advance();
        }

        (step, WizardEvent::Back) if step != WizardStep::Success => {
            next.retreat();
        }

        (WizardStep::Review, WizardEvent::Submit) => {
            state.validate_for_review(policy)?;
            next.step = WizardStep::Success;
            info!(
                borrower_id = next.borrower.as_ref().map(|b| b.borrower_id.as_str()).unwrap_or(""),
                amount = %next.amount,
                term_months = next.term_months,
                "Application submitted"
            );
        }

        (step, _) => {
            return Err(LoanDeskError::InvalidTransition {
                step: step.to_string(),
                event: event_name.into(),
            });
        }
    }

    debug!(event = event_name, from = %state.step, to = %next.step, "Wizard transition");
    Ok(next)
}

/// Fold a sequence of events from the initial state.
pub fn replay(
    events: impl IntoIterator<Item = WizardEvent>,
    policy: &OriginationPolicy,
) -> LoanDeskResult<WizardState> {
    events
        .into_iter()
        .try_fold(WizardState::new(policy), |state, event| {
            transition(&state, event, policy)
        })
}

fn identify(
    state: &mut WizardState,
    raw_id: &str,
    matched: Option<BorrowerRecord>,
) -> LoanDeskResult<()> {
    let digits = raw_id.chars().filter(char::is_ascii_digit).count();
    if digits != BORROWER_ID_DIGITS {
        return Err(LoanDeskError::InvalidInput {
            field: "borrower_id".into(),
            reason: format!(
                "Enter a {BORROWER_ID_DIGITS}-digit phone number or national ID (got {digits} digits)."
            ),
        });
    }
    let borrower_id = normalize_borrower_id(raw_id);

    if let Some(record) = &matched {
        if normalize_borrower_id(&record.borrower_id) != borrower_id {
            return Err(LoanDeskError::InvalidInput {
                field: "matched".into(),
                reason: format!(
                    "Lookup returned borrower {} for id {}.",
                    record.borrower_id, borrower_id
                ),
            });
        }
    }

    if state.contact.mpesa_number.is_empty() && is_valid_mpesa_number(raw_id) {
        state.contact.mpesa_number = format_phone_input(raw_id);
    }
    if let Some(record) = &matched {
        if state.contact.full_name.is_empty() {
            state.contact.full_name = record.full_name.clone();
        }
        if state.contact.email.is_empty() {
            state.contact.email = record.email.clone();
        }
    }

    state.borrower = Some(BorrowerProfile {
        borrower_id,
        is_repeat: matched.is_some(),
        docs_reused: false,
        collateral_changed: false,
        previous_collateral: matched.and_then(|r| r.previous_collateral),
    });
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
