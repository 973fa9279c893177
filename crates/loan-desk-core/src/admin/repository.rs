//! Storage seam for the review sheet.
//!
//! The dashboard only ever needs two calls: fetch every application and
//! patch one row's status and notes. Anything that can do both (the
//! spreadsheet script, a JSON file, memory) can back the dashboard.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::LoanDeskError;
use crate::origination::submission::ApplicationSubmission;
use crate::LoanDeskResult;

use super::application::{ApplicationPatch, ApplicationRecord, ApplicationStatus, DocumentInfo};

/// Row 1 of the sheet holds headers.
pub const FIRST_DATA_ROW: u32 = 2;

pub trait ApplicationRepository {
    fn fetch_applications(&self) -> LoanDeskResult<Vec<ApplicationRecord>>;

    fn update_application(
        &mut self,
        row_index: u32,
        patch: &ApplicationPatch,
    ) -> LoanDeskResult<ApplicationRecord>;
}

/// Vec-backed repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryApplicationRepository {
    records: Vec<ApplicationRecord>,
}

impl InMemoryApplicationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ApplicationRecord>) -> Self {
        Self { records }
    }

    pub fn into_records(self) -> Vec<ApplicationRecord> {
        self.records
    }

    fn next_row(&self) -> LoanDeskResult<u32> {
        match self.records.iter().map(|r| r.row_index).max() {
            None => Ok(FIRST_DATA_ROW),
            Some(last) => last
                .checked_add(1)
                .map(|row| row.max(FIRST_DATA_ROW))
                .ok_or_else(|| {
                    LoanDeskError::Repository(format!("No row left after row {last}"))
                }),
        }
    }

    /// Append a submitted application as a new pending row.
    pub fn submit(
        &mut self,
        submission: &ApplicationSubmission,
        submitted_at: DateTime<Utc>,
    ) -> LoanDeskResult<ApplicationRecord> {
        let record = ApplicationRecord {
            row_index: self.next_row()?,
            full_name: submission.full_name.clone(),
            email: submission.email.clone(),
            loan_type: submission.loan_type,
            amount: submission.loan_amount,
            term_months: submission.loan_term,
            mpesa_number: submission.mpesa_number.clone(),
            collateral_type: submission.collateral_type,
            asset_value: submission.asset_value,
            status: ApplicationStatus::PendingReview,
            notes: String::new(),
            submitted_at,
            documents: submission
                .documents
                .iter()
                .map(|name| DocumentInfo {
                    file_name: name.clone(),
                    file_url: None,
                })
                .collect(),
        };
        info!(row = record.row_index, amount = %record.amount, "Recorded application");
        self.records.push(record.clone());
        Ok(record)
    }
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn fetch_applications(&self) -> LoanDeskResult<Vec<ApplicationRecord>> {
        Ok(self.records.clone())
    }

    fn update_application(
        &mut self,
        row_index: u32,
        patch: &ApplicationPatch,
    ) -> LoanDeskResult<ApplicationRecord> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.row_index == row_index)
            .ok_or(LoanDeskError::ApplicationNotFound(row_index))?;
        record.status = patch.status;
        record.notes = patch.notes.clone();
        Ok(record.clone())
    }
}
