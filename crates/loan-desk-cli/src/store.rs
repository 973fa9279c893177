use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use loan_desk_core::admin::application::{ApplicationPatch, ApplicationRecord};
use loan_desk_core::admin::repository::{ApplicationRepository, InMemoryApplicationRepository};
use loan_desk_core::origination::submission::ApplicationSubmission;
use loan_desk_core::{LoanDeskError, LoanDeskResult};

/// Application sheet exported as a JSON array of records. Updates are
/// written back to the same file.
pub struct JsonFileRepository {
    path: PathBuf,
    inner: InMemoryApplicationRepository,
}

impl JsonFileRepository {
    pub fn open(path: &str) -> LoanDeskResult<Self> {
        let path = PathBuf::from(path);
        let contents = fs::read_to_string(&path).map_err(|e| {
            LoanDeskError::Repository(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let records: Vec<ApplicationRecord> = serde_json::from_str(&contents)?;
        Ok(Self {
            path,
            inner: InMemoryApplicationRepository::with_records(records),
        })
    }

    /// Append a new pending row and write the sheet back.
    pub fn submit(
        &mut self,
        submission: &ApplicationSubmission,
        submitted_at: DateTime<Utc>,
    ) -> LoanDeskResult<ApplicationRecord> {
        let mut staged = self.inner.clone();
        let record = staged.submit(submission, submitted_at)?;
        self.commit(staged)?;
        Ok(record)
    }

    /// Write the staged sheet to disk, then adopt it. A failed write leaves
    /// the in-memory sheet matching the file.
    fn commit(&mut self, staged: InMemoryApplicationRepository) -> LoanDeskResult<()> {
        let records = staged.fetch_applications()?;
        let json = serde_json::to_string_pretty(&records)?;
        fs::write(&self.path, json).map_err(|e| {
            LoanDeskError::Repository(format!("Failed to write '{}': {}", self.path.display(), e))
        })?;
        self.inner = staged;
        Ok(())
    }
}

impl ApplicationRepository for JsonFileRepository {
    fn fetch_applications(&self) -> LoanDeskResult<Vec<ApplicationRecord>> {
        self.inner.fetch_applications()
    }

    fn update_application(
        &mut self,
        row_index: u32,
        patch: &ApplicationPatch,
    ) -> LoanDeskResult<ApplicationRecord> {
        let mut staged = self.inner.clone();
        let record = staged.update_application(row_index, patch)?;
        self.commit(staged)?;
        Ok(record)
    }
}
