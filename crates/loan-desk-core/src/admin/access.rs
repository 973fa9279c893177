//! Reviewer access: a static allow-list of admin emails.

use tracing::info;

use crate::error::LoanDeskError;
use crate::LoanDeskResult;

use super::application::{ApplicationPatch, ApplicationRecord};
use super::repository::ApplicationRepository;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminAllowList {
    emails: Vec<String>,
}

impl AdminAllowList {
    /// Parse a comma-separated list; entries are trimmed and lower-cased,
    /// blanks dropped.
    pub fn parse(csv: &str) -> Self {
        let emails = csv
            .split(',')
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { emails }
    }

    pub fn is_admin(&self, email: Option<&str>) -> bool {
        match email.map(|e| e.trim().to_lowercase()) {
            Some(e) if !e.is_empty() => self.emails.contains(&e),
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

/// Apply a reviewer's decision, refusing anyone not on the allow-list.
pub fn apply_review<R: ApplicationRepository + ?Sized>(
    repo: &mut R,
    allow_list: &AdminAllowList,
    reviewer: &str,
    row_index: u32,
    patch: &ApplicationPatch,
) -> LoanDeskResult<ApplicationRecord> {
    if !allow_list.is_admin(Some(reviewer)) {
        return Err(LoanDeskError::Unauthorized(reviewer.to_string()));
    }
    let record = repo.update_application(row_index, patch)?;
    info!(row = row_index, status = %patch.status, reviewer, "Application reviewed");
    Ok(record)
}
