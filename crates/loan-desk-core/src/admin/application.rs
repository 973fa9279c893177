//! Application records as stored in the review sheet, plus the review queue
//! ordering and volume statistics shown on the dashboard.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::collateral::CollateralCategory;
use crate::types::{LoanType, Money};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[serde(rename = "Pending Review")]
    PendingReview,
    Approved,
    Rejected,
    Disbursed,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::PendingReview => "Pending Review",
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Disbursed => "Disbursed",
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = crate::LoanDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "pendingreview" | "pending" => Ok(ApplicationStatus::PendingReview),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "disbursed" => Ok(ApplicationStatus::Disbursed),
            _ => Err(crate::LoanDeskError::InvalidInput {
                field: "status".into(),
                reason: format!(
                    "Unknown status '{s}' (expected pending review, approved, rejected or disbursed)."
                ),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

/// One row of the review sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    /// Sheet row number; doubles as the record id.
    pub row_index: u32,
    pub full_name: String,
    pub email: String,
    pub loan_type: LoanType,
    pub amount: Money,
    pub term_months: u32,
    pub mpesa_number: String,
    #[serde(default)]
    pub collateral_type: Option<CollateralCategory>,
    #[serde(default)]
    pub asset_value: Money,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub notes: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub documents: Vec<DocumentInfo>,
}

/// A reviewer's decision on one application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationPatch {
    pub status: ApplicationStatus,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewStats {
    pub total_volume: Money,
    pub pending_volume: Money,
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    pub disbursed: u64,
}

/// Latest submission first; ties keep sheet order.
pub fn review_queue(records: &[ApplicationRecord]) -> Vec<ApplicationRecord> {
    let mut queue = records.to_vec();
    queue.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    queue
}

pub fn summarize(records: &[ApplicationRecord]) -> ReviewStats {
    records.iter().fold(ReviewStats::default(), |mut stats, r| {
        stats.total_volume += r.amount;
        match r.status {
            ApplicationStatus::PendingReview => {
                stats.pending += 1;
                stats.pending_volume += r.amount;
            }
            ApplicationStatus::Approved => stats.approved += 1,
            ApplicationStatus::Rejected => stats.rejected += 1,
            ApplicationStatus::Disbursed => stats.disbursed += 1,
        }
        stats
    })
}

impl Default for ApplicationRecord {
    fn default() -> Self {
        Self {
            row_index: 0,
            full_name: String::new(),
            email: String::new(),
            loan_type: LoanType::Unsecured,
            amount: Decimal::ZERO,
            term_months: 0,
            mpesa_number: String::new(),
            collateral_type: None,
            asset_value: Decimal::ZERO,
            status: ApplicationStatus::PendingReview,
            notes: String::new(),
            submitted_at: DateTime::<Utc>::default(),
            documents: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn record(row: u32, amount: Money, status: ApplicationStatus, day: u32) -> ApplicationRecord {
        ApplicationRecord {
            row_index: row,
            amount,
            status,
            submitted_at: Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap(),
            ..ApplicationRecord::default()
        }
    }

    #[test]
    fn test_status_sheet_strings() {
        let json = serde_json::to_string(&ApplicationStatus::PendingReview).unwrap();
        assert_eq!(json, "\"Pending Review\"");
        let parsed: ApplicationStatus = serde_json::from_str("\"Disbursed\"").unwrap();
        assert_eq!(parsed, ApplicationStatus::Disbursed);
    }

    #[test]
    fn test_status_from_str_is_lenient() {
        assert_eq!("pending_review".parse::<ApplicationStatus>().unwrap(), ApplicationStatus::PendingReview);
        assert_eq!("Pending Review".parse::<ApplicationStatus>().unwrap(), ApplicationStatus::PendingReview);
        assert_eq!("APPROVED".parse::<ApplicationStatus>().unwrap(), ApplicationStatus::Approved);
        assert!("archived".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_review_queue_latest_first() {
        let records = vec![
            record(2, dec!(10_000), ApplicationStatus::Approved, 1),
            record(3, dec!(20_000), ApplicationStatus::PendingReview, 5),
            record(4, dec!(30_000), ApplicationStatus::Rejected, 3),
        ];
        let rows: Vec<u32> = review_queue(&records).iter().map(|r| r.row_index).collect();
        assert_eq!(rows, vec![3, 4, 2]);
    }

    #[test]
    fn test_summarize_volumes_and_counts() {
        let records = vec![
            record(2, dec!(10_000), ApplicationStatus::Approved, 1),
            record(3, dec!(20_000), ApplicationStatus::PendingReview, 2),
            record(4, dec!(5_000), ApplicationStatus::PendingReview, 3),
            record(5, dec!(7_500), ApplicationStatus::Disbursed, 4),
        ];
        let stats = summarize(&records);
        assert_eq!(stats.total_volume, dec!(42_500));
        assert_eq!(stats.pending_volume, dec!(25_000));
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.approved, 1);
        assert_eq!(stats.rejected, 0);
        assert_eq!(stats.disbursed, 1);
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&[]), ReviewStats::default());
    }
}
