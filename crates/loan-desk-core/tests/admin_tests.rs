#![cfg(feature = "admin")]

use chrono::{TimeZone, Utc};
use loan_desk_core::admin::access::{apply_review, AdminAllowList};
use loan_desk_core::admin::application::{review_queue, summarize, ApplicationPatch, ApplicationStatus};
use loan_desk_core::admin::repository::{ApplicationRepository, InMemoryApplicationRepository};
use loan_desk_core::origination::documents::DocumentKind;
use loan_desk_core::origination::identity::ContactDetails;
use loan_desk_core::origination::submission::build_submission;
use loan_desk_core::origination::wizard::{replay, WizardEvent};
use loan_desk_core::policy::OriginationPolicy;
use loan_desk_core::{LoanDeskError, LoanType};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn submit(repo: &mut InMemoryApplicationRepository, amount: Decimal, day: u32) -> u32 {
    let policy = OriginationPolicy::default();
    let events = vec![
        WizardEvent::IdentifyBorrower {
            borrower_id: "0712345678".into(),
            matched: None,
        },
        WizardEvent::SelectLoanType {
            loan_type: LoanType::Unsecured,
        },
        WizardEvent::SetAmount { amount },
        WizardEvent::Next,
        WizardEvent::AttachDocuments {
            kind: DocumentKind::Id,
            file_names: vec!["id.jpg".into()],
        },
        WizardEvent::AttachDocuments {
            kind: DocumentKind::Income,
            file_names: vec!["slip.pdf".into()],
        },
        WizardEvent::Next,
        WizardEvent::SetContact(ContactDetails {
            mpesa_number: "0712345678".into(),
            full_name: "John Kamau".into(),
            email: "john@example.com".into(),
        }),
        WizardEvent::Next,
    ];
    let state = replay(events, &policy).unwrap();
    let submission = build_submission(&state, &policy).unwrap();
    repo.submit(&submission, Utc.with_ymd_and_hms(2026, 5, day, 10, 0, 0).unwrap())
        .unwrap()
        .row_index
}

#[test]
fn test_submit_review_and_summarize() {
    let mut repo = InMemoryApplicationRepository::new();
    let first = submit(&mut repo, dec!(10_000), 1);
    let second = submit(&mut repo, dec!(40_000), 3);
    let third = submit(&mut repo, dec!(25_000), 2);

    let admins = AdminAllowList::parse("ops@lender.co.ke");
    apply_review(
        &mut repo,
        &admins,
        "OPS@lender.co.ke",
        first,
        &ApplicationPatch {
            status: ApplicationStatus::Disbursed,
            notes: "Paid out".into(),
        },
    )
    .unwrap();

    let records = repo.fetch_applications().unwrap();
    let queue: Vec<u32> = review_queue(&records).iter().map(|r| r.row_index).collect();
    assert_eq!(queue, vec![second, third, first]);

    let stats = summarize(&records);
    assert_eq!(stats.total_volume, dec!(75_000));
    assert_eq!(stats.pending_volume, dec!(65_000));
    assert_eq!(stats.pending, 2);
    assert_eq!(stats.disbursed, 1);
}

#[test]
fn test_unauthorized_reviewer_leaves_record_untouched() {
    let mut repo = InMemoryApplicationRepository::new();
    let row = submit(&mut repo, dec!(10_000), 1);
    let err = apply_review(
        &mut repo,
        &AdminAllowList::parse("ops@lender.co.ke"),
        "borrower@example.com",
        row,
        &ApplicationPatch {
            status: ApplicationStatus::Approved,
            notes: String::new(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, LoanDeskError::Unauthorized(_)));
    assert_eq!(
        repo.fetch_applications().unwrap()[0].status,
        ApplicationStatus::PendingReview
    );
}

#[test]
fn test_records_round_trip_through_json() {
    let mut repo = InMemoryApplicationRepository::new();
    submit(&mut repo, dec!(10_000), 1);
    let json = serde_json::to_string(&repo.fetch_applications().unwrap()).unwrap();
    assert!(json.contains("\"Pending Review\""));
    let back: Vec<loan_desk_core::admin::application::ApplicationRecord> =
        serde_json::from_str(&json).unwrap();
    assert_eq!(back, repo.into_records());
}
