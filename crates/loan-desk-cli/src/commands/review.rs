use clap::Args;
use serde_json::{json, Value};

use loan_desk_core::admin::access::{self, AdminAllowList};
use loan_desk_core::admin::application::{self, ApplicationPatch, ApplicationStatus};
use loan_desk_core::admin::repository::ApplicationRepository;

use crate::store::JsonFileRepository;

/// Arguments for listing the review queue
#[derive(Args)]
pub struct ApplicationsArgs {
    /// Application sheet (JSON array of records)
    #[arg(long)]
    pub store: String,

    /// Only show applications with this status
    #[arg(long)]
    pub status: Option<String>,
}

/// Arguments for updating one application
#[derive(Args)]
pub struct SetStatusArgs {
    /// Application sheet (JSON array of records)
    #[arg(long)]
    pub store: String,

    /// Sheet row of the application
    #[arg(long)]
    pub row: u32,

    /// Pending Review, Approved, Rejected or Disbursed
    #[arg(long)]
    pub status: String,

    /// Reviewer notes (replaces existing notes)
    #[arg(long, default_value = "")]
    pub notes: String,

    /// Email of the reviewing admin
    #[arg(long)]
    pub reviewer: String,

    /// Comma-separated admin emails
    #[arg(long, env = "LOANDESK_ADMIN_EMAILS", default_value = "")]
    pub admins: String,
}

pub fn run_applications(args: ApplicationsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let repo = JsonFileRepository::open(&args.store)?;
    let records = repo.fetch_applications()?;
    let stats = application::summarize(&records);

    let filter: Option<ApplicationStatus> = args.status.as_deref().map(str::parse::<ApplicationStatus>).transpose()?;
    let queue: Vec<_> = application::review_queue(&records)
        .into_iter()
        .filter(|r| filter.map_or(true, |s| r.status == s))
        .collect();

    Ok(json!({
        "stats": stats,
        "applications": queue,
    }))
}

pub fn run_set_status(args: SetStatusArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let allow_list = AdminAllowList::parse(&args.admins);
    if allow_list.is_empty() {
        return Err("No admin emails configured (set --admins or LOANDESK_ADMIN_EMAILS)".into());
    }

    let patch = ApplicationPatch {
        status: args.status.parse()?,
        notes: args.notes,
    };

    let mut repo = JsonFileRepository::open(&args.store)?;
    let record = access::apply_review(&mut repo, &allow_list, &args.reviewer, args.row, &patch)?;
    Ok(serde_json::to_value(record)?)
}
