use clap::Args;
use serde_json::{json, Value};

use loan_desk_core::origination::submission;
use loan_desk_core::origination::wizard::{self, WizardEvent, WizardStep};

use crate::input;
use crate::store::JsonFileRepository;

/// Arguments for replaying the application wizard
#[derive(Args)]
pub struct WizardArgs {
    /// JSON array of wizard events (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Origination policy file (JSON or YAML)
    #[arg(long)]
    pub policy: Option<String>,

    /// Append the submission to this application sheet when the replay ends at review
    #[arg(long)]
    pub store: Option<String>,
}

pub fn run_wizard(args: WizardArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let policy = input::file::read_policy(args.policy.as_deref())?;

    let events: Vec<WizardEvent> = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input is required (or pipe a JSON event array on stdin)".into());
    };

    let state = wizard::replay(events, &policy)?;

    // Amount may be mid-edit; show terms only when they price.
    let terms = state.loan_type.and_then(|_| state.terms().ok());

    let mut submission_value = Value::Null;
    let mut stored_row = Value::Null;
    if state.step == WizardStep::Review {
        let payload = submission::build_submission(&state, &policy)?;
        if let Some(ref path) = args.store {
            let mut repo = JsonFileRepository::open(path)?;
            let record = repo.submit(&payload, chrono::Utc::now())?;
            stored_row = json!(record.row_index);
        }
        submission_value = serde_json::to_value(payload)?;
    } else if args.store.is_some() {
        return Err(format!(
            "Nothing to submit: wizard stopped at '{}', not review. \
             Leave the final submit event out of the replay when using --store",
            state.step
        )
        .into());
    }

    Ok(json!({
        "step": state.step,
        "progress_step": state.progress_step(),
        "max_principal": state.max_principal(&policy),
        "state": state,
        "terms": terms,
        "submission": submission_value,
        "stored_row": stored_row,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_store_outside_review_explains_how_to_stop() {
        let events = std::env::temp_dir().join(format!("loandesk-events-{}.json", std::process::id()));
        fs::write(&events, "[]").unwrap();

        let args = WizardArgs {
            input: Some(events.to_string_lossy().into_owned()),
            policy: None,
            store: Some("applications.json".into()),
        };
        let message = run_wizard(args).err().unwrap().to_string();
        assert!(message.contains("stopped at 'identity'"), "{message}");
        assert!(message.contains("submit event"), "{message}");

        let _ = fs::remove_file(&events);
    }
}
