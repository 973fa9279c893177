use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanDeskError {
    #[error("Invalid amount: {field}: {reason}")]
    InvalidAmount { field: String, reason: String },

    #[error("Invalid term: {0}")]
    InvalidTerm(String),

    #[error("Unknown collateral category: '{0}' (expected vehicle, equipment or land)")]
    UnknownCollateralCategory(String),

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid transition: {event} is not accepted at the {step} step")]
    InvalidTransition { step: String, event: String },

    #[error("Application not found: sheet row {0}")]
    ApplicationNotFound(u32),

    #[error("Unauthorized: {0} is not on the admin allow-list")]
    Unauthorized(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LoanDeskError {
    fn from(e: serde_json::Error) -> Self {
        LoanDeskError::SerializationError(e.to_string())
    }
}
