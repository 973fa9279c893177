pub mod error;
pub mod format;
pub mod policy;
pub mod pricing;
pub mod types;

#[cfg(feature = "origination")]
pub mod origination;

#[cfg(feature = "admin")]
pub mod admin;

pub use error::LoanDeskError;
pub use types::*;

/// Standard result type for all loan-desk operations
pub type LoanDeskResult<T> = Result<T, LoanDeskError>;
