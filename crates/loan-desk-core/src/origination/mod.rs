pub mod documents;
pub mod identity;
pub mod quote;
pub mod submission;
pub mod wizard;
