//! Issue data model
//! - types.rs: IssueRecord and IssueStatus

pub mod types;

pub use types::{IssueRecord, IssueStatus};
