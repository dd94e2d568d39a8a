//! Release-notes layer
//! - source.rs: ReleaseNotesSource trait for locating and fetching issue pages
//! - fortinet.rs: docs.fortinet.com implementation
//! - extractor.rs: HTML issue-table extraction
//! - error.rs: fetch and extraction error types

pub mod error;
pub mod extractor;
pub mod fortinet;
pub mod source;

pub use error::{ExtractError, FetchError};
pub use extractor::{HtmlTableExtractor, IssueExtractor};
pub use fortinet::FortinetDocs;
pub use source::{IssuePages, ReleaseNotesSource};
