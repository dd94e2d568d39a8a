//! Source trait for locating and fetching release-notes pages

#[cfg(test)]
use mockall::automock;

use crate::notes::error::FetchError;

/// URLs of the two issue tables published for one product version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuePages {
    pub known_issues: String,
    pub resolved_issues: String,
}

/// Trait for fetching release-notes pages from a documentation site
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleaseNotesSource: Send + Sync {
    /// Locates the known-issues and resolved-issues pages for a version
    ///
    /// # Arguments
    /// * `version` - Product version as published (e.g., "7.0.12")
    ///
    /// # Returns
    /// * `Ok(IssuePages)` - Absolute URLs of both issue pages
    /// * `Err(FetchError)` - If the index page cannot be fetched or lacks a link
    async fn discover_pages(&self, version: &str) -> Result<IssuePages, FetchError>;

    /// Fetches the HTML body of a page
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;
}
