//! Common types for issue records

use serde::{Deserialize, Serialize};

/// Which release-notes table an issue was listed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    /// Listed under "Resolved issues"
    Resolved,
    /// Listed under "Known issues"
    Unresolved,
}

impl IssueStatus {
    /// Returns the string representation used in the record store
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Resolved => "resolved",
            IssueStatus::Unresolved => "unresolved",
        }
    }
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IssueStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resolved" => Ok(IssueStatus::Resolved),
            "unresolved" => Ok(IssueStatus::Unresolved),
            _ => Err(()),
        }
    }
}

/// One issue observed in one version's release notes
///
/// Field names map onto the record store columns
/// `BugID,Description,Status,Version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IssueRecord {
    /// Vendor bug identifier (e.g., "1012345"), repeated across versions
    #[serde(rename = "BugID")]
    pub bug_id: String,
    /// Whitespace-normalized description text
    pub description: String,
    pub status: IssueStatus,
    /// Product version whose release notes listed this issue
    pub version: String,
}

impl IssueRecord {
    pub fn new(
        bug_id: impl Into<String>,
        description: impl Into<String>,
        status: IssueStatus,
        version: impl Into<String>,
    ) -> Self {
        Self {
            bug_id: bug_id.into(),
            description: description.into(),
            status,
            version: version.into(),
        }
    }
}

/// Collapse internal whitespace runs to single spaces and trim both ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
