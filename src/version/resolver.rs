//! Canonical issue resolution
//!
//! Collapses an accumulated, multi-version record set into one record per
//! bug id, keeping the record observed in the highest product version.
//!
//! Status is never reconciled across versions: when a bug is listed as
//! resolved in one version and as known in a newer one, the newer listing
//! wins even though that reads as a regression.

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, info};

use crate::issue::IssueRecord;
use crate::version::error::ResolveError;
use crate::version::semver::VersionKey;

/// Drop exact duplicate records, keeping the first occurrence of each
///
/// Duplicates appear when the same release-notes page was appended twice.
pub fn collapse_duplicates(records: &[IssueRecord]) -> Vec<&IssueRecord> {
    let unique: IndexSet<&IssueRecord> = records.iter().collect();

    if unique.len() < records.len() {
        debug!(
            "Collapsed {} identical records",
            records.len() - unique.len()
        );
    }

    unique.into_iter().collect()
}

/// Resolve the accumulated records to exactly one record per bug id
///
/// Groups are emitted in the order their bug id first appears. Within a
/// group the record from the highest version wins; when several versions
/// tie, the first one encountered is kept.
///
/// # Returns
/// * `Ok(Vec<IssueRecord>)` - Canonical records, one per distinct bug id
/// * `Err(ResolveError)` - If any record has an empty bug id
pub fn resolve(records: &[IssueRecord]) -> Result<Vec<IssueRecord>, ResolveError> {
    if let Some(position) = records
        .iter()
        .position(|record| record.bug_id.trim().is_empty())
    {
        return Err(ResolveError::MissingBugId { position });
    }

    let mut groups: IndexMap<&str, Vec<&IssueRecord>> = IndexMap::new();
    for record in collapse_duplicates(records) {
        groups.entry(record.bug_id.as_str()).or_default().push(record);
    }

    let canonical: Vec<IssueRecord> = groups
        .values()
        .map(|group| select_canonical(group).clone())
        .collect();

    info!(
        "Resolved {} records into {} canonical records",
        records.len(),
        canonical.len()
    );

    Ok(canonical)
}

/// Pick the record from the highest-ranked version of a non-empty group
fn select_canonical<'a>(group: &[&'a IssueRecord]) -> &'a IssueRecord {
    let distinct_versions: IndexSet<&str> = group.iter().map(|r| r.version.as_str()).collect();

    let mut ranked: Vec<(&str, VersionKey)> = distinct_versions
        .into_iter()
        .map(|version| (version, VersionKey::new(version)))
        .collect();
    // Stable sort keeps first-seen order among versions that tie
    ranked.sort_by(|(_, lhs), (_, rhs)| rhs.cmp(lhs));

    let canonical_version = ranked[0].0;
    let record = group
        .iter()
        .copied()
        .find(|r| r.version == canonical_version)
        .unwrap_or(group[0]);

    if group.iter().any(|r| r.status != record.status) {
        debug!(
            "Bug {} has differing status across versions; keeping '{}' from {}",
            record.bug_id, record.status, record.version
        );
    }

    record
}
