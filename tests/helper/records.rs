//! Record store test utilities

use tempfile::TempDir;

use release_issues::issue::{IssueRecord, IssueStatus};
use release_issues::store::RecordStore;

/// Shorthand for building a record
pub fn record(bug_id: &str, version: &str, status: IssueStatus, description: &str) -> IssueRecord {
    IssueRecord::new(bug_id, description, status, version)
}

/// Create a record store in a fresh temp dir, pre-populated with the given records
pub fn create_test_store(file_name: &str, records: &[IssueRecord]) -> (TempDir, RecordStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = RecordStore::new(temp_dir.path().join(file_name));

    if !records.is_empty() {
        store.append(records).unwrap();
    }

    (temp_dir, store)
}
