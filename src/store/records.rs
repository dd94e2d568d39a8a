//! Flat, append-only record store
//!
//! One header line `BugID,Description,Status,Version` followed by one line
//! per issue record, quoted only where a field needs it.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Terminator, WriterBuilder};
use tracing::{debug, info};

use crate::issue::IssueRecord;
use crate::store::error::StoreError;

/// Column names of the record store
pub const HEADER: [&str; 4] = ["BugID", "Description", "Status", "Version"];

pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record in file order
    ///
    /// An empty file reads as an empty record set.
    pub fn read_all(&self) -> Result<Vec<IssueRecord>, StoreError> {
        debug!("Reading records from {:?}", self.path);

        let file = File::open(&self.path).map_err(|e| self.io_error(e))?;
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

        let headers = reader.headers().map_err(|e| self.csv_error(e))?;
        if headers.is_empty() {
            return Ok(Vec::new());
        }
        if headers.iter().ne(HEADER) {
            return Err(StoreError::InvalidHeader {
                path: self.path.clone(),
                found: headers.iter().collect::<Vec<_>>().join(","),
            });
        }

        let records = reader
            .deserialize::<IssueRecord>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| self.csv_error(e))?;

        info!("Read {} records from {:?}", records.len(), self.path);
        Ok(records)
    }

    /// Append records, writing the header first when the file is new or empty
    ///
    /// A file whose last line lacks a newline gets one before the new rows.
    pub fn append(&self, records: &[IssueRecord]) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        let len = file.metadata().map_err(|e| self.io_error(e))?.len();
        let needs_header = len == 0;
        if !needs_header && !ends_with_newline(&mut file).map_err(|e| self.io_error(e))? {
            debug!("Terminating last line of {:?}", self.path);
            file.write_all(b"\n").map_err(|e| self.io_error(e))?;
        }

        self.write_records(file, records, needs_header)?;
        info!("Appended {} records to {:?}", records.len(), self.path);
        Ok(())
    }

    /// Replace the file contents with the header and the given records
    pub fn write_fresh(&self, records: &[IssueRecord]) -> Result<(), StoreError> {
        let file = File::create(&self.path).map_err(|e| self.io_error(e))?;

        self.write_records(file, records, true)?;
        info!("Wrote {} records to {:?}", records.len(), self.path);
        Ok(())
    }

    fn write_records<W: Write>(
        &self,
        sink: W,
        records: &[IssueRecord],
        with_header: bool,
    ) -> Result<(), StoreError> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(sink);

        if with_header {
            writer
                .write_record(HEADER)
                .map_err(|e| self.csv_error(e))?;
        }

        for record in records {
            writer.serialize(record).map_err(|e| self.csv_error(e))?;
        }

        writer.flush().map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_error(&self, source: csv::Error) -> StoreError {
        StoreError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueStatus;
    use tempfile::TempDir;

    fn sample() -> Vec<IssueRecord> {
        vec![
            IssueRecord::new("1001", "Plain description", IssueStatus::Resolved, "7.0.1"),
            IssueRecord::new(
                "1002",
                "Quoted \"value\", with comma",
                IssueStatus::Unresolved,
                "7.0.1",
            ),
        ]
    }

    #[test]
    fn append_creates_file_with_header() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path().join("records.csv"));

        store.append(&sample()).unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            content,
            "BugID,Description,Status,Version\n\
             1001,Plain description,resolved,7.0.1\n\
             1002,\"Quoted \"\"value\"\", with comma\",unresolved,7.0.1\n"
        );
    }

    #[test]
    fn append_to_existing_file_does_not_repeat_header() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path().join("records.csv"));

        store.append(&sample()[..1]).unwrap();
        store.append(&sample()[1..]).unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(content.matches("BugID").count(), 1);
        assert_eq!(store.read_all().unwrap(), sample());
    }

    #[test]
    fn write_fresh_replaces_previous_content() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path().join("final.csv"));

        store.write_fresh(&sample()).unwrap();
        store.write_fresh(&sample()[1..]).unwrap();

        assert_eq!(store.read_all().unwrap(), sample()[1..].to_vec());
    }

    #[test]
    fn write_fresh_with_no_records_writes_header_only() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path().join("final.csv"));

        store.write_fresh(&[]).unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "BugID,Description,Status,Version\n");
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn read_all_of_empty_file_returns_no_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("records.csv");
        std::fs::write(&path, "").unwrap();

        assert!(RecordStore::new(path).read_all().unwrap().is_empty());
    }

    #[test]
    fn read_all_rejects_unexpected_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("records.csv");
        std::fs::write(&path, "Id,Text\n1,x\n").unwrap();

        let result = RecordStore::new(path).read_all();

        assert!(matches!(result, Err(StoreError::InvalidHeader { found, .. }) if found == "Id,Text"));
    }

    #[test]
    fn read_all_rejects_unknown_status() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("records.csv");
        std::fs::write(&path, "BugID,Description,Status,Version\n1,x,pending,7.0.0\n").unwrap();

        let result = RecordStore::new(path).read_all();

        assert!(matches!(result, Err(StoreError::Csv { .. })));
    }

    #[test]
    fn read_all_of_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path().join("missing.csv"));

        assert!(!store.path().exists());
        assert!(matches!(store.read_all(), Err(StoreError::Io { .. })));
    }

    #[test]
    fn append_terminates_unfinished_last_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("records.csv");
        std::fs::write(
            &path,
            "BugID,Description,Status,Version\n1000,Edited by hand,resolved,7.0.0",
        )
        .unwrap();
        let store = RecordStore::new(&path);

        store.append(&sample()[..1]).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "BugID,Description,Status,Version\n\
             1000,Edited by hand,resolved,7.0.0\n\
             1001,Plain description,resolved,7.0.1\n"
        );
        assert_eq!(store.read_all().unwrap().len(), 2);
    }
}
