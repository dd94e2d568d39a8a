//! Record store layer
//! - records.rs: delimited text store for issue records
//! - error.rs: store error types

pub mod error;
pub mod records;

pub use error::StoreError;
pub use records::{HEADER, RecordStore};
