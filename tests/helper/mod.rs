#![allow(dead_code)]

pub mod records;
pub mod site;

pub use records::{create_test_store, record};
pub use site::{MockSite, issue_table};
