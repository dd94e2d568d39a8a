pub mod config;
pub mod issue;
pub mod notes;
pub mod pipeline;
pub mod store;
pub mod version;
