use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Record at position {position} has an empty bug id")]
    MissingBugId { position: usize },
}
