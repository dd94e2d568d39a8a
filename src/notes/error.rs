use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("No {section} link found in release notes for version {version}")]
    LinkNotFound {
        version: String,
        section: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid selector '{selector}': {reason}")]
    Selector {
        selector: String,
        reason: String,
    },
}
