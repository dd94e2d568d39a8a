//! Version ordering and issue resolution
//!
//! This module decides which single record survives for each bug when the
//! same issue is listed in the release notes of several product versions.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ accumulated  │────▶│   collapse   │────▶│   resolve    │────▶ canonical
//! │   records    │     │  duplicates  │     │ (per bug id) │      records
//! └──────────────┘     └──────────────┘     └──────────────┘
//!                                                  │
//!                                                  ▼
//!                                           ┌──────────────┐
//!                                           │    semver    │
//!                                           │(version cmp) │
//!                                           └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`semver`]: Version parsing and ordering, tolerant of malformed input
//! - [`resolver`]: Duplicate collapse and highest-version-wins resolution
//! - [`error`]: Error types for resolution

pub mod error;
pub mod resolver;
pub mod semver;

pub use error::ResolveError;
pub use resolver::{collapse_duplicates, resolve};
pub use self::semver::{VersionKey, compare_versions};
