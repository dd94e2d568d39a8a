use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use semver::Prerelease;
use tracing::debug;

/// Accepts `v`-prefixed versions with any number of numeric segments,
/// an optional pre-release (`-rc.1` or a bare `beta2` suffix) and optional build metadata.
static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^[vV]?(?P<segments>[0-9]+(?:\.[0-9]+)*)",
        r"(?:-(?P<pre>[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)",
        r"|(?P<bare>[A-Za-z][0-9A-Za-z-]*(?:\.[0-9A-Za-z-]+)*))?",
        r"(?:\+[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?$",
    ))
    .expect("version pattern is a valid regex")
});

/// A version string parsed into numeric segments and a pre-release tag.
///
/// Segments are compared left to right with missing trailing segments
/// treated as zero, so "6.4" equals "6.4.0". Build metadata is ignored.
///
/// Examples:
/// - "6.4.10" -> [6, 4, 10]
/// - "v7.0" -> [7, 0]
/// - "7.2.0-rc.1" -> [7, 2, 0] with pre-release "rc.1"
/// - "7.2.0-rc.01" -> [7, 2, 0] with pre-release "rc.01"
#[derive(Debug, Clone)]
pub struct ParsedVersion {
    segments: Vec<u64>,
    pre: Option<PreRelease>,
}

/// Pre-release tag of a parsed version
#[derive(Debug, Clone)]
enum PreRelease {
    Strict(Prerelease),
    /// Tag semver rejects, such as a numeric identifier with a leading zero
    Lenient(String),
}

impl PreRelease {
    fn new(tag: &str) -> Self {
        match Prerelease::new(tag) {
            Ok(pre) => PreRelease::Strict(pre),
            Err(_) => PreRelease::Lenient(tag.to_string()),
        }
    }

    fn as_str(&self) -> &str {
        match self {
            PreRelease::Strict(pre) => pre.as_str(),
            PreRelease::Lenient(tag) => tag,
        }
    }
}

impl Ord for PreRelease {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (PreRelease::Strict(lhs), PreRelease::Strict(rhs)) => lhs.cmp(rhs),
            _ => compare_identifiers(self.as_str(), other.as_str()),
        }
    }
}

impl PartialOrd for PreRelease {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PreRelease {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PreRelease {}

/// Semver pre-release precedence, with leading zeros allowed in numeric identifiers
fn compare_identifiers(lhs: &str, rhs: &str) -> Ordering {
    let mut lhs_parts = lhs.split('.');
    let mut rhs_parts = rhs.split('.');

    loop {
        let ordering = match (lhs_parts.next(), rhs_parts.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(lhs), Some(rhs)) => compare_identifier(lhs, rhs),
        };
        if ordering.is_ne() {
            return ordering;
        }
    }
}

fn compare_identifier(lhs: &str, rhs: &str) -> Ordering {
    let is_numeric = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    match (is_numeric(lhs), is_numeric(rhs)) {
        (true, true) => {
            let lhs = lhs.trim_start_matches('0');
            let rhs = rhs.trim_start_matches('0');
            lhs.len().cmp(&rhs.len()).then_with(|| lhs.cmp(rhs))
        }
        // Numeric identifiers rank below alphanumeric ones
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => lhs.cmp(rhs),
    }
}

impl ParsedVersion {
    /// Parse a version string, returning None when it is not a recognizable version
    pub fn parse(version: &str) -> Option<Self> {
        let captures = VERSION_PATTERN.captures(version.trim())?;

        let segments = captures["segments"]
            .split('.')
            .map(|segment| segment.parse::<u64>().ok())
            .collect::<Option<Vec<_>>>()?;

        let pre = captures
            .name("pre")
            .or_else(|| captures.name("bare"))
            .map(|tag| PreRelease::new(tag.as_str()));

        Some(Self { segments, pre })
    }
}

impl Ord for ParsedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        (0..len)
            .map(|i| {
                let lhs = self.segments.get(i).copied().unwrap_or(0);
                let rhs = other.segments.get(i).copied().unwrap_or(0);
                lhs.cmp(&rhs)
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
            .then_with(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                // A release ranks above any of its pre-releases
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(lhs), Some(rhs)) => lhs.cmp(rhs),
            })
    }
}

impl PartialOrd for ParsedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ParsedVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ParsedVersion {}

/// Ordering key for an arbitrary version string.
///
/// Unparsable strings never fail: they rank below every parsable version
/// and compare equal to each other, so a ranking always has a deterministic
/// outcome once ties are broken by position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum VersionKey {
    Unparsable,
    Parsed(ParsedVersion),
}

impl VersionKey {
    pub fn new(version: &str) -> Self {
        match ParsedVersion::parse(version) {
            Some(parsed) => VersionKey::Parsed(parsed),
            None => {
                debug!("Unparsable version '{}', ranking it lowest", version);
                VersionKey::Unparsable
            }
        }
    }
}

/// Compare two version strings by semantic-version rules
pub fn compare_versions(lhs: &str, rhs: &str) -> Ordering {
    VersionKey::new(lhs).cmp(&VersionKey::new(rhs))
}
