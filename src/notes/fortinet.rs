//! docs.fortinet.com release-notes implementation

use std::time::Duration;

use regex::Regex;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::notes::error::FetchError;
use crate::notes::source::{IssuePages, ReleaseNotesSource};

const KNOWN_ISSUES: &str = "known-issues";
const RESOLVED_ISSUES: &str = "resolved-issues";

/// Release-notes source backed by the Fortinet documentation library
pub struct FortinetDocs {
    client: reqwest::Client,
    base_url: String,
    known_issues_re: Regex,
    resolved_issues_re: Regex,
}

impl FortinetDocs {
    /// Creates a new FortinetDocs source with a custom base URL
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            known_issues_re: Regex::new(r#"href="([^"]*known-issues)""#).unwrap(),
            resolved_issues_re: Regex::new(r#"href="([^"]*resolved-issues)""#).unwrap(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.base_url,
            Duration::from_millis(config.fetch_timeout_ms),
            &config.user_agent,
        )
    }

    /// URL of the release-notes index page for a version
    fn index_url(&self, version: &str) -> String {
        format!(
            "{}/document/fortigate/{}/fortios-release-notes",
            self.base_url, version
        )
    }

    /// Turn an href value into an absolute URL on the documentation site
    fn absolute_url(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else if href.starts_with('/') {
            format!("{}{}", self.base_url, href)
        } else {
            format!("{}/{}", self.base_url, href)
        }
    }

    fn find_link(
        &self,
        pattern: &Regex,
        body: &str,
        version: &str,
        section: &'static str,
    ) -> Result<String, FetchError> {
        pattern
            .captures(body)
            .map(|captures| self.absolute_url(&captures[1]))
            .ok_or_else(|| FetchError::LinkNotFound {
                version: version.to_string(),
                section,
            })
    }

    async fn get(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url.to_string()));
        }

        if !status.is_success() {
            warn!("Documentation site returned status {}: {}", status, url);
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait::async_trait]
impl ReleaseNotesSource for FortinetDocs {
    async fn discover_pages(&self, version: &str) -> Result<IssuePages, FetchError> {
        info!("Gathering issue links for version {}", version);

        let body = self.get(&self.index_url(version)).await?;

        let pages = IssuePages {
            known_issues: self.find_link(&self.known_issues_re, &body, version, KNOWN_ISSUES)?,
            resolved_issues: self.find_link(
                &self.resolved_issues_re,
                &body,
                version,
                RESOLVED_ISSUES,
            )?,
        };

        info!("Known issues for {}: {}", version, pages.known_issues);
        info!("Resolved issues for {}: {}", version, pages.resolved_issues);

        Ok(pages)
    }

    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        self.get(url).await
    }
}
