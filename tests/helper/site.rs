//! Mock documentation site utilities

use mockito::{Mock, Server, ServerGuard};

/// Render an issue table the way the release-notes pages lay it out
pub fn issue_table(rows: &[(&str, &str)]) -> String {
    let body: String = rows
        .iter()
        .map(|(id, description)| {
            format!(
                "<tr>\n<td><p>{}</p></td>\n<td><p>{}</p></td>\n</tr>\n",
                id, description
            )
        })
        .collect();

    format!(
        "<html><body><table>\n<thead><tr><th>Bug ID</th><th>Description</th></tr></thead>\n<tbody>\n{}</tbody>\n</table></body></html>",
        body
    )
}

/// Documentation site serving release notes for a set of versions
pub struct MockSite {
    pub server: ServerGuard,
    mocks: Vec<Mock>,
}

impl MockSite {
    pub async fn new() -> Self {
        Self {
            server: Server::new_async().await,
            mocks: Vec::new(),
        }
    }

    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Serve the index, resolved-issues and known-issues pages for a version
    pub async fn with_version(
        mut self,
        version: &str,
        resolved: &[(&str, &str)],
        known: &[(&str, &str)],
    ) -> Self {
        let base = format!("/document/fortigate/{}/fortios-release-notes", version);
        let resolved_path = format!("{}/289806/resolved-issues", base);
        let known_path = format!("{}/236526/known-issues", base);

        let index = format!(
            r#"<html><body><nav>
                <a href="{}">Resolved issues</a>
                <a href="{}">Known issues</a>
            </nav></body></html>"#,
            resolved_path, known_path
        );

        for (path, body) in [
            (base, index),
            (resolved_path, issue_table(resolved)),
            (known_path, issue_table(known)),
        ] {
            let mock = self
                .server
                .mock("GET", path.as_str())
                .with_status(200)
                .with_header("content-type", "text/html")
                .with_body(body)
                .create_async()
                .await;
            self.mocks.push(mock);
        }

        self
    }

    /// Serve a 404 for a version's index page
    pub async fn with_missing_version(mut self, version: &str) -> Self {
        let path = format!("/document/fortigate/{}/fortios-release-notes", version);
        let mock = self
            .server
            .mock("GET", path.as_str())
            .with_status(404)
            .create_async()
            .await;
        self.mocks.push(mock);
        self
    }
}
