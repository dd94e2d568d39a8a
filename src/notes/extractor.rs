//! Issue table extraction from release-notes HTML

use std::sync::LazyLock;

#[cfg(test)]
use mockall::automock;
use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::config::{AppConfig, DEFAULT_CELL_SELECTOR, DEFAULT_ROW_SELECTOR};
use crate::issue::types::normalize_whitespace;
use crate::issue::{IssueRecord, IssueStatus};
use crate::notes::error::ExtractError;

static ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(DEFAULT_ROW_SELECTOR).expect("row selector is a valid CSS selector")
});

static CELL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(DEFAULT_CELL_SELECTOR).expect("cell selector is a valid CSS selector")
});

/// Some pages repeat the column titles as the first body row
const HEADER_CELL: &str = "Bug ID";

/// Trait for turning a fetched issue page into records
#[cfg_attr(test, automock)]
pub trait IssueExtractor: Send + Sync {
    /// Extract one record per table row, tagged with the page's version and status
    fn extract(
        &self,
        html: &str,
        version: &str,
        status: IssueStatus,
    ) -> Result<Vec<IssueRecord>, ExtractError>;
}

/// Reads the first cell of each body row as the bug id and the second as the description
#[derive(Debug, Clone)]
pub struct HtmlTableExtractor {
    rows: Selector,
    cells: Selector,
}

impl HtmlTableExtractor {
    pub fn new() -> Self {
        Self {
            rows: ROW_SELECTOR.clone(),
            cells: CELL_SELECTOR.clone(),
        }
    }

    /// Use custom row and cell selectors, for pages laid out differently
    pub fn with_selectors(rows: &str, cells: &str) -> Result<Self, ExtractError> {
        Ok(Self {
            rows: parse_selector(rows)?,
            cells: parse_selector(cells)?,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ExtractError> {
        Self::with_selectors(&config.row_selector, &config.cell_selector)
    }
}

impl Default for HtmlTableExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_selector(query: &str) -> Result<Selector, ExtractError> {
    Selector::parse(query).map_err(|e| ExtractError::Selector {
        selector: query.to_string(),
        reason: format!("{:?}", e),
    })
}

impl IssueExtractor for HtmlTableExtractor {
    fn extract(
        &self,
        html: &str,
        version: &str,
        status: IssueStatus,
    ) -> Result<Vec<IssueRecord>, ExtractError> {
        let document = Html::parse_document(html);
        let mut records = Vec::new();

        for (index, row) in document.select(&self.rows).enumerate() {
            let mut cells = row.select(&self.cells);

            let bug_id = cells
                .next()
                .map(|cell| cell.text().collect::<String>().trim().to_string())
                .unwrap_or_default();

            // Header or spacer rows carry no id
            if bug_id.is_empty() || bug_id.eq_ignore_ascii_case(HEADER_CELL) {
                debug!("Skipping row {} without a bug id", index);
                continue;
            }

            let description = cells
                .next()
                .map(|cell| normalize_whitespace(&cell.text().collect::<String>()))
                .unwrap_or_default();

            records.push(IssueRecord {
                bug_id,
                description,
                status,
                version: version.to_string(),
            });
        }

        info!(
            "Extracted {} {} issues for version {}",
            records.len(),
            status,
            version
        );

        Ok(records)
    }
}
