//! Fetch, extract, accumulate and resolve orchestration

use std::path::PathBuf;
use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::issue::{IssueRecord, IssueStatus};
use crate::notes::error::{ExtractError, FetchError};
use crate::notes::extractor::{HtmlTableExtractor, IssueExtractor};
use crate::notes::fortinet::FortinetDocs;
use crate::notes::source::ReleaseNotesSource;
use crate::store::{RecordStore, StoreError};
use crate::version::error::ResolveError;
use crate::version::resolver::resolve;

/// Failure of one pipeline stage
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("fetch failed for version {version}: {source}")]
    Fetch {
        version: String,
        #[source]
        source: FetchError,
    },

    #[error("extract failed for version {version}: {source}")]
    Extract {
        version: String,
        #[source]
        source: ExtractError,
    },

    #[error("accumulate failed: {0}")]
    Accumulate(#[source] StoreError),

    #[error("resolve failed: {0}")]
    ResolveStore(#[source] StoreError),

    #[error("resolve failed: {0}")]
    Resolve(#[from] ResolveError),
}

/// What a run should do
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Product versions to collect, in append order
    pub versions: Vec<String>,
    pub records_file: PathBuf,
    /// Resolve the accumulated records after collecting
    pub sorted: bool,
    pub sorted_file: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Records appended to the accumulated store
    pub appended: usize,
    /// Canonical records written, when resolution ran
    pub canonical: Option<usize>,
}

pub struct Pipeline {
    source: Arc<dyn ReleaseNotesSource>,
    extractor: Arc<dyn IssueExtractor>,
    concurrency: usize,
    stagger_delay_ms: u64,
}

impl Pipeline {
    pub fn new(source: Arc<dyn ReleaseNotesSource>, extractor: Arc<dyn IssueExtractor>) -> Self {
        let defaults = AppConfig::default();
        Self {
            source,
            extractor,
            concurrency: defaults.concurrency,
            stagger_delay_ms: defaults.fetch_stagger_delay_ms,
        }
    }

    /// Build a pipeline against the documentation site named in the config
    ///
    /// Fails when the configured table selectors are not valid CSS.
    pub fn from_config(config: &AppConfig) -> Result<Self, ExtractError> {
        Ok(Self::new(
            Arc::new(FortinetDocs::from_config(config)),
            Arc::new(HtmlTableExtractor::from_config(config)?),
        )
        .with_concurrency(config.concurrency)
        .with_stagger_delay_ms(config.fetch_stagger_delay_ms))
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_stagger_delay_ms(mut self, delay_ms: u64) -> Self {
        self.stagger_delay_ms = delay_ms;
        self
    }

    /// Delay before starting the fetch of the version at `index`
    fn stagger_delay(&self, index: usize) -> Duration {
        Duration::from_millis(self.stagger_delay_ms.saturating_mul(index as u64))
    }

    /// Collect all issue records for one version
    ///
    /// Resolved issues come first, then known issues.
    pub async fn collect_version(&self, version: &str) -> Result<Vec<IssueRecord>, PipelineError> {
        let fetch_error = |source: FetchError| PipelineError::Fetch {
            version: version.to_string(),
            source,
        };

        let pages = self
            .source
            .discover_pages(version)
            .await
            .map_err(fetch_error)?;

        let resolved_html = self
            .source
            .fetch_page(&pages.resolved_issues)
            .await
            .map_err(fetch_error)?;
        let mut records = self.extract(&resolved_html, version, IssueStatus::Resolved)?;

        let known_html = self
            .source
            .fetch_page(&pages.known_issues)
            .await
            .map_err(fetch_error)?;
        records.extend(self.extract(&known_html, version, IssueStatus::Unresolved)?);

        Ok(records)
    }

    fn extract(
        &self,
        html: &str,
        version: &str,
        status: IssueStatus,
    ) -> Result<Vec<IssueRecord>, PipelineError> {
        self.extractor
            .extract(html, version, status)
            .map_err(|source| PipelineError::Extract {
                version: version.to_string(),
                source,
            })
    }

    /// Collect every version and append its records to the store
    ///
    /// Versions are fetched concurrently but appended in the order given, and
    /// only once both of a version's pages were extracted. The first failure
    /// stops the run; versions appended before it stay in the store.
    ///
    /// Returns the number of records appended.
    pub async fn accumulate(
        &self,
        versions: &[String],
        store: &RecordStore,
    ) -> Result<usize, PipelineError> {
        let mut collected = pin!(
            stream::iter(versions.iter().enumerate())
                .map(|(i, version)| {
                    let delay = self.stagger_delay(i);
                    async move {
                        sleep(delay).await;
                        (version, self.collect_version(version).await)
                    }
                })
                .buffered(self.concurrency)
        );

        let mut appended = 0;
        while let Some((version, result)) = collected.next().await {
            let records = result?;
            store
                .append(&records)
                .map_err(PipelineError::Accumulate)?;
            debug!("Appended {} records for version {}", records.len(), version);
            appended += records.len();
        }

        info!(
            "Accumulated {} records from {} versions into {:?}",
            appended,
            versions.len(),
            store.path()
        );

        Ok(appended)
    }

    /// Run collection and, when requested, resolution
    pub async fn run(&self, options: &RunOptions) -> Result<RunSummary, PipelineError> {
        let records = RecordStore::new(&options.records_file);

        let appended = self.accumulate(&options.versions, &records).await?;

        let canonical = if options.sorted {
            let output = RecordStore::new(&options.sorted_file);
            Some(resolve_store(&records, &output)?)
        } else {
            None
        };

        Ok(RunSummary {
            appended,
            canonical,
        })
    }
}

/// Read the accumulated store, resolve it and write the canonical records fresh
///
/// Returns the number of canonical records written.
pub fn resolve_store(records: &RecordStore, output: &RecordStore) -> Result<usize, PipelineError> {
    let accumulated = records.read_all().map_err(PipelineError::ResolveStore)?;
    let canonical = resolve(&accumulated)?;

    output
        .write_fresh(&canonical)
        .map_err(PipelineError::ResolveStore)?;

    Ok(canonical.len())
}
