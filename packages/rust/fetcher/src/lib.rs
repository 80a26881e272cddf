//! Concurrent retrieval of Schema.org feeds with per-source failure isolation.
//!
//! Every configured source is requested at once. A source that is
//! unreachable, answers with a non-success status, or serves something that
//! is not JSON contributes no records and is listed in
//! [`FetchResults::fetch_fails`]; the remaining sources are unaffected.

mod progress;

use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::Client;
use tracing::{debug, info, instrument, warn};
use workfind_shared::{FetchConfig, Result, SourceDescriptor, WorkRecord, WorkfindError};

pub use progress::{FetchProgress, SilentProgress};

/// Maximum number of redirects to follow per source.
const MAX_REDIRECTS: usize = 3;

/// User-Agent string for source requests.
const USER_AGENT: &str = concat!("workfind/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Options and results
// ---------------------------------------------------------------------------

/// HTTP settings for a [`SourceFetcher`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Timeout for each request in seconds.
    pub timeout_secs: u64,
    /// Bodies larger than this are rejected.
    pub max_response_bytes: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::from(&FetchConfig::default())
    }
}

impl From<&FetchConfig> for FetchOptions {
    fn from(config: &FetchConfig) -> Self {
        Self {
            timeout_secs: config.timeout_secs,
            max_response_bytes: config.max_response_bytes,
        }
    }
}

/// Outcome of one aggregation run.
#[derive(Debug, Clone, Default)]
pub struct FetchResults {
    /// Names of the sources that failed, one entry per failure.
    pub fetch_fails: Vec<String>,
    /// Records from every source that succeeded, in completion order.
    pub works: Vec<WorkRecord>,
}

// ---------------------------------------------------------------------------
// SourceFetcher
// ---------------------------------------------------------------------------

/// Fetches and parses Schema.org feeds.
#[derive(Debug, Clone)]
pub struct SourceFetcher {
    client: Client,
    max_response_bytes: u64,
}

impl SourceFetcher {
    /// Build a fetcher with its own HTTP client.
    pub fn new(opts: &FetchOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(opts.timeout_secs))
            .build()
            .map_err(|e| WorkfindError::Client(e.to_string()))?;

        Ok(Self {
            client,
            max_response_bytes: opts.max_response_bytes,
        })
    }

    /// Fetch one source and parse its body into work records.
    ///
    /// The body is read chunk by chunk and the download is abandoned as soon
    /// as it passes `max_response_bytes`, whether or not the server sent a
    /// content-length.
    #[instrument(skip_all, fields(site = %source.name, url = %source.url))]
    pub async fn fetch_one(&self, source: &SourceDescriptor) -> Result<Vec<WorkRecord>> {
        let site = source.name.as_str();
        let url = &source.url;
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| WorkfindError::fetch(site, format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WorkfindError::Status {
                site: site.to_string(),
                status: status.as_u16(),
            });
        }

        if response
            .content_length()
            .is_some_and(|len| len > self.max_response_bytes)
        {
            return Err(self.too_large(site));
        }

        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| WorkfindError::fetch(site, format!("{url}: failed to read body: {e}")))?
        {
            if (body.len() + chunk.len()) as u64 > self.max_response_bytes {
                return Err(self.too_large(site));
            }
            body.extend_from_slice(&chunk);
        }

        let works = workfind_schema::parse_slice(&body, site)?;
        debug!(works = works.len(), "source parsed");
        Ok(works)
    }

    /// Fetch every source concurrently and merge the results.
    ///
    /// Never fails as a whole: each failing source is logged and recorded by
    /// name in [`FetchResults::fetch_fails`].
    pub async fn fetch_all(&self, sources: &[SourceDescriptor]) -> FetchResults {
        self.fetch_all_with_progress(sources, &SilentProgress).await
    }

    /// [`fetch_all`](Self::fetch_all) with a progress observer.
    #[instrument(skip_all, fields(sources = sources.len()))]
    pub async fn fetch_all_with_progress(
        &self,
        sources: &[SourceDescriptor],
        progress: &dyn FetchProgress,
    ) -> FetchResults {
        let total = sources.len();
        info!(total, "fetching sources");

        // Each future yields its own descriptor alongside the outcome, so a
        // failure is always attributed to the source that produced it.
        let mut pending: FuturesUnordered<_> = sources
            .iter()
            .map(|source| async move {
                progress.source_started(&source.name);
                (source, self.fetch_one(source).await)
            })
            .collect();

        let mut results = FetchResults::default();
        let mut completed = 0;

        while let Some((source, outcome)) = pending.next().await {
            completed += 1;
            match outcome {
                Ok(works) => {
                    progress.source_finished(&source.name, true, completed, total);
                    results.works.extend(works);
                }
                Err(e) => {
                    warn!(site = %source.name, error = %e, "source could not be loaded");
                    progress.source_finished(&source.name, false, completed, total);
                    results.fetch_fails.push(source.name.clone());
                }
            }
        }

        info!(
            works = results.works.len(),
            failed = results.fetch_fails.len(),
            "fetch complete"
        );

        results
    }

    fn too_large(&self, site: &str) -> WorkfindError {
        WorkfindError::TooLarge {
            site: site.to_string(),
            limit: self.max_response_bytes,
        }
    }
}
