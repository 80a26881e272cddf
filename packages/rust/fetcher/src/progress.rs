//! Progress callbacks for [`SourceFetcher::fetch_all_with_progress`].
//!
//! [`SourceFetcher::fetch_all_with_progress`]: crate::SourceFetcher::fetch_all_with_progress

/// Observer notified as each source settles. Purely informational.
pub trait FetchProgress: Send + Sync {
    /// Called when a source's request is about to be sent.
    fn source_started(&self, name: &str);
    /// Called when a source settles, successfully or not.
    fn source_finished(&self, name: &str, ok: bool, completed: usize, total: usize);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl FetchProgress for SilentProgress {
    fn source_started(&self, _name: &str) {}
    fn source_finished(&self, _name: &str, _ok: bool, _completed: usize, _total: usize) {}
}
