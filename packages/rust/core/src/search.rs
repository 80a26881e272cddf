//! In-memory search index: merged works, facet metadata, and selection state.

use std::cmp::Ordering;

use tracing::{debug, info, instrument};
use workfind_fetcher::{FetchProgress, FetchResults, SilentProgress, SourceFetcher};
use workfind_shared::{SourceDescriptor, WorkRecord, WorkType};

use crate::normalize::normalize_string;

// ---------------------------------------------------------------------------
// Facets
// ---------------------------------------------------------------------------

/// Distinct site and type values, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub sites: Vec<String>,
    pub types: Vec<WorkType>,
}

// ---------------------------------------------------------------------------
// SearchState
// ---------------------------------------------------------------------------

/// The merged collection of one aggregation run plus the caller's current
/// selection and text query.
///
/// `works`, `meta` and `fetch_fails` are fixed at construction. Only the
/// selection and the query change afterwards, and [`filter_works`] always
/// starts again from the full collection.
///
/// [`filter_works`]: SearchState::filter_works
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    fetch_fails: Vec<String>,
    meta: Facets,
    selected: Facets,
    string_filter: String,
    works: Vec<WorkRecord>,
}

impl SearchState {
    /// An empty state for hosts that render before the first fetch resolves.
    pub fn placeholder() -> Self {
        Self::default()
    }

    /// Sort the fetched works and derive facets from them. Everything starts
    /// out selected.
    pub fn from_results(results: FetchResults) -> Self {
        let FetchResults {
            fetch_fails,
            mut works,
        } = results;
        sort_works(&mut works);

        let mut meta = Facets::default();
        for work in &works {
            if !meta.sites.contains(&work.site) {
                meta.sites.push(work.site.clone());
            }
            if !meta.types.contains(&work.work_type) {
                meta.types.push(work.work_type);
            }
        }

        debug!(
            works = works.len(),
            sites = meta.sites.len(),
            types = meta.types.len(),
            "search index built"
        );

        Self {
            fetch_fails,
            selected: meta.clone(),
            meta,
            string_filter: String::new(),
            works,
        }
    }

    /// Names of the sources that could not be loaded.
    pub fn fetch_fails(&self) -> &[String] {
        &self.fetch_fails
    }

    /// Every site and type present in the collection.
    pub fn meta(&self) -> &Facets {
        &self.meta
    }

    /// The sites and types currently enabled.
    pub fn selected(&self) -> &Facets {
        &self.selected
    }

    /// The raw free-text query.
    pub fn string_filter(&self) -> &str {
        &self.string_filter
    }

    /// All works, sorted, unfiltered.
    pub fn works(&self) -> &[WorkRecord] {
        &self.works
    }

    // -- mutation -----------------------------------------------------------

    pub fn set_string_filter(&mut self, query: impl Into<String>) {
        self.string_filter = query.into();
    }

    /// Enable or disable one site. Unknown sites are ignored.
    pub fn set_site_selected(&mut self, site: &str, enabled: bool) {
        if enabled {
            let selected = &self.selected.sites;
            self.selected.sites = self
                .meta
                .sites
                .iter()
                .filter(|s| s.as_str() == site || selected.contains(*s))
                .cloned()
                .collect();
        } else {
            self.selected.sites.retain(|s| s != site);
        }
    }

    /// Enable or disable one type. Types absent from the collection are ignored.
    pub fn set_type_selected(&mut self, work_type: WorkType, enabled: bool) {
        if enabled {
            let selected = &self.selected.types;
            self.selected.types = self
                .meta
                .types
                .iter()
                .filter(|t| **t == work_type || selected.contains(*t))
                .copied()
                .collect();
        } else {
            self.selected.types.retain(|t| *t != work_type);
        }
    }

    /// Enable exactly the given sites (those present in the collection).
    pub fn select_only_sites<I, S>(&mut self, sites: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let wanted: Vec<S> = sites.into_iter().collect();
        self.selected.sites = self
            .meta
            .sites
            .iter()
            .filter(|s| wanted.iter().any(|w| w.as_ref() == s.as_str()))
            .cloned()
            .collect();
    }

    /// Enable exactly the given types (those present in the collection).
    pub fn select_only_types(&mut self, types: impl IntoIterator<Item = WorkType>) {
        let wanted: Vec<WorkType> = types.into_iter().collect();
        self.selected.types = self
            .meta
            .types
            .iter()
            .filter(|t| wanted.contains(*t))
            .copied()
            .collect();
    }

    /// Re-enable every facet and clear the query.
    pub fn reset_selection(&mut self) {
        self.selected = self.meta.clone();
        self.string_filter.clear();
    }

    // -- query --------------------------------------------------------------

    /// The works that pass the current selection and query, in sort order.
    pub fn filter_works(&self) -> Vec<&WorkRecord> {
        let needle = normalize_string(&self.string_filter);
        let match_all = self.string_filter.is_empty();

        self.works
            .iter()
            .filter(|w| {
                self.selected.sites.contains(&w.site)
                    && self.selected.types.contains(&w.work_type)
                    && (match_all
                        || normalize_string(&w.name).contains(&needle)
                        || normalize_string(&w.description).contains(&needle))
            })
            .collect()
    }
}

/// Free-function form of [`SearchState::filter_works`].
pub fn filter_works(state: &SearchState) -> Vec<&WorkRecord> {
    state.filter_works()
}

// ---------------------------------------------------------------------------
// Sorting and construction
// ---------------------------------------------------------------------------

/// Newest first; works without a date go last. Stable, so ties keep their
/// incoming order.
pub fn sort_works(works: &mut [WorkRecord]) {
    works.sort_by(|a, b| match (&a.date, &b.date) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Fetch all sources and build the initial search state.
pub async fn build_index(fetcher: &SourceFetcher, sources: &[SourceDescriptor]) -> SearchState {
    build_index_with_progress(fetcher, sources, &SilentProgress).await
}

/// [`build_index`] with a progress observer for the fetch phase.
#[instrument(skip_all, fields(sources = sources.len()))]
pub async fn build_index_with_progress(
    fetcher: &SourceFetcher,
    sources: &[SourceDescriptor],
    progress: &dyn FetchProgress,
) -> SearchState {
    let results = fetcher.fetch_all_with_progress(sources, progress).await;
    let state = SearchState::from_results(results);
    info!(
        works = state.works.len(),
        failed = state.fetch_fails.len(),
        "index ready"
    );
    state
}
