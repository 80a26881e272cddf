//! Search index and text normalization for workfind.
//!
//! This crate ties the fetcher's merged output into a queryable
//! [`SearchState`]: date-sorted works, site/type facets, the caller's
//! selection, and free-text filtering.

pub mod normalize;
pub mod search;

pub use normalize::normalize_string;
pub use search::{
    Facets, SearchState, build_index, build_index_with_progress, filter_works, sort_works,
};
