//! Shared types, error model, and configuration for workfind.
//!
//! This crate is the foundation depended on by all other workfind crates.
//! It provides:
//! - [`WorkfindError`]: the unified error type
//! - Domain types ([`WorkRecord`], [`WorkType`], [`SourceDescriptor`])
//! - Configuration ([`AppConfig`], [`FetchConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, FetchConfig, config_dir, config_file_path, init_config, load_config,
    load_config_from,
};
pub use error::{Result, WorkfindError};
pub use types::{SourceDescriptor, UnknownWorkType, WorkRecord, WorkType};
