//! Core domain types for workfind.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// WorkType
// ---------------------------------------------------------------------------

/// The Schema.org content types that become work records.
///
/// Serializes as the verbatim Schema.org `@type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkType {
    Article,
    BlogPosting,
    ImageGallery,
    Recipe,
    TechArticle,
    WebPage,
}

impl WorkType {
    /// Every recognized type, in declaration order.
    pub const ALL: [WorkType; 6] = [
        WorkType::Article,
        WorkType::BlogPosting,
        WorkType::ImageGallery,
        WorkType::Recipe,
        WorkType::TechArticle,
        WorkType::WebPage,
    ];

    /// The Schema.org tag for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            WorkType::Article => "Article",
            WorkType::BlogPosting => "BlogPosting",
            WorkType::ImageGallery => "ImageGallery",
            WorkType::Recipe => "Recipe",
            WorkType::TechArticle => "TechArticle",
            WorkType::WebPage => "WebPage",
        }
    }
}

impl std::fmt::Display for WorkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Returned when a tag is outside the recognized vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized work type: {0}")]
pub struct UnknownWorkType(pub String);

impl std::str::FromStr for WorkType {
    type Err = UnknownWorkType;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        WorkType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownWorkType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// WorkRecord
// ---------------------------------------------------------------------------

/// One normalized content item extracted from a source's Schema.org data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkRecord {
    /// Display title (entity-decoded headline or name).
    pub name: String,
    /// Entity-decoded description; empty when the source has none.
    #[serde(default)]
    pub description: String,
    /// `datePublished`, verbatim. `None` means unknown publish date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Image URL, verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Canonical URL of the work.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Schema.org type the record was built from.
    #[serde(rename = "type")]
    pub work_type: WorkType,
    /// Name of the source this record came from.
    pub site: String,
}

impl WorkRecord {
    /// Best-effort calendar date for display.
    ///
    /// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates. Sorting and
    /// filtering never use this; they work on the raw `date` text.
    pub fn published(&self) -> Option<NaiveDate> {
        let raw = self.date.as_deref()?.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.date_naive())
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
            .ok()
    }
}

// ---------------------------------------------------------------------------
// SourceDescriptor
// ---------------------------------------------------------------------------

/// A named remote feed of Schema.org JSON.
///
/// `name` doubles as the facet key, so it should be unique within one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    /// Display label and facet key.
    pub name: String,
    /// Where to GET the JSON document.
    pub url: String,
}

impl SourceDescriptor {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}
