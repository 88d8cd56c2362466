//! Error types for the doc set + llms.txt pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for doc set and llms.txt index generation.
///
/// Configuration variants are raised before any page is processed.
/// Per-page variants are recovered by skipping the page.
/// Placeholder and I/O variants abort the run.
#[derive(Debug, Error)]
pub enum DocSetError {
    /// Configuration is missing a required value or holds an unusable one
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file is not valid JSON for the expected shape
    #[error("Configuration parsing failed: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Glob pattern error
    #[error("Glob pattern error: {0}")]
    GlobError(#[from] globset::Error),

    /// CSS selector could not be parsed
    #[error("Invalid CSS selector: '{0}'")]
    InvalidSelector(String),

    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    UrlParseError(#[from] url::ParseError),

    /// The main-content selector matched nothing in a page
    #[error("Missing main selector <{0}>")]
    MissingMainContent(String),

    /// The pre-existing llms.txt holding the placeholder token does not exist
    #[error("Placeholder file does not exist: {}", .0.display())]
    PlaceholderMissing(PathBuf),

    /// Walking the rendered output directory for pages failed
    #[error("Page discovery failed: {0}")]
    PageDiscovery(String),

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Result with DocSetError
pub type Result<T> = std::result::Result<T, DocSetError>;
