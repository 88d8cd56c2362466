//! Configuration for llms.txt and doc set generation.
//!
//! The configuration is supplied by the host build as JSON with camelCase keys:
//!
//! ```json
//! {
//!   "site": "https://www.example.com",
//!   "title": "Example",
//!   "docSet": [
//!     {
//!       "title": "Complete site",
//!       "description": "All pages as text",
//!       "url": "/llms-full.txt",
//!       "include": ["**"],
//!       "promote": ["/"],
//!       "demote": ["/legal/**"]
//!     }
//!   ],
//!   "localizedPrefixes": [{ "prefix": "de", "label": "German Pages" }]
//! }
//! ```

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::{DocSetError, Result};

/// Separator placed between two pages of a bundle when none is configured.
pub const DEFAULT_PAGE_SEPARATOR: &str = "\n\n---\n\n";

/// Selector of the main content region when a doc set does not name one.
pub const DEFAULT_MAIN_SELECTOR: &str = "main";

/// Top-level configuration of the llms.txt generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmsConfig {
    /// Canonical base URL every generated link is resolved against
    pub site: String,
    /// Name of the site, used for the llms.txt template
    pub title: String,
    /// Short summary of the site, used for the llms.txt template
    pub description: Option<String>,
    /// Free text placed under the summary in the llms.txt template
    pub details: Option<String>,
    /// Links listed in the trailing "Optional" section
    #[serde(default)]
    pub optional_links: Vec<OptionalLink>,
    /// The doc sets to bundle, processed in order
    #[serde(default)]
    pub doc_set: Vec<DocSet>,
    /// Free text for the "Notes" section
    pub notes: Option<String>,
    /// Text placed between two pages of a bundle
    pub page_separator: Option<String>,
    /// First path segments holding localized content, listed after everything else
    #[serde(default)]
    pub localized_prefixes: Vec<LocalizedPrefix>,
}

/// An extra link for the "Optional" section of the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionalLink {
    pub label: String,
    pub url: String,
    pub description: Option<String>,
}

/// A first path segment that marks localized content, e.g. `de` shown as "German Pages".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedPrefix {
    pub prefix: String,
    pub label: String,
}

/// A named subset of the site's pages, bundled into a single text file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocSet {
    pub title: String,
    pub description: String,
    /// Output location of the bundle, relative to the output directory
    pub url: String,
    /// Glob patterns selecting the pages of this set
    pub include: Vec<String>,
    /// Glob patterns moving matching pages to the top, earliest first
    #[serde(default)]
    pub promote: Vec<String>,
    /// Glob patterns moving matching pages to the bottom
    #[serde(default)]
    pub demote: Vec<String>,
    /// Only keep the heading outline of each page
    #[serde(default)]
    pub only_structure: bool,
    /// CSS selector of the main content region (default: `main`)
    pub main_selector: Option<String>,
    /// CSS selectors removed from the main content before conversion
    #[serde(default)]
    pub ignore_selectors: Vec<String>,
}

impl LlmsConfig {
    /// Parses a JSON configuration and validates it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LlmsConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The configured separator, falling back to [`DEFAULT_PAGE_SEPARATOR`] when missing or empty.
    pub fn page_separator(&self) -> &str {
        match self.page_separator.as_deref() {
            Some(separator) if !separator.is_empty() => separator,
            _ => DEFAULT_PAGE_SEPARATOR,
        }
    }

    /// The canonical base URL of the site.
    pub fn site_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.site)?)
    }

    /// Checks the values that the pipeline cannot recover from.
    ///
    /// Glob patterns and selectors are checked when the doc sets are compiled.
    pub fn validate(&self) -> Result<()> {
        let site = self.site_url()?;

        for set in &self.doc_set {
            set.validate()?;
        }

        for link in &self.optional_links {
            if link.label.trim().is_empty() || link.url.trim().is_empty() {
                return Err(DocSetError::InvalidConfig(format!(
                    "Optional link needs a label and a url: {:?}",
                    link
                )));
            }
            site.join(&link.url)?;
        }

        for localized in &self.localized_prefixes {
            if localized.prefix.is_empty() || localized.prefix.contains('/') {
                return Err(DocSetError::InvalidConfig(format!(
                    "Localized prefix must be a single path segment: '{}'",
                    localized.prefix
                )));
            }
        }

        Ok(())
    }
}

impl DocSet {
    /// Creates a new builder for DocSet.
    pub fn builder() -> DocSetBuilder {
        DocSetBuilder::default()
    }

    /// The CSS selector of the main content region.
    pub fn main_selector(&self) -> &str {
        self.main_selector.as_deref().unwrap_or(DEFAULT_MAIN_SELECTOR)
    }

    /// Location of the bundle relative to the output directory.
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(self.url.trim_start_matches('/'))
    }

    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(DocSetError::InvalidConfig(format!(
                "Doc set with url '{}' has no title",
                self.url
            )));
        }

        if self.include.is_empty() {
            return Err(DocSetError::InvalidConfig(format!(
                "Doc set '{}' has no include patterns",
                self.title
            )));
        }

        let output = self.output_path();
        let escapes = output
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if self.url.trim().is_empty() || output.as_os_str().is_empty() || escapes {
            return Err(DocSetError::InvalidConfig(format!(
                "Doc set '{}' has an invalid output url: '{}'",
                self.title, self.url
            )));
        }

        Ok(())
    }
}

/// Builder for DocSet.
#[derive(Debug, Clone, Default)]
pub struct DocSetBuilder {
    title: String,
    description: String,
    url: String,
    include: Vec<String>,
    promote: Vec<String>,
    demote: Vec<String>,
    only_structure: bool,
    main_selector: Option<String>,
    ignore_selectors: Vec<String>,
}

impl DocSetBuilder {
    /// Sets the doc set title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the doc set description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the output url of the bundle.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Adds a path pattern to include.
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include.push(pattern.into());
        self
    }

    /// Adds a promote pattern, after the ones already added.
    pub fn promote(mut self, pattern: impl Into<String>) -> Self {
        self.promote.push(pattern.into());
        self
    }

    /// Adds a demote pattern, after the ones already added.
    pub fn demote(mut self, pattern: impl Into<String>) -> Self {
        self.demote.push(pattern.into());
        self
    }

    /// Only keep the heading outline of each page.
    pub fn only_structure(mut self, only_structure: bool) -> Self {
        self.only_structure = only_structure;
        self
    }

    /// Sets the CSS selector of the main content region.
    pub fn main_selector(mut self, selector: impl Into<String>) -> Self {
        self.main_selector = Some(selector.into());
        self
    }

    /// Adds a CSS selector to remove before conversion.
    pub fn ignore_selector(mut self, selector: impl Into<String>) -> Self {
        self.ignore_selectors.push(selector.into());
        self
    }

    /// Builds the DocSet.
    pub fn build(self) -> DocSet {
        DocSet {
            title: self.title,
            description: self.description,
            url: self.url,
            include: self.include,
            promote: self.promote,
            demote: self.demote,
            only_structure: self.only_structure,
            main_selector: self.main_selector,
            ignore_selectors: self.ignore_selectors,
        }
    }
}
