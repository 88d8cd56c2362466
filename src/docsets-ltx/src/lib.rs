//! # llms.txt + doc set generation for static sites
//!
//! Runs once after a static site has been rendered to HTML. It reads the rendered pages and
//! produces:
//!
//! - one text bundle per configured doc set: the selected pages, ordered by promote/demote
//!   rules, each reduced to its main content as simple Markdown (or only its heading outline)
//! - the generated part of `llms.txt`: the doc sets, every page grouped by path, notes and
//!   optional links, substituted into the `{generatedLLMS}` token of the site's own `llms.txt`
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use docsets_ltx::{DiskFiles, LlmsConfig, LlmsTxtPlugin, discover_pages};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LlmsConfig::from_json_file(Path::new("llms.config.json"))?;
//!     let plugin = LlmsTxtPlugin::new(config)?;
//!
//!     let dist = Path::new("dist");
//!     let pages = discover_pages(dist)?;
//!     let report = plugin.on_build_done(&pages, dist, &DiskFiles).await?;
//!     println!("{} doc sets written", report.doc_sets.len());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod docset;
pub mod driver;
pub mod errors;
pub mod extract;
pub mod index;
pub mod logging;
pub mod pages;
pub mod pattern;
pub mod ranker;
pub mod site_files;
pub mod text_utils;

// Public API re-exports
pub use config::{
    DEFAULT_MAIN_SELECTOR, DEFAULT_PAGE_SEPARATOR, DocSet, DocSetBuilder, LlmsConfig, LocalizedPrefix, OptionalLink,
};
pub use docset::{CompiledDocSet, DocSetSummary, build_doc_set};
pub use driver::{BuildReport, LLMS_TXT, LlmsTxtPlugin, PLACEHOLDER, render_template};
pub use errors::{DocSetError, Result};
pub use extract::{ExtractOptions, ExtractedEntry, PageMeta, extract_entry, get_page_meta};
pub use index::{PageGroup, build_index, sort_pages_for_index};
pub use logging::setup_logging;
pub use pages::{Page, discover_pages, load_pages_file, page_html_path, parse_pages};
pub use pattern::{PatternList, matches};
pub use ranker::{SortKey, collate_paths, rank, sort_paths};
pub use site_files::{DiskFiles, MemoryFiles, SiteFiles};
