//! The post-build hook: runs every doc set, assembles the index and fills in llms.txt.

use std::path::{Path, PathBuf};

use url::Url;

use crate::config::LlmsConfig;
use crate::docset::{CompiledDocSet, DocSetSummary, build_doc_set};
use crate::errors::{DocSetError, Result};
use crate::index::build_index;
use crate::pages::Page;
use crate::site_files::SiteFiles;

/// Name of the index file in the root of the output directory.
pub const LLMS_TXT: &str = "llms.txt";

/// Token in llms.txt that is replaced by the generated index.
pub const PLACEHOLDER: &str = "{generatedLLMS}";

/// What one run of the plugin produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub doc_sets: Vec<DocSetSummary>,
    pub index_path: PathBuf,
    pub index: String,
}

/// The llms.txt generator, configured once and invoked after the site build has finished.
#[derive(Debug, Clone)]
pub struct LlmsTxtPlugin {
    config: LlmsConfig,
    site: Url,
    doc_sets: Vec<CompiledDocSet>,
}

impl LlmsTxtPlugin {
    /// Validates the configuration and compiles the patterns and selectors of every doc set.
    ///
    /// # Errors
    ///
    /// Returns a configuration error before any page is touched.
    pub fn new(config: LlmsConfig) -> Result<Self> {
        config.validate()?;
        let site = config.site_url()?;
        let doc_sets = config
            .doc_set
            .iter()
            .cloned()
            .map(CompiledDocSet::new)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            config,
            site,
            doc_sets,
        })
    }

    pub fn config(&self) -> &LlmsConfig {
        &self.config
    }

    /// Runs the pipeline over the rendered site.
    ///
    /// Writes one bundle per doc set, then replaces the first [`PLACEHOLDER`] in
    /// `<dist_dir>/llms.txt` with the generated index. Pages that are absent or fail to extract
    /// are skipped. A doc set whose bundle cannot be written is left out of the index.
    ///
    /// # Errors
    ///
    /// Fails when llms.txt is missing, unreadable or cannot be rewritten.
    pub async fn on_build_done<F: SiteFiles + ?Sized>(
        &self,
        pages: &[Page],
        dist_dir: &Path,
        files: &F,
    ) -> Result<BuildReport> {
        let page_separator = self.config.page_separator();
        tracing::info!(
            "Generating llms.txt for {} pages and {} doc sets",
            pages.len(),
            self.doc_sets.len()
        );

        let mut summaries = Vec::with_capacity(self.doc_sets.len());
        for doc_set in &self.doc_sets {
            match build_doc_set(doc_set, pages, dist_dir, &self.site, page_separator, files).await {
                Ok(summary) => summaries.push(summary),
                Err(error) => {
                    tracing::warn!("[SKIP] Doc set '{}' not generated: {}", doc_set.set.title, error);
                }
            }
        }

        let index = build_index(&self.config, &summaries, pages, dist_dir, files).await?;

        let index_path = dist_dir.join(LLMS_TXT);
        let template = files
            .read_file(&index_path)
            .await?
            .ok_or_else(|| DocSetError::PlaceholderMissing(index_path.clone()))?;

        if !template.contains(PLACEHOLDER) {
            tracing::warn!("{} has no {} placeholder, leaving it unchanged", index_path.display(), PLACEHOLDER);
        }
        let llms_txt = template.replacen(PLACEHOLDER, &index, 1);
        files.write_file(&index_path, &llms_txt).await?;
        tracing::info!("llms.txt generated at {}", index_path.display());

        Ok(BuildReport {
            doc_sets: summaries,
            index_path,
            index,
        })
    }
}

/// A starter llms.txt for the configuration: title, summary, details and the placeholder.
///
/// # Examples
///
/// ```
/// # use docsets_ltx::{render_template, LlmsConfig};
/// let config = LlmsConfig::from_json_str(
///     r#"{ "site": "https://example.com", "title": "Example", "description": "A site" }"#,
/// ).unwrap();
/// assert_eq!(render_template(&config), "# Example\n\n> A site\n\n{generatedLLMS}\n");
/// ```
pub fn render_template(config: &LlmsConfig) -> String {
    let mut blocks = vec![format!("# {}", config.title.trim())];
    if let Some(description) = config.description.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        blocks.push(format!("> {}", description));
    }
    if let Some(details) = config.details.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        blocks.push(details.to_string());
    }
    blocks.push(PLACEHOLDER.to_string());
    format!("{}\n", blocks.join("\n\n"))
}
