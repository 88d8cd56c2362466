//! Building the text bundle of one doc set.

use std::path::Path;

use url::Url;

use crate::config::DocSet;
use crate::errors::Result;
use crate::extract::{ExtractOptions, extract_entry};
use crate::pages::{Page, page_html_path};
use crate::pattern::PatternList;
use crate::ranker::sort_paths;
use crate::site_files::SiteFiles;

/// A doc set with its patterns and selectors compiled.
#[derive(Debug, Clone)]
pub struct CompiledDocSet {
    pub set: DocSet,
    pub include: PatternList,
    pub promote: PatternList,
    pub demote: PatternList,
    pub extract: ExtractOptions,
}

impl CompiledDocSet {
    /// Compiles the glob patterns and CSS selectors of a doc set.
    ///
    /// # Errors
    ///
    /// Returns an error if any pattern or selector is invalid.
    pub fn new(set: DocSet) -> Result<Self> {
        Ok(Self {
            include: PatternList::new(&set.include)?,
            promote: PatternList::new(&set.promote)?,
            demote: PatternList::new(&set.demote)?,
            extract: ExtractOptions::for_doc_set(&set)?,
            set,
        })
    }

    /// The paths of the pages in this set, in bundle order.
    pub fn select_pages(&self, pages: &[Page]) -> Vec<String> {
        let included: Vec<String> = pages
            .iter()
            .map(|page| page.pathname.clone())
            .filter(|pathname| self.include.is_match(pathname))
            .collect();
        sort_paths(included, &self.promote, &self.demote)
    }
}

/// What building one doc set produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocSetSummary {
    pub title: String,
    pub description: String,
    /// The bundle's url, resolved against the site
    pub url: Url,
    /// Pages extracted into the bundle
    pub pages_written: usize,
    /// Pages that matched but were absent or failed to extract
    pub pages_skipped: usize,
}

impl DocSetSummary {
    /// The line listing this doc set in the index.
    pub fn index_line(&self) -> String {
        format!("- [{}]({}): {}", self.title, self.url, self.description)
    }
}

/// Builds the bundle of a doc set and writes it to the set's url under the output directory.
///
/// Pages are selected by the include patterns, ordered by promote/demote rank and extracted one
/// by one. A page whose HTML file is absent, unreadable or fails to extract is left out of the
/// bundle; when no page survives, the bundle is empty.
///
/// # Errors
///
/// Returns an error if the bundle cannot be written or its url cannot be resolved.
pub async fn build_doc_set<F: SiteFiles + ?Sized>(
    doc_set: &CompiledDocSet,
    pages: &[Page],
    dist_dir: &Path,
    site: &Url,
    page_separator: &str,
    files: &F,
) -> Result<DocSetSummary> {
    let set = &doc_set.set;
    let selected = doc_set.select_pages(pages);
    tracing::debug!("Doc set '{}': {} of {} pages selected", set.title, selected.len(), pages.len());

    let mut entries: Vec<String> = Vec::with_capacity(selected.len());
    let mut pages_skipped = 0;

    for pathname in &selected {
        let html_path = page_html_path(dist_dir, pathname);

        let html = match files.read_file(&html_path).await {
            Ok(Some(html)) => html,
            Ok(None) => {
                tracing::debug!("[SKIP] No HTML for '{}' at {}", pathname, html_path.display());
                pages_skipped += 1;
                continue;
            }
            Err(error) => {
                tracing::warn!("[SKIP] Cannot read '{}' at {}: {}", pathname, html_path.display(), error);
                pages_skipped += 1;
                continue;
            }
        };

        match extract_entry(&html, &doc_set.extract) {
            Ok(entry) => entries.push(entry.to_string()),
            Err(error) => {
                tracing::warn!("[SKIP] Cannot extract '{}' for doc set '{}': {}", pathname, set.title, error);
                pages_skipped += 1;
            }
        }
    }

    let out_path = dist_dir.join(set.output_path());
    let content = entries.join(page_separator);
    files.write_file(&out_path, &content).await?;

    tracing::info!(
        "Doc set '{}' generated at {} ({} pages, {} skipped)",
        set.title,
        out_path.display(),
        entries.len(),
        pages_skipped
    );

    Ok(DocSetSummary {
        title: set.title.clone(),
        description: set.description.clone(),
        url: site.join(&set.url)?,
        pages_written: entries.len(),
        pages_skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PAGE_SEPARATOR;
    use crate::site_files::MemoryFiles;

    fn page_html(title: &str, text: &str) -> String {
        format!("<html><body><main><h1>{title}</h1><p>{text}</p></main></body></html>")
    }

    fn site() -> Url {
        Url::parse("https://www.example.com").unwrap()
    }

    fn pages(paths: &[&str]) -> Vec<Page> {
        paths.iter().map(|p| Page::new(*p)).collect()
    }

    #[test]
    fn test_select_pages_filters_and_orders() {
        let set = DocSet::builder()
            .title("Docs")
            .url("/docs.txt")
            .include("**")
            .promote("/")
            .build();
        let compiled = CompiledDocSet::new(set).unwrap();

        let order = compiled.select_pages(&pages(&["/b/", "/a/", "/"]));
        assert_eq!(order, vec!["/", "/a/", "/b/"]);

        let set = DocSet::builder()
            .title("Services")
            .url("/services.txt")
            .include("/services/**")
            .build();
        let compiled = CompiledDocSet::new(set).unwrap();
        assert_eq!(
            compiled.select_pages(&pages(&["/", "/services/b/", "/about/", "/services/a/"])),
            vec!["/services/a/", "/services/b/"]
        );
    }

    #[test]
    fn test_invalid_pattern_fails_compilation() {
        let set = DocSet::builder().title("X").url("/x.txt").include("[").build();
        assert!(CompiledDocSet::new(set).is_err());
    }

    #[tokio::test]
    async fn test_build_doc_set_writes_bundle() {
        let files = MemoryFiles::with_files([
            ("dist/index.html", page_html("Home", "Welcome")),
            ("dist/about/index.html", page_html("About", "Who we are")),
        ]);
        let set = DocSet::builder()
            .title("All")
            .description("Every page")
            .url("/bundles/all.txt")
            .include("**")
            .promote("/")
            .build();
        let compiled = CompiledDocSet::new(set).unwrap();

        let summary = build_doc_set(
            &compiled,
            &pages(&["/about/", "/"]),
            Path::new("dist"),
            &site(),
            DEFAULT_PAGE_SEPARATOR,
            &files,
        )
        .await
        .unwrap();

        assert_eq!(
            files.get("dist/bundles/all.txt").unwrap(),
            "# Home\n\nWelcome\n\n---\n\n# About\n\nWho we are"
        );
        assert_eq!(summary.pages_written, 2);
        assert_eq!(summary.pages_skipped, 0);
        assert_eq!(
            summary.index_line(),
            "- [All](https://www.example.com/bundles/all.txt): Every page"
        );
    }

    #[tokio::test]
    async fn test_failing_pages_are_skipped() {
        let files = MemoryFiles::with_files([
            ("dist/broken/index.html", "<html><body><div>no main</div></body></html>".to_string()),
            ("dist/ok/index.html", page_html("Ok", "Fine")),
        ]);
        let set = DocSet::builder().title("S").url("/s.txt").include("**").build();
        let compiled = CompiledDocSet::new(set).unwrap();

        let summary = build_doc_set(
            &compiled,
            &pages(&["/broken/", "/missing/", "/ok/"]),
            Path::new("dist"),
            &site(),
            "\n===\n",
            &files,
        )
        .await
        .unwrap();

        assert_eq!(files.get("dist/s.txt").unwrap(), "# Ok\n\nFine");
        assert_eq!(summary.pages_written, 1);
        assert_eq!(summary.pages_skipped, 2);
    }

    #[tokio::test]
    async fn test_all_pages_failing_gives_empty_bundle() {
        let files = MemoryFiles::with_files([("dist/a/index.html", "<p>no main</p>")]);
        let set = DocSet::builder().title("S").url("/s.txt").include("**").build();
        let compiled = CompiledDocSet::new(set).unwrap();

        let summary = build_doc_set(
            &compiled,
            &pages(&["/a/", "/b/"]),
            Path::new("dist"),
            &site(),
            DEFAULT_PAGE_SEPARATOR,
            &files,
        )
        .await
        .unwrap();

        assert_eq!(files.get("dist/s.txt"), Some(String::new()));
        assert_eq!(summary.pages_written, 0);
    }
}
