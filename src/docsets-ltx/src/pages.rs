//! The pages of a built site.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{DocSetError, Result};

/// A rendered page, identified by its site-relative path (e.g. `/`, `/services/heart/`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Page {
    pub pathname: String,
}

impl Page {
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
        }
    }
}

impl From<&str> for Page {
    fn from(pathname: &str) -> Self {
        Page::new(pathname)
    }
}

/// Where the rendered HTML of a page lives: `<dist>/<path>/index.html`.
///
/// # Examples
///
/// ```
/// # use std::path::{Path, PathBuf};
/// # use docsets_ltx::page_html_path;
/// assert_eq!(page_html_path(Path::new("dist"), "/"), PathBuf::from("dist/index.html"));
/// assert_eq!(page_html_path(Path::new("dist"), "/a/b/"), PathBuf::from("dist/a/b/index.html"));
/// ```
pub fn page_html_path(dist_dir: &Path, pathname: &str) -> PathBuf {
    let relative = pathname.trim_matches('/');
    if relative.is_empty() {
        dist_dir.join("index.html")
    } else {
        dist_dir.join(relative).join("index.html")
    }
}

/// A page list entry: either a bare path or an object with a `pathname`.
#[derive(Deserialize)]
#[serde(untagged)]
enum PageEntry {
    Path(String),
    Object(Page),
}

/// Parses a JSON page list: `["/", "/about/"]` or `[{ "pathname": "/" }]`, or a mix.
pub fn parse_pages(json: &str) -> Result<Vec<Page>> {
    let entries: Vec<PageEntry> = serde_json::from_str(json)?;
    Ok(entries
        .into_iter()
        .map(|entry| match entry {
            PageEntry::Path(pathname) => Page::new(pathname),
            PageEntry::Object(page) => page,
        })
        .collect())
}

/// Reads a JSON page list file.
pub fn load_pages_file(path: &Path) -> Result<Vec<Page>> {
    let json = std::fs::read_to_string(path)?;
    parse_pages(&json)
}

/// Finds every page of a rendered output directory: each `index.html` below it is one page.
///
/// Pages are returned sorted by path.
pub fn discover_pages(dist_dir: &Path) -> Result<Vec<Page>> {
    let pattern = format!(
        "{}/**/index.html",
        glob::Pattern::escape(&dist_dir.to_string_lossy())
    );
    let paths = glob::glob(&pattern).map_err(|e| DocSetError::PageDiscovery(e.to_string()))?;

    let mut pages = Vec::new();
    for entry in paths {
        let html_path = entry.map_err(|e| DocSetError::PageDiscovery(e.to_string()))?;
        let Some(directory) = html_path.parent() else {
            continue;
        };
        let Ok(relative) = directory.strip_prefix(dist_dir) else {
            continue;
        };

        let segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let pathname = if segments.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", segments.join("/"))
        };
        pages.push(Page::new(pathname));
    }

    pages.sort_by(|a, b| a.pathname.cmp(&b.pathname));
    pages.dedup();
    tracing::debug!("Discovered {} pages in {}", pages.len(), dist_dir.display());
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_html_path() {
        let dist = Path::new("/srv/dist");
        assert_eq!(page_html_path(dist, "/"), PathBuf::from("/srv/dist/index.html"));
        assert_eq!(page_html_path(dist, ""), PathBuf::from("/srv/dist/index.html"));
        assert_eq!(page_html_path(dist, "/de/herz/"), PathBuf::from("/srv/dist/de/herz/index.html"));
        assert_eq!(page_html_path(dist, "/de/herz"), PathBuf::from("/srv/dist/de/herz/index.html"));
    }

    #[test]
    fn test_parse_pages() {
        let pages = parse_pages(r#"["/", { "pathname": "/about/" }]"#).unwrap();
        assert_eq!(pages, vec![Page::new("/"), Page::new("/about/")]);

        assert!(parse_pages(r#"{ "pathname": "/" }"#).is_err());
    }

    #[test]
    fn test_discover_pages() {
        let dir = tempfile::tempdir().unwrap();
        for page in ["", "about", "de/herz", "de/herz/echo"] {
            let directory = dir.path().join(page);
            std::fs::create_dir_all(&directory).unwrap();
            std::fs::write(directory.join("index.html"), "<main></main>").unwrap();
        }
        std::fs::write(dir.path().join("about/other.html"), "").unwrap();
        std::fs::write(dir.path().join("llms.txt"), "").unwrap();

        let pages = discover_pages(dir.path()).unwrap();
        let paths: Vec<&str> = pages.iter().map(|p| p.pathname.as_str()).collect();
        assert_eq!(paths, vec!["/", "/about/", "/de/herz/", "/de/herz/echo/"]);
    }
}
