//! HTML parsing utilities for turning a rendered page into a doc set entry.

use std::fmt;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::config::DocSet;
use crate::errors::{DocSetError, Result};
use crate::text_utils::{collapse_blank_lines, collapse_whitespace};

/// Title of an entry whose main content has no `<h1>`.
pub const UNTITLED: &str = "Untitled";

/// Removed from the main content of every page, before the configured ignore selectors.
/// The `<h1>` becomes the entry title, the rest is page chrome.
pub const ALWAYS_IGNORED: [&str; 5] = ["h1", "header", "footer", "script", "style"];

static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());
static HEADINGS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").unwrap());
static META_TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(r#"meta[name="title"]"#).unwrap());
static META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="description"]"#).unwrap());

/// How to turn the pages of one doc set into entries.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    main_source: String,
    main: Selector,
    ignore: Vec<Selector>,
    only_structure: bool,
}

impl ExtractOptions {
    /// Parses the main-content selector and the ignore selectors.
    ///
    /// # Errors
    ///
    /// Returns [`DocSetError::InvalidSelector`] for the first selector that does not parse.
    pub fn new<S: AsRef<str>>(main_selector: &str, ignore_selectors: &[S], only_structure: bool) -> Result<Self> {
        let main = parse_selector(main_selector)?;
        let ignore = ALWAYS_IGNORED
            .iter()
            .copied()
            .chain(ignore_selectors.iter().map(|selector| selector.as_ref()))
            .map(parse_selector)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            main_source: main_selector.to_string(),
            main,
            ignore,
            only_structure,
        })
    }

    /// The extraction settings of a doc set.
    pub fn for_doc_set(set: &DocSet) -> Result<Self> {
        Self::new(set.main_selector(), set.ignore_selectors.as_slice(), set.only_structure)
    }

    pub fn only_structure(&self) -> bool {
        self.only_structure
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|_| DocSetError::InvalidSelector(selector.to_string()))
}

/// One page of a bundle: `# Title`, an optional `> description` and the converted body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedEntry {
    pub title: String,
    pub description: Option<String>,
    pub body: String,
}

impl fmt::Display for ExtractedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![format!("# {}", self.title)];
        if let Some(description) = &self.description {
            parts.push(format!("> {}", description));
        }
        if !self.body.is_empty() {
            parts.push(self.body.clone());
        }
        write!(f, "{}", parts.join("\n\n").trim())
    }
}

/// Extracts the doc set entry of a rendered page.
///
/// The main content element is located with the configured selector. Its first `<h1>` is the
/// title, `<meta name="description">` the description. Everything matching an ignore selector
/// is removed before the remaining markup is converted to Markdown, or reduced to its heading
/// outline when the options ask for structure only.
///
/// # Errors
///
/// Returns [`DocSetError::MissingMainContent`] if the main-content selector matches nothing.
///
/// # Examples
///
/// ```
/// # use docsets_ltx::{extract_entry, ExtractOptions};
/// let html = r#"<html><body><main><h1>Hello</h1><h2>Part</h2><p>Text</p></main></body></html>"#;
/// let options = ExtractOptions::new("main", &[] as &[&str], true).unwrap();
/// let entry = extract_entry(html, &options).unwrap();
/// assert_eq!(entry.to_string(), "# Hello\n\n## Part");
/// ```
pub fn extract_entry(html: &str, options: &ExtractOptions) -> Result<ExtractedEntry> {
    let mut document = Html::parse_document(html);

    let (main_id, title, doomed) = {
        let main = document
            .select(&options.main)
            .next()
            .ok_or_else(|| DocSetError::MissingMainContent(options.main_source.clone()))?;

        let title = main
            .select(&H1)
            .next()
            .map(|h1| collapse_whitespace(&h1.text().collect::<String>()))
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        let doomed: Vec<_> = options
            .ignore
            .iter()
            .flat_map(|selector| main.select(selector).map(|element| element.id()))
            .collect();

        (main.id(), title, doomed)
    };

    let description = meta_content(&document, &META_DESCRIPTION);

    for id in doomed {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    let main = document
        .tree
        .get(main_id)
        .and_then(ElementRef::wrap)
        .ok_or_else(|| DocSetError::MissingMainContent(options.main_source.clone()))?;

    let body = if options.only_structure {
        heading_outline(main)
    } else {
        to_markdown(main)
    };

    Ok(ExtractedEntry {
        title,
        description,
        body,
    })
}

/// Title and description a page declares in its `<meta>` tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMeta {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Reads `<meta name="title">` and `<meta name="description">`. Empty values count as missing.
///
/// # Examples
///
/// ```
/// # use docsets_ltx::get_page_meta;
/// let html = r#"<html><head><meta name="title" content="Home"></head></html>"#;
/// let meta = get_page_meta(html);
/// assert_eq!(meta.title, Some("Home".to_string()));
/// assert_eq!(meta.description, None);
/// ```
pub fn get_page_meta(html: &str) -> PageMeta {
    let document = Html::parse_document(html);
    PageMeta {
        title: meta_content(&document, &META_TITLE),
        description: meta_content(&document, &META_DESCRIPTION),
    }
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}

fn heading_outline(main: ElementRef<'_>) -> String {
    main.select(&HEADINGS)
        .filter_map(|heading| {
            let level: usize = heading.value().name()[1..].parse().ok()?;
            let text = collapse_whitespace(&heading.text().collect::<String>());
            (!text.is_empty()).then(|| format!("{} {}", "#".repeat(level), text))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn to_markdown(main: ElementRef<'_>) -> String {
    collapse_blank_lines(&html2md::parse_html(&main.inner_html()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const PAGE: &str = indoc! {r#"
        <html>
          <head>
            <meta name="title" content="Heart Ultrasound">
            <meta name="description" content="  Echocardiography at our practice  ">
          </head>
          <body>
            <header><nav>Site navigation</nav></header>
            <main>
              <header>Breadcrumbs</header>
              <h1>
                Heart   Ultrasound
              </h1>
              <p>An <em>echo</em> shows the <a href="/heart/">heart</a> at work.</p>
              <h2>Preparation</h2>
              <ul><li>Bring your referral</li><li>Wear loose clothing</li></ul>
              <aside class="cta">Book now!</aside>
              <h3>Duration</h3>
              <p>About 30 minutes.</p>
              <footer>Page footer</footer>
            </main>
            <footer>Site footer</footer>
          </body>
        </html>
    "#};

    fn options(ignore: &[&str], only_structure: bool) -> ExtractOptions {
        ExtractOptions::new("main", ignore, only_structure).unwrap()
    }

    #[test]
    fn test_extract_full_text() {
        let entry = extract_entry(PAGE, &options(&[".cta"], false)).unwrap();

        assert_eq!(entry.title, "Heart Ultrasound");
        assert_eq!(entry.description, Some("Echocardiography at our practice".to_string()));
        assert!(entry.body.contains("echo"));
        assert!(entry.body.contains("[heart](/heart/)"));
        assert!(entry.body.contains("Preparation"));
        assert!(entry.body.contains("Bring your referral"));
        assert!(entry.body.contains("About 30 minutes"));

        for removed in ["Book now!", "Breadcrumbs", "Page footer", "Site footer", "Site navigation"] {
            assert!(!entry.body.contains(removed), "'{removed}' should have been removed");
        }
        assert!(!entry.body.contains("Heart Ultrasound"), "the title is not repeated in the body");
    }

    #[test]
    fn test_rendered_entry_layout() {
        let entry = extract_entry(PAGE, &options(&[".cta"], false)).unwrap();
        let rendered = entry.to_string();
        assert!(rendered.starts_with("# Heart Ultrasound\n\n> Echocardiography at our practice\n\n"));
        assert_eq!(rendered, rendered.trim());
    }

    #[test]
    fn test_extract_only_structure() {
        let entry = extract_entry(PAGE, &options(&[], true)).unwrap();
        assert_eq!(entry.body, "## Preparation\n### Duration");
        assert_eq!(
            entry.to_string(),
            "# Heart Ultrasound\n\n> Echocardiography at our practice\n\n## Preparation\n### Duration"
        );
    }

    #[test]
    fn test_only_structure_respects_ignore_selectors() {
        let html = r#"<main><h1>T</h1><h2>Keep</h2><div class="toc"><h2>Drop</h2></div></main>"#;
        let entry = extract_entry(html, &options(&[".toc"], true)).unwrap();
        assert_eq!(entry.body, "## Keep");
    }

    #[test]
    fn test_untitled_without_h1() {
        let html = r#"<html><body><main><p>No heading here</p></main></body></html>"#;
        let entry = extract_entry(html, &options(&[], false)).unwrap();
        assert_eq!(entry.title, UNTITLED);
        assert_eq!(entry.description, None);
        assert!(entry.to_string().starts_with("# Untitled\n\nNo heading here"));
    }

    #[test]
    fn test_missing_main_selector() {
        let html = r#"<html><body><div><h1>Nope</h1></div></body></html>"#;
        let result = extract_entry(html, &options(&[], false));
        assert!(matches!(result, Err(DocSetError::MissingMainContent(sel)) if sel == "main"));
    }

    #[test]
    fn test_custom_main_selector() {
        let html = r#"<html><body><main>Chrome</main><article id="content"><h1>Doc</h1><p>Body</p></article></body></html>"#;
        let options = ExtractOptions::new("#content", &[] as &[&str], false).unwrap();
        let entry = extract_entry(html, &options).unwrap();
        assert_eq!(entry.title, "Doc");
        assert!(entry.body.contains("Body"));
        assert!(!entry.body.contains("Chrome"));
    }

    #[test]
    fn test_entry_without_body() {
        let html = r#"<main><h1>Only a title</h1></main>"#;
        let entry = extract_entry(html, &options(&[], false)).unwrap();
        assert_eq!(entry.to_string(), "# Only a title");
    }

    #[test]
    fn test_invalid_selector() {
        let result = ExtractOptions::new("main", &["div >"], false);
        assert!(matches!(result, Err(DocSetError::InvalidSelector(sel)) if sel == "div >"));
        assert!(ExtractOptions::new(">>", &[] as &[&str], false).is_err());
    }

    #[test]
    fn test_get_page_meta() {
        let meta = get_page_meta(PAGE);
        assert_eq!(meta.title, Some("Heart Ultrasound".to_string()));
        assert_eq!(meta.description, Some("Echocardiography at our practice".to_string()));

        let empty = get_page_meta(r#"<html><head><meta name="title" content="   "></head></html>"#);
        assert_eq!(empty, PageMeta::default());
    }
}
