//! Assembling the llms.txt index: doc sets, grouped pages, notes and optional links.

use std::path::Path;

use url::Url;

use crate::config::{LlmsConfig, LocalizedPrefix};
use crate::docset::DocSetSummary;
use crate::errors::Result;
use crate::extract::get_page_meta;
use crate::pages::{Page, page_html_path};
use crate::site_files::SiteFiles;
use crate::text_utils::segment_heading;

/// The group a page is listed under, derived from its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageGroup {
    /// 0 for regular content, 1 + position in the configuration for localized content
    pub locale_rank: usize,
    /// All path segments but the last, joined by `/`, with a localized prefix replaced by its label
    pub title: String,
}

impl PageGroup {
    /// Computes the group of a page path.
    ///
    /// # Examples
    ///
    /// ```
    /// # use docsets_ltx::{LocalizedPrefix, PageGroup};
    /// let de = [LocalizedPrefix { prefix: "de".into(), label: "German Pages".into() }];
    /// assert_eq!(PageGroup::of("/leistungen/herz/", &de).title, "leistungen");
    /// assert_eq!(PageGroup::of("/de/leistungen/herz/", &de).title, "German Pages/leistungen");
    /// assert_eq!(PageGroup::of("/about/", &de).title, "");
    /// ```
    pub fn of(pathname: &str, localized: &[LocalizedPrefix]) -> Self {
        let segments: Vec<&str> = pathname.split('/').filter(|s| !s.is_empty()).collect();
        let mut group: Vec<&str> = segments[..segments.len().saturating_sub(1)].to_vec();

        let mut locale_rank = 0;
        let localized_at = group
            .first()
            .and_then(|first| localized.iter().position(|l| l.prefix == *first));
        if let Some(position) = localized_at {
            locale_rank = position + 1;
            group[0] = localized[position].label.as_str();
        }

        Self {
            locale_rank,
            title: group.join("/"),
        }
    }

    /// The Markdown heading opening this group: deeper groups get deeper headings.
    pub fn heading(&self) -> String {
        let parts: Vec<&str> = self.title.split('/').collect();
        let last = parts.last().copied().unwrap_or_default();
        format!("##{} {}", "#".repeat(parts.len()), segment_heading(last))
    }
}

/// Orders pages by group (non-localized groups first) and then by path.
pub fn sort_pages_for_index<'a>(pages: &'a [Page], localized: &[LocalizedPrefix]) -> Vec<(PageGroup, &'a Page)> {
    let mut grouped: Vec<(PageGroup, &Page)> = pages
        .iter()
        .map(|page| (PageGroup::of(&page.pathname, localized), page))
        .collect();

    grouped.sort_by(|(group_a, page_a), (group_b, page_b)| {
        group_a
            .locale_rank
            .cmp(&group_b.locale_rank)
            .then_with(|| group_a.title.cmp(&group_b.title))
            .then_with(|| page_a.pathname.cmp(&page_b.pathname))
    });
    grouped
}

/// Builds the generated part of llms.txt.
///
/// Sections, in order, each present only when it has content:
///
/// 1. `## Documentation Sets`: one line per doc set summary
/// 2. `## Pages`: every page with a readable HTML file, under headings derived from its path;
///    title and description come from the page's `<meta>` tags
/// 3. `## Notes`: the configured notes
/// 4. `## Optional`: the configured optional links
///
/// # Errors
///
/// Returns an error if the site URL cannot be parsed or a page path cannot be resolved against it.
pub async fn build_index<F: SiteFiles + ?Sized>(
    config: &LlmsConfig,
    doc_sets: &[DocSetSummary],
    pages: &[Page],
    dist_dir: &Path,
    files: &F,
) -> Result<String> {
    let site = config.site_url()?;
    let mut lines: Vec<String> = Vec::new();

    if !doc_sets.is_empty() {
        let listing: Vec<String> = doc_sets.iter().map(DocSetSummary::index_line).collect();
        lines.push(format!("## Documentation Sets\n\n{}", listing.join("\n")));
    }

    if !pages.is_empty() {
        lines.push("\n## Pages\n".to_string());
        lines.extend(page_lines(&site, config, pages, dist_dir, files).await?);
    }

    if let Some(notes) = config.notes.as_deref().filter(|notes| !notes.is_empty()) {
        lines.push(format!("\n## Notes\n\n{}", notes));
    }

    if !config.optional_links.is_empty() {
        let mut links: Vec<String> = Vec::with_capacity(config.optional_links.len());
        for link in &config.optional_links {
            let url = site.join(&link.url)?;
            links.push(match link.description.as_deref().filter(|d| !d.is_empty()) {
                Some(description) => format!("- [{}]({}): {}", link.label, url, description),
                None => format!("- [{}]({})", link.label, url),
            });
        }
        lines.push(format!("\n## Optional\n\n{}", links.join("\n")));
    }

    lines.retain(|line| !line.is_empty());
    Ok(lines.join("\n"))
}

async fn page_lines<F: SiteFiles + ?Sized>(
    site: &Url,
    config: &LlmsConfig,
    pages: &[Page],
    dist_dir: &Path,
    files: &F,
) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut previous_group = String::new();

    for (group, page) in sort_pages_for_index(pages, &config.localized_prefixes) {
        let html_path = page_html_path(dist_dir, &page.pathname);
        let html = match files.read_file(&html_path).await {
            Ok(Some(html)) => html,
            Ok(None) => {
                tracing::debug!("[SKIP] Index: no HTML for '{}'", page.pathname);
                continue;
            }
            Err(error) => {
                tracing::warn!("[SKIP] Index: cannot read '{}': {}", page.pathname, error);
                continue;
            }
        };
        let meta = get_page_meta(&html);

        if group.title != previous_group {
            lines.push(format!("\n{}\n", group.heading()));
            previous_group = group.title.clone();
        }

        let title = meta.title.unwrap_or_else(|| page.pathname.clone());
        let url = site.join(&page.pathname)?;
        lines.push(match meta.description {
            Some(description) => format!("- [{}]({}): {}", title, url, description),
            None => format!("- [{}]({})", title, url),
        });
    }

    Ok(lines)
}
