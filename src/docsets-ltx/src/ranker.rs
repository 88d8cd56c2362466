//! Ordering of the pages inside a doc set.
//!
//! Editors bias the order with promote and demote glob lists: promoted pages go to the top
//! (the earlier the pattern, the higher), demoted pages go to the bottom no matter whether
//! they are promoted too. Everything else keeps the alphabetical order of its path.

use std::cmp::Ordering;

use crate::pattern::PatternList;

/// Total order key of a page: higher priority first, then path collation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub priority: usize,
    pub path: String,
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| collate_paths(&self.path, &other.path))
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Computes the sort key of a page path.
///
/// With `p` the index of the first matching promote pattern and `d` the index of the first
/// matching demote pattern:
///
/// - demoted: `priority = demote.len() - d - 1` (promotion is ignored)
/// - otherwise: `priority = demote.len() + (promote.len() - p)`, or `demote.len()` when not promoted
///
/// Every demoted page therefore ranks below every page that is not demoted.
pub fn rank(path: &str, promote: &PatternList, demote: &PatternList) -> SortKey {
    let priority = match demote.position(path) {
        Some(demoted) => demote.len() - demoted - 1,
        None => {
            let promotion = promote.position(path).map_or(0, |promoted| promote.len() - promoted);
            promotion + demote.len()
        }
    };

    SortKey {
        priority,
        path: path.to_string(),
    }
}

/// Sorts page paths by their rank, stable for equal keys.
pub fn sort_paths(paths: Vec<String>, promote: &PatternList, demote: &PatternList) -> Vec<String> {
    let mut keyed: Vec<SortKey> = paths.iter().map(|path| rank(path, promote, demote)).collect();
    keyed.sort();
    keyed.into_iter().map(|key| key.path).collect()
}

/// Compares two paths ignoring case first, so `/Zebra/` does not jump ahead of `/apple/`.
/// Paths differing only in case put lowercase first (`/a/` before `/A/`). Letters outside
/// ASCII compare by code point, so `/über/` follows `/zahn/`.
pub fn collate_paths(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| {
        a.chars()
            .map(|c| (c.is_uppercase(), c))
            .cmp(b.chars().map(|c| (c.is_uppercase(), c)))
    })
}
