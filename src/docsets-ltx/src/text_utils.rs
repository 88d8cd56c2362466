//! Text manipulation utilities.

use std::sync::LazyLock;

use regex::Regex;

static BLANK_LINE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n[ \t]*(\n[ \t]*)+\n").unwrap());

/// Upper-cases the first character of every space separated word, leaving the rest untouched.
///
/// # Examples
///
/// ```
/// # use docsets_ltx::text_utils::capitalize_words;
/// assert_eq!(capitalize_words("herz ultraschall"), "Herz Ultraschall");
/// assert_eq!(capitalize_words("German Pages"), "German Pages");
/// assert_eq!(capitalize_words("eKG"), "EKG");
/// ```
pub fn capitalize_words(s: &str) -> String {
    s.split(' ').map(capitalize_first).collect::<Vec<_>>().join(" ")
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Turns a path segment into a heading label: `-` become spaces, then every word is capitalized.
///
/// # Examples
///
/// ```
/// # use docsets_ltx::text_utils::segment_heading;
/// assert_eq!(segment_heading("herz-kreislauf"), "Herz Kreislauf");
/// ```
pub fn segment_heading(segment: &str) -> String {
    capitalize_words(&segment.split('-').collect::<Vec<_>>().join(" "))
}

/// Collapses all whitespace runs to single spaces and trims the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reduces every run of blank lines to exactly one blank line and trims the ends.
pub fn collapse_blank_lines(s: &str) -> String {
    BLANK_LINE_RUNS.replace_all(s, "\n\n").trim().to_string()
}
