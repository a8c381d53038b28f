//! Slug generation for section filenames.

use crate::domain::SECTION_SEP;

/// Converts a section name to the slug used in its filename.
///
/// - Trims surrounding whitespace
/// - Removes the index separator (`_`) so the index prefix stays unambiguous
/// - Removes path separators (`/` and `\`)
/// - Keeps everything else, including spaces and case
/// - Returns "untitled" for empty results
///
/// Words are not re-separated: the title recovered from a filename is the
/// slug with separators dropped, so `Related_Work` comes back as `RelatedWork`.
///
/// # Examples
///
/// ```
/// use doctor::infra::section_slug;
///
/// assert_eq!(section_slug("Related Work"), "Related Work");
/// assert_eq!(section_slug("Related_Work"), "RelatedWork");
/// assert_eq!(section_slug("  "), "untitled");
/// ```
pub fn section_slug(name: &str) -> String {
    let slug: String = name
        .trim()
        .chars()
        .filter(|&c| c != SECTION_SEP && c != '/' && c != '\\')
        .collect();
    let slug = slug.trim();

    if slug.is_empty() {
        return "untitled".to_string();
    }
    slug.to_string()
}

/// Returns `s` with its first character upper-cased.
///
/// # Examples
///
/// ```
/// use doctor::infra::capitalize_first;
///
/// assert_eq!(capitalize_first("method"), "Method");
/// assert_eq!(capitalize_first("état"), "État");
/// assert_eq!(capitalize_first(""), "");
/// ```
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
