//! Matching user queries against sections, and parsing interactive choices.

use std::fmt;

use super::Section;

/// Error returned when a query matches no section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionNotFound {
    query: String,
}

impl SectionNotFound {
    pub fn query(&self) -> &str {
        &self.query
    }
}

impl fmt::Display for SectionNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not find any sections matching '{}'", self.query)
    }
}

impl std::error::Error for SectionNotFound {}

/// Finds every section matching `query`.
///
/// A query that parses as an integer is an index: it matches sections whose
/// index equals `query - offset`. The offset accounts for sections removed
/// earlier in a batch, which shift the indices of everything after them.
/// Any other query is compared case-insensitively with the section titles.
///
/// Multiple matches are returned in the order of `sections`; picking one is
/// up to the caller.
///
/// # Errors
///
/// Returns `SectionNotFound` when nothing matches.
///
/// # Examples
///
/// ```
/// use doctor::domain::{Section, find_matches};
/// use std::path::PathBuf;
///
/// let sections = vec![
///     Section::new(PathBuf::from("00_Intro.md"), "Intro", 0),
///     Section::new(PathBuf::from("01_Method.md"), "Method", 1),
/// ];
///
/// assert_eq!(find_matches("method", &sections, 0).unwrap()[0].index(), 1);
/// assert_eq!(find_matches("2", &sections, 1).unwrap()[0].title(), "Method");
/// assert!(find_matches("Results", &sections, 0).is_err());
/// ```
pub fn find_matches<'a>(
    query: &str,
    sections: &'a [Section],
    offset: usize,
) -> Result<Vec<&'a Section>, SectionNotFound> {
    let trimmed = query.trim();

    let matches: Vec<&Section> = match trimmed.parse::<i64>() {
        Ok(index) => match i64::try_from(offset).ok().and_then(|o| index.checked_sub(o)) {
            Some(target) => sections
                .iter()
                .filter(|s| s.index() as i64 == target)
                .collect(),
            None => Vec::new(),
        },
        Err(_) => {
            let wanted = trimmed.to_lowercase();
            sections
                .iter()
                .filter(|s| s.title().to_lowercase() == wanted)
                .collect()
        }
    };

    if matches.is_empty() {
        return Err(SectionNotFound {
            query: query.to_string(),
        });
    }
    Ok(matches)
}

/// Outcome of one answer to a "which one?" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Zero-based position of the picked candidate.
    Picked(usize),
    /// The user asked to stop choosing.
    Quit,
    /// The answer was neither a listed number nor a quit request.
    Invalid,
}

/// Interprets an answer to a numbered list of `count` candidates.
///
/// Candidates are shown numbered from 1. `q` (any case) quits.
///
/// # Examples
///
/// ```
/// use doctor::domain::{Choice, parse_choice};
///
/// assert_eq!(parse_choice("2", 3), Choice::Picked(1));
/// assert_eq!(parse_choice("Q", 3), Choice::Quit);
/// assert_eq!(parse_choice("4", 3), Choice::Invalid);
/// ```
pub fn parse_choice(input: &str, count: usize) -> Choice {
    let input = input.trim();
    if input.eq_ignore_ascii_case("q") {
        return Choice::Quit;
    }
    match input.parse::<usize>() {
        Ok(n) if n >= 1 && n <= count => Choice::Picked(n - 1),
        _ => Choice::Invalid,
    }
}
