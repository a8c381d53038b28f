//! Section type: one numbered Markdown file in a document project.

use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Separator between the index prefix and the slug in a section filename.
///
/// Changing this breaks every existing project on disk.
pub const SECTION_SEP: char = '_';

/// File extension of section files.
pub const SECTION_EXT: &str = "md";

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[ \t]+([^#\n]*)").expect("heading pattern is valid"));

/// A numbered content file of the document.
///
/// The filename encodes the position of the section: `02_Method.md` is the
/// section with index 2. The title is taken from a leading `# Heading` in the
/// file when there is one, and from the filename otherwise.
///
/// Two sections are equal when their paths are equal. `index` and `title`
/// are projections of the file and change when it is renamed or edited.
///
/// # Examples
///
/// ```
/// use doctor::domain::Section;
/// use std::path::PathBuf;
///
/// let section = Section::new(PathBuf::from("secs/03_Results.md"), "Results", 3);
/// assert_eq!(section.index(), 3);
/// assert_eq!(section.title(), "Results");
/// ```
#[derive(Debug, Clone)]
pub struct Section {
    path: PathBuf,
    title: String,
    index: usize,
}

/// Error returned when a filename does not follow the `NN_slug.md` pattern.
#[derive(Debug, Clone)]
pub struct ParseSectionError {
    path: PathBuf,
    reason: String,
}

impl ParseSectionError {
    fn new(path: &Path, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Returns the path of the file that failed to parse.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for ParseSectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid section filename '{}': {}",
            self.path.display(),
            self.reason
        )
    }
}

impl std::error::Error for ParseSectionError {}

impl Section {
    /// Creates a section from already known parts.
    pub fn new(path: PathBuf, title: impl Into<String>, index: usize) -> Self {
        Self {
            path,
            title: title.into(),
            index,
        }
    }

    /// Builds a section from the file at `path`.
    ///
    /// The index comes from the filename prefix. The title comes from a
    /// leading `# Heading` when the file can be read and starts with one,
    /// and from the filename otherwise.
    ///
    /// # Errors
    ///
    /// Returns `ParseSectionError` if the filename has no valid index prefix.
    pub fn from_path(path: &Path) -> Result<Self, ParseSectionError> {
        let (index, slug) = parse_filename(path)?;

        let title = std::fs::read_to_string(path)
            .ok()
            .and_then(|content| heading_title(&content))
            .unwrap_or(slug);

        Ok(Self {
            path: path.to_path_buf(),
            title,
            index,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the filename this section would have at index `index`.
    ///
    /// Everything after the first separator is kept as is.
    pub fn filename_at(&self, index: usize) -> String {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let rest = name
            .split_once(SECTION_SEP)
            .map(|(_, rest)| rest)
            .unwrap_or(&name);
        format!("{:02}{}{}", index, SECTION_SEP, rest)
    }

    /// Records a completed rename of the backing file.
    ///
    /// Callers update both fields together, only after the rename succeeded.
    pub(crate) fn relocate(&mut self, path: PathBuf, index: usize) {
        self.path = path;
        self.index = index;
    }
}

impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Section {}

/// Returns the filename for a new section.
///
/// # Examples
///
/// ```
/// use doctor::domain::section_filename;
///
/// assert_eq!(section_filename(2, "Method"), "02_Method.md");
/// assert_eq!(section_filename(120, "Appendix"), "120_Appendix.md");
/// ```
pub fn section_filename(index: usize, slug: &str) -> String {
    format!("{:02}{}{}.{}", index, SECTION_SEP, slug, SECTION_EXT)
}

/// Splits a section filename into its index and the title derived from it.
///
/// The title is the rest of the stem with separator characters removed.
fn parse_filename(path: &Path) -> Result<(usize, String), ParseSectionError> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ParseSectionError::new(path, "filename is not valid UTF-8"))?;

    let mut parts = stem.split(SECTION_SEP);
    let prefix = parts.next().unwrap_or_default();
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseSectionError::new(
            path,
            format!("index prefix '{}' is not a non-negative integer", prefix),
        ));
    }
    let index = prefix
        .parse::<usize>()
        .map_err(|e| ParseSectionError::new(path, e.to_string()))?;

    Ok((index, parts.collect::<String>()))
}

/// Extracts the heading text when the content starts with a `# Heading` line.
fn heading_title(content: &str) -> Option<String> {
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
    HEADING_RE
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty())
}
