//! Output format types for CLI commands.

use clap::ValueEnum;
use serde::Serialize;

use crate::domain::Section;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for programmatic consumption
    Json,
    /// Plain file paths, one per line
    Paths,
}

/// Wrapper for serializable command output.
#[derive(Debug, Serialize)]
pub struct Output<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> Output<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// A single section in listing output.
#[derive(Debug, Serialize)]
pub struct SectionListing {
    pub index: usize,
    pub title: String,
    pub path: String,
}

impl From<&Section> for SectionListing {
    fn from(section: &Section) -> Self {
        Self {
            index: section.index(),
            title: section.title().to_string(),
            path: section.path().display().to_string(),
        }
    }
}

/// Word counts for the `stats` command.
#[derive(Debug, Serialize)]
pub struct SectionStats {
    pub index: usize,
    pub title: String,
    pub words: usize,
}
