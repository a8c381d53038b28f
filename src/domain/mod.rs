//! Core types: Section, query matching, interactive choices

mod matching;
mod section;

pub use matching::{Choice, SectionNotFound, find_matches, parse_choice};
pub use section::{ParseSectionError, SECTION_EXT, SECTION_SEP, Section, section_filename};
