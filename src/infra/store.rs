//! The ordered set of sections of a project and the renumbering operations
//! that keep their filenames contiguous.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use super::fs::{FsError, SECTIONS_DIR, scan_section_files, write_new_file};
use super::slug::{capitalize_first, section_slug};
use crate::domain::{ParseSectionError, Section, SectionNotFound, find_matches, section_filename};

/// Errors from section store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The sections directory is missing or holds no section files.
    #[error("no sections found in {dir}")]
    NoSections { dir: PathBuf },

    #[error(transparent)]
    Parse(#[from] ParseSectionError),

    /// A rename during renumbering failed. Earlier renames are kept.
    #[error("could not move {from} to index {index}: {source}")]
    Rename {
        index: usize,
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot rename section onto existing file {path}")]
    TargetExists { path: PathBuf },

    #[error("index {index} is out of range, there are {len} sections")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("section {path} is not part of this project")]
    UnknownSection { path: PathBuf },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Fs(#[from] FsError),
}

/// All sections of a project, sorted by index.
///
/// Every mutation renames files on disk first and updates the in-memory
/// sections only once the rename succeeded. Multi-step operations stop at
/// the first failure without undoing the steps already taken.
#[derive(Debug)]
pub struct SectionStore {
    dir: PathBuf,
    sections: Vec<Section>,
}

impl SectionStore {
    /// Loads the sections of the project at `root`.
    ///
    /// Sections are sorted by their parsed index, with ties broken by path.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoSections` if `secs/` is missing or empty.
    /// Returns `StoreError::Parse` if any section filename is malformed.
    pub fn open(root: &Path) -> Result<Self, StoreError> {
        let dir = root.join(SECTIONS_DIR);

        let paths = match scan_section_files(&dir) {
            Ok(paths) => paths,
            Err(FsError::NotFound { .. }) => return Err(StoreError::NoSections { dir }),
            Err(e) => return Err(e.into()),
        };
        if paths.is_empty() {
            return Err(StoreError::NoSections { dir });
        }

        let sections = paths
            .iter()
            .map(|p| Section::from_path(p))
            .collect::<Result<Vec<_>, _>>()?;

        let mut store = Self { dir, sections };
        store.sort();
        debug!("loaded {} sections from {}", store.len(), store.dir.display());
        Ok(store)
    }

    /// Like [`open`](Self::open), but an empty project yields an empty store.
    pub fn open_or_empty(root: &Path) -> Result<Self, StoreError> {
        match Self::open(root) {
            Err(StoreError::NoSections { dir }) => Ok(Self {
                dir,
                sections: Vec::new(),
            }),
            other => other,
        }
    }

    /// Returns the sections directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Returns the section paths in index order.
    pub fn paths(&self) -> Vec<&Path> {
        self.sections.iter().map(Section::path).collect()
    }

    /// Finds the sections matching `query`; see [`find_matches`].
    pub fn find(&self, query: &str, offset: usize) -> Result<Vec<&Section>, SectionNotFound> {
        find_matches(query, &self.sections, offset)
    }

    /// Returns the first index not taken by any section.
    ///
    /// This is the first gap in the numbering, or one past the highest index.
    pub fn next_free_index(&self) -> usize {
        let mut expected = 0;
        for section in &self.sections {
            if expected < section.index() {
                return expected;
            }
            expected = expected.max(section.index() + 1);
        }
        expected
    }

    /// Renames a section's file to encode `index`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::TargetExists` if another file already has the
    /// new name, or `StoreError::Rename` if the rename fails.
    pub fn change_index(&mut self, section: &Section, index: usize) -> Result<(), StoreError> {
        let pos = self.position(section)?;
        self.change_index_at(pos, index)?;
        self.sort();
        Ok(())
    }

    /// Creates a new section file for `name`.
    ///
    /// With `at`, the index is clamped to the number of sections and every
    /// section at or after it moves up by one. Without it, the section takes
    /// the first free index.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Fs` with `FsError::AlreadyExists` if the file
    /// exists, and rename errors from making room.
    pub fn create(&mut self, name: &str, at: Option<usize>) -> Result<&Section, StoreError> {
        let title = capitalize_first(name.trim());
        let slug = section_slug(name);

        let index = match at {
            Some(at) => {
                let at = at.min(self.len());
                self.make_room(at)?;
                at
            }
            None => self.next_free_index(),
        };

        let path = self.dir.join(section_filename(index, &slug));
        write_new_file(&path, &format!("# {}\n\n", title))?;
        debug!("created {}", path.display());

        let section = Section::new(path, title, index);
        let pos = self
            .sections
            .partition_point(|s| (s.index(), s.path()) < (index, section.path()));
        self.sections.insert(pos, section);
        Ok(&self.sections[pos])
    }

    /// Deletes a section's file and closes the gap it leaves.
    ///
    /// Returns the removed section.
    pub fn remove(&mut self, section: &Section) -> Result<Section, StoreError> {
        let pos = self.position(section)?;

        std::fs::remove_file(section.path()).map_err(|e| StoreError::Io {
            path: section.path().to_path_buf(),
            source: e,
        })?;
        let removed = self.sections.remove(pos);
        debug!("removed {}", removed.path().display());

        let gap = removed.index();
        for pos in 0..self.sections.len() {
            let index = self.sections[pos].index();
            if index > gap {
                self.change_index_at(pos, index - 1)?;
            }
        }
        Ok(removed)
    }

    /// Moves a section to index `to`, shifting the sections in between by one.
    ///
    /// Returns `false` when the section already has index `to`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::IndexOutOfRange` if `to` is not below the number
    /// of sections.
    ///
    /// The moved file is parked under a hidden name while the block shifts,
    /// so a neighbour with the same slug can take over its old filename.
    pub fn move_to(&mut self, section: &Section, to: usize) -> Result<bool, StoreError> {
        if to >= self.len() {
            return Err(StoreError::IndexOutOfRange {
                index: to,
                len: self.len(),
            });
        }

        let moved = self.position(section)?;
        let from = self.sections[moved].index();
        if from == to {
            return Ok(false);
        }

        self.park(moved)?;
        if let Err(e) = self.shift_block(moved, from, to) {
            self.unpark(moved, from);
            return Err(e);
        }
        self.change_index_at(moved, to)?;
        self.sort();
        Ok(true)
    }

    fn shift_block(&mut self, moved: usize, from: usize, to: usize) -> Result<(), StoreError> {
        if from > to {
            // Shift [to, from) up, highest first.
            for pos in (0..self.sections.len()).rev() {
                let index = self.sections[pos].index();
                if pos != moved && index >= to && index < from {
                    self.change_index_at(pos, index + 1)?;
                }
            }
        } else {
            // Shift (from, to] down, lowest first.
            for pos in 0..self.sections.len() {
                let index = self.sections[pos].index();
                if pos != moved && index > from && index <= to {
                    self.change_index_at(pos, index - 1)?;
                }
            }
        }
        Ok(())
    }

    /// Renames a section's file to a hidden name, keeping its index.
    ///
    /// Hidden files are not section files, and the parked name still
    /// re-encodes to a normal filename through `filename_at`.
    fn park(&mut self, pos: usize) -> Result<(), StoreError> {
        let from = self.sections[pos].path().to_path_buf();
        let name = from
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let to = self.dir.join(format!(".{}", name));

        if to.exists() {
            return Err(StoreError::TargetExists { path: to });
        }
        std::fs::rename(&from, &to).map_err(|e| StoreError::Rename {
            index: self.sections[pos].index(),
            from: from.clone(),
            to: to.clone(),
            source: e,
        })?;
        debug!("parked {} -> {}", from.display(), to.display());

        let index = self.sections[pos].index();
        self.sections[pos].relocate(to, index);
        Ok(())
    }

    /// Puts a parked section back at `index`, if that name is still free.
    fn unpark(&mut self, pos: usize, index: usize) {
        if let Err(e) = self.change_index_at(pos, index) {
            warn!("could not restore {}: {}", self.sections[pos].path().display(), e);
        }
    }

    /// Moves every section at or after `at` up by one, highest first.
    fn make_room(&mut self, at: usize) -> Result<(), StoreError> {
        for pos in (0..self.sections.len()).rev() {
            let index = self.sections[pos].index();
            if index >= at {
                self.change_index_at(pos, index + 1)?;
            }
        }
        Ok(())
    }

    fn change_index_at(&mut self, pos: usize, index: usize) -> Result<(), StoreError> {
        let section = &self.sections[pos];
        let from = section.path().to_path_buf();
        let to = self.dir.join(section.filename_at(index));

        if to != from {
            if to.exists() {
                return Err(StoreError::TargetExists { path: to });
            }
            std::fs::rename(&from, &to).map_err(|e| StoreError::Rename {
                index,
                from: from.clone(),
                to: to.clone(),
                source: e,
            })?;
            debug!("renamed {} -> {}", from.display(), to.display());
        }

        self.sections[pos].relocate(to, index);
        Ok(())
    }

    fn position(&self, section: &Section) -> Result<usize, StoreError> {
        self.sections
            .iter()
            .position(|s| s == section)
            .ok_or_else(|| StoreError::UnknownSection {
                path: section.path().to_path_buf(),
            })
    }

    fn sort(&mut self) {
        self.sections
            .sort_by(|a, b| a.index().cmp(&b.index()).then_with(|| a.path().cmp(b.path())));
    }
}
