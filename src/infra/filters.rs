//! Lua filters shipped inside the binary and installed into the data
//! directory on first use, where Pandoc can read them.

use std::path::{Path, PathBuf};
use tracing::debug;

use super::fs::{FsError, ensure_dir, write_file};

/// A Lua filter embedded in the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LuaFilter {
    pub name: &'static str,
    pub source: &'static str,
}

pub const ABSTRACT: LuaFilter = LuaFilter {
    name: "abstract.lua",
    source: include_str!("filters/abstract.lua"),
};

pub const WORDCOUNT: LuaFilter = LuaFilter {
    name: "wordcount.lua",
    source: include_str!("filters/wordcount.lua"),
};

/// Filters applied to every build when Lua filters are enabled.
pub const BUILD_FILTERS: &[LuaFilter] = &[ABSTRACT];

impl LuaFilter {
    /// Makes sure the filter exists in `<data_dir>/embedded` with the
    /// current content and returns its path.
    ///
    /// # Errors
    ///
    /// Returns `FsError` if the directory or the file cannot be written.
    pub fn install(&self, data_dir: &Path) -> Result<PathBuf, FsError> {
        let dir = data_dir.join("embedded");
        ensure_dir(&dir)?;

        let path = dir.join(self.name);
        let current = std::fs::read_to_string(&path).ok();
        if current.as_deref() != Some(self.source) {
            debug!("writing filter {}", path.display());
            write_file(&path, self.source)?;
        }
        Ok(path)
    }
}
