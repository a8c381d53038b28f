//! Project discovery and file I/O with atomic writes.

use std::io::{self, Write as IoWrite};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

use crate::domain::SECTION_EXT;

/// Name of the configuration file that marks a project root.
pub const CONFIG_FILENAME: &str = "doctor.toml";

/// Directory holding the section files.
pub const SECTIONS_DIR: &str = "secs";

/// Directory holding the bibliography and other assets.
pub const ASSETS_DIR: &str = "assets";

/// Errors during file system operations on a project.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("could not find a Doctor document in {start} or any parent directory")]
    NotInProject { start: PathBuf },

    #[error("file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("file already exists: {path}")]
    AlreadyExists { path: PathBuf },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("atomic write failed for {path}: {source}")]
    AtomicWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("parent directory does not exist: {path}")]
    ParentNotFound { path: PathBuf },

    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

impl FsError {
    /// Creates an appropriate FsError from an io::Error.
    pub(crate) fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => FsError::NotFound { path: path.into() },
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied { path: path.into() },
            io::ErrorKind::AlreadyExists => FsError::AlreadyExists { path: path.into() },
            _ => FsError::Io {
                path: path.into(),
                source: error,
            },
        }
    }
}

/// Searches `start` and its ancestors for a directory containing `doctor.toml`.
///
/// # Errors
///
/// Returns `FsError::NotInProject` when no ancestor has a config file.
pub fn find_project_root(start: &Path) -> Result<PathBuf, FsError> {
    let start = std::path::absolute(start).map_err(|e| FsError::from_io(start, e))?;

    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILENAME).is_file())
        .map(Path::to_path_buf)
        .ok_or(FsError::NotInProject { start })
}

/// Creates `dir` if it does not exist yet.
///
/// Returns `true` when the directory was created.
///
/// # Errors
///
/// Returns `FsError::NotADirectory` if a file is in the way.
pub fn ensure_dir(dir: &Path) -> Result<bool, FsError> {
    if dir.is_dir() {
        return Ok(false);
    }
    if dir.exists() {
        return Err(FsError::NotADirectory { path: dir.into() });
    }
    std::fs::create_dir_all(dir).map_err(|e| FsError::from_io(dir, e))?;
    Ok(true)
}

/// Writes `content` to a new file at `path` atomically.
///
/// The content goes to a temporary file in the same directory first, which
/// is then moved into place. An existing file is never replaced.
///
/// # Errors
///
/// Returns `FsError::ParentNotFound` if the parent directory doesn't exist.
/// Returns `FsError::AlreadyExists` if `path` already exists.
pub fn write_new_file(path: &Path, content: &str) -> Result<(), FsError> {
    let parent = path
        .parent()
        .ok_or_else(|| FsError::ParentNotFound { path: path.into() })?;

    if !parent.exists() {
        return Err(FsError::ParentNotFound {
            path: parent.into(),
        });
    }

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| FsError::Io {
        path: path.into(),
        source: e,
    })?;

    temp.write_all(content.as_bytes())
        .map_err(|e| FsError::Io {
            path: path.into(),
            source: e,
        })?;

    temp.persist_noclobber(path).map_err(|e| {
        if e.error.kind() == io::ErrorKind::AlreadyExists {
            FsError::AlreadyExists { path: path.into() }
        } else {
            FsError::AtomicWrite {
                path: path.into(),
                source: e.error,
            }
        }
    })?;

    Ok(())
}

/// Writes `content` to `path` atomically, replacing any existing file.
///
/// # Errors
///
/// Returns `FsError::ParentNotFound` if the parent directory doesn't exist.
/// Returns `FsError::AtomicWrite` if the final rename fails.
pub fn write_file(path: &Path, content: &str) -> Result<(), FsError> {
    let parent = path
        .parent()
        .ok_or_else(|| FsError::ParentNotFound { path: path.into() })?;

    if !parent.exists() {
        return Err(FsError::ParentNotFound {
            path: parent.into(),
        });
    }

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| FsError::Io {
        path: path.into(),
        source: e,
    })?;

    temp.write_all(content.as_bytes())
        .map_err(|e| FsError::Io {
            path: path.into(),
            source: e,
        })?;

    temp.persist(path).map_err(|e| FsError::AtomicWrite {
        path: path.into(),
        source: e.error,
    })?;

    Ok(())
}

/// Lists the section files directly inside `dir`.
///
/// Only regular `.md` files are returned; hidden files and subdirectories
/// are skipped. Paths are returned in filename order.
///
/// # Errors
///
/// Returns `FsError::NotFound` if the directory doesn't exist.
/// Returns `FsError::NotADirectory` if the path is not a directory.
pub fn scan_section_files(dir: &Path) -> Result<Vec<PathBuf>, FsError> {
    if !dir.exists() {
        return Err(FsError::NotFound {
            path: dir.to_path_buf(),
        });
    }
    if !dir.is_dir() {
        return Err(FsError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            match e.into_io_error() {
                Some(io) => FsError::from_io(&path, io),
                None => FsError::Io {
                    path,
                    source: io::Error::other("filesystem loop"),
                },
            }
        })?;
        if entry.file_type().is_file() && !is_hidden(&entry) && has_section_extension(&entry) {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

/// Returns the directory where Doctor keeps its own data.
///
/// `DOCTOR_DATA_DIR` overrides the platform default.
pub fn data_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("DOCTOR_DATA_DIR").filter(|d| !d.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    dirs::data_dir().map(|d| d.join("doctor"))
}

/// Locates an executable by name.
///
/// Looks in `<data dir>/<name>/bin` first, where locally installed tools
/// live, then in every directory of `PATH`.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    let local = data_dir().map(|d| d.join(name).join("bin"));
    let path_dirs = std::env::var_os("PATH")
        .map(|p| std::env::split_paths(&p).collect::<Vec<_>>())
        .unwrap_or_default();

    local
        .into_iter()
        .chain(path_dirs)
        .flat_map(|dir| executable_candidates(&dir, name))
        .find(|candidate| is_executable(candidate))
}

fn executable_candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    if cfg!(windows) && Path::new(name).extension().is_none() {
        vec![dir.join(format!("{}.exe", name)), dir.join(name)]
    } else {
        vec![dir.join(name)]
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.'))
}

fn has_section_extension(entry: &DirEntry) -> bool {
    entry.path().extension().is_some_and(|e| e == SECTION_EXT)
}
