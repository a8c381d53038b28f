//! Isolated document project in a temp directory.

use super::{DoctorCommand, TestSection};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated document project with its own data directory.
///
/// The temp directory holds the project under `doc/` and the Doctor data
/// directory under `data/`. Both are cleaned up on drop.
pub struct TestProject {
    /// The temporary directory (kept for lifetime management)
    temp_dir: TempDir,
    root: PathBuf,
    data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestProject {
    /// Creates a project with an empty `doctor.toml` and `secs/` directory.
    pub fn new() -> Self {
        let project = Self::bare();
        std::fs::write(project.root.join("doctor.toml"), "").expect("Failed to write config");
        std::fs::create_dir(project.secs_dir()).expect("Failed to create secs");
        project
    }

    /// Creates an empty directory that is not a document yet.
    pub fn bare() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("doc");
        let data_dir = temp_dir.path().join("data");
        std::fs::create_dir(&root).expect("Failed to create project directory");
        std::fs::create_dir(&data_dir).expect("Failed to create data directory");
        Self {
            temp_dir,
            root,
            data_dir,
        }
    }

    /// Returns the project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the temp directory that contains the project.
    pub fn parent(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Returns the Doctor data directory used by commands of this project.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn secs_dir(&self) -> PathBuf {
        self.root.join("secs")
    }

    /// Writes a section file and returns its path.
    pub fn add_section(&self, section: &TestSection) -> PathBuf {
        let path = self.secs_dir().join(section.filename());
        std::fs::write(&path, section.content()).expect("Failed to write test section");
        path
    }

    /// Returns the section filenames on disk, sorted.
    pub fn section_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.secs_dir())
            .expect("Failed to read secs")
            .map(|e| {
                e.expect("Failed to read entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }

    /// Writes a file relative to the project root and returns its path.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.root.join(name)).expect("Failed to read file")
    }

    /// Creates a DoctorCommand running inside this project.
    pub fn cmd(&self) -> DoctorCommand {
        DoctorCommand::new()
            .current_dir(&self.root)
            .env("DOCTOR_DATA_DIR", self.data_dir.to_string_lossy())
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_has_config_and_secs() {
        let project = TestProject::new();
        assert!(project.root().join("doctor.toml").is_file());
        assert!(project.secs_dir().is_dir());
    }

    #[test]
    fn test_project_cleanup_on_drop() {
        let path = {
            let project = TestProject::new();
            project.root().to_path_buf()
        };
        assert!(!path.exists(), "temp directory should be cleaned up on drop");
    }

    #[test]
    fn test_project_add_section() {
        let project = TestProject::new();
        let path = project.add_section(&TestSection::new(2, "Method").body("Text."));

        assert!(path.ends_with("secs/02_Method.md"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# Method\n\nText.");
        assert_eq!(project.section_files(), vec!["02_Method.md"]);
    }
}
