//! `--check-dependencies`: report where the external tools are.

use anyhow::{Result, bail};
use std::path::Path;

use crate::cli::config::{BuildConfig, ProjectConfig};
use crate::cli::msg;
use crate::infra::{find_executable, find_project_root};

pub fn handle_check_dependencies(start: &Path) -> Result<()> {
    let engine = match find_project_root(start) {
        Ok(root) => ProjectConfig::load(&root)?.build.engine,
        Err(_) => BuildConfig::default().engine,
    };

    let mut missing = Vec::new();
    for tool in ["pandoc", engine.as_str()] {
        match find_executable(tool) {
            Some(path) => msg::success(&format!("Found {} at {}.", tool, path.display())),
            None => {
                msg::error(&format!("Could not find {}.", tool));
                missing.push(tool.to_string());
            }
        }
    }

    if !missing.is_empty() {
        bail!("missing dependencies: {}", missing.join(", "));
    }
    Ok(())
}
