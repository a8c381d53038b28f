//! Shared utilities for integration tests.

pub mod harness;

use std::path::Path;

/// Writes a shell script and marks it executable.
///
/// # Panics
///
/// Panics if the script cannot be written.
#[cfg(unix)]
#[allow(dead_code)]
pub fn write_script(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create script directory");
    }
    std::fs::write(path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write script");
    let mut perms = std::fs::metadata(path)
        .expect("Failed to stat script")
        .permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms).expect("Failed to make script executable");
}
