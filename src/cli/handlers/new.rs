//! New document command handler.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

use crate::cli::NewArgs;
use crate::cli::config::ProjectConfig;
use crate::cli::msg;
use crate::infra::{
    ASSETS_DIR, FsError, SECTIONS_DIR, SectionStore, capitalize_first, ensure_dir, write_new_file,
};

/// Sections added by `doctor new --default`, a classic report structure.
pub const DEFAULT_SECTIONS: &[&str] = &[
    "Abstract",
    "Introduction",
    "Theory",
    "Method",
    "Results",
    "Discussion",
    "Conclusion",
];

pub fn handle_new(args: &NewArgs) -> Result<()> {
    let root = create_document(&args.path, args.default)?;
    msg::success(&format!("Created new document in {}.", root.display()));
    Ok(())
}

/// Scaffolds a document at `path` and returns its absolute root.
///
/// Existing directories are reused; an existing config or bibliography is
/// never overwritten.
pub(crate) fn create_document(path: &Path, default_structure: bool) -> Result<PathBuf> {
    let root = std::path::absolute(path)
        .with_context(|| format!("invalid path: {}", path.display()))?;

    if root.exists() && !root.is_dir() {
        bail!(
            "there is already a file at '{}', consider naming your document something else",
            root.display()
        );
    }
    if ensure_dir(&root).context("could not create root directory")? {
        msg::info(&format!("Created new directory {}.", root.display()));
    }

    let assets = root.join(ASSETS_DIR);
    if ensure_dir(&assets).context("could not create assets directory")? {
        msg::info("Made assets directory.");
    } else {
        msg::info("The assets directory already exists, keeping it.");
    }
    ensure_dir(&root.join(SECTIONS_DIR)).context("could not create sections directory")?;

    let title = root
        .file_name()
        .map(|n| capitalize_first(&n.to_string_lossy()))
        .unwrap_or_else(|| "Document".to_string());
    write_if_missing(&ProjectConfig::path(&root), &ProjectConfig::template(&title))?;
    write_if_missing(&assets.join("references.bib"), "")?;

    if default_structure {
        msg::info("Adding sections of default document structure...");
        let mut store = SectionStore::open_or_empty(&root)?;
        for name in DEFAULT_SECTIONS {
            if let Err(e) = store.create(name, None) {
                msg::warning(&format!("Could not create section '{}'. {}", name, e));
            }
        }
    }

    Ok(root)
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match write_new_file(path, content) {
        Ok(()) => msg::info(&format!("Created {}.", name)),
        Err(FsError::AlreadyExists { .. }) => {
            msg::info(&format!("{} already exists, keeping it.", name))
        }
        Err(e) => return Err(e).with_context(|| format!("unable to create {}", name)),
    }
    Ok(())
}
