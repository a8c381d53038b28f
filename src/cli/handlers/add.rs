//! Add section command handler.

use anyhow::{Context, Result, bail};
use std::path::Path;

use crate::cli::AddArgs;
use crate::cli::msg;
use crate::infra::{SECTIONS_DIR, SectionStore, ensure_dir};

pub fn handle_add(args: &AddArgs, root: &Path) -> Result<()> {
    if args.name.trim().is_empty() {
        bail!("section name cannot be empty");
    }

    if ensure_dir(&root.join(SECTIONS_DIR)).context("could not create directory 'secs'")? {
        msg::info(&format!("Created directory {}.", SECTIONS_DIR));
    }

    let mut store = SectionStore::open_or_empty(root).context("could not load section list")?;
    if args.at.is_some() && !store.is_empty() {
        msg::info("Reordering existing sections...");
    }

    let section = store
        .create(&args.name, args.at)
        .context("could not add a new section")?;

    msg::success(&format!(
        "Created new section {} with index {}.",
        section.title(),
        section.index()
    ));
    Ok(())
}
