//! Move section command handler.

use anyhow::{Context, Result, bail};
use std::path::Path;

use super::resolve::{Prompter, ResolveResult, StdinPrompter, resolve_section};
use crate::cli::MoveArgs;
use crate::cli::msg;
use crate::infra::{SectionStore, StoreError};

pub fn handle_move(args: &MoveArgs, root: &Path) -> Result<()> {
    handle_move_impl(args, root, &mut StdinPrompter)
}

pub(crate) fn handle_move_impl<P: Prompter>(
    args: &MoveArgs,
    root: &Path,
    prompter: &mut P,
) -> Result<()> {
    let mut store = match SectionStore::open(root) {
        Ok(store) => store,
        Err(StoreError::NoSections { .. }) => bail!("there are no sections in this document"),
        Err(e) => return Err(e).context("could not load section list"),
    };

    let section = match resolve_section(&store, &args.section, 0, "move", prompter)? {
        ResolveResult::Found(section) => section,
        ResolveResult::NotFound(e) => return Err(e.into()),
        ResolveResult::Quit => return Ok(()),
    };

    let from = section.index();
    let moved = store
        .move_to(&section, args.to)
        .with_context(|| format!("could not move {}", section.title()))?;

    if moved {
        msg::success(&format!(
            "Moved {} from index {} to {}",
            section.title(),
            from,
            args.to
        ));
    } else {
        msg::info(&format!(
            "{} already has index {}, nothing to do.",
            section.title(),
            from
        ));
    }
    Ok(())
}
