//! Remove sections command handler.

use anyhow::{Context, Result, bail};
use std::path::Path;

use super::resolve::{Prompter, ResolveResult, StdinPrompter, confirm, resolve_section};
use crate::cli::RemoveArgs;
use crate::cli::msg;
use crate::infra::{SectionStore, StoreError};

pub fn handle_remove(args: &RemoveArgs, root: &Path) -> Result<()> {
    handle_remove_impl(args, root, &mut StdinPrompter)
}

/// Removes each queried section in turn.
///
/// Index queries refer to the numbering before the command started, so the
/// sections removed earlier in the batch are tracked by their original index.
pub(crate) fn handle_remove_impl<P: Prompter>(
    args: &RemoveArgs,
    root: &Path,
    prompter: &mut P,
) -> Result<()> {
    let mut store = match SectionStore::open(root) {
        Ok(store) => store,
        Err(StoreError::NoSections { .. }) => bail!("there are no sections in this document"),
        Err(e) => return Err(e).context("could not load section list"),
    };

    let mut removed: Vec<usize> = Vec::new();
    let mut failed: Vec<&str> = Vec::new();

    for query in args.sections.iter().map(|q| q.trim()).filter(|q| !q.is_empty()) {
        let offset = index_offset(query, &removed);

        let section = match resolve_section(&store, query, offset, "delete", prompter)? {
            ResolveResult::Found(section) => section,
            ResolveResult::NotFound(e) => {
                msg::error(&format!("Could not find any sections matching '{}'.", e.query()));
                failed.push(query);
                continue;
            }
            ResolveResult::Quit => continue,
        };

        if !args.confirm
            && !confirm(
                &format!("Are you sure you want to delete {}?", section.title()),
                prompter,
            )?
        {
            msg::info(&format!("Skipping deletion of {}.", section.title()));
            continue;
        }

        let current = section.index();
        match store.remove(&section) {
            Ok(_) => {}
            Err(e @ StoreError::Io { .. }) => {
                msg::error(&format!("Could not remove section {}. {}", section.title(), e));
                failed.push(query);
                continue;
            }
            Err(e) => return Err(e).context("could not renumber the remaining sections"),
        }
        msg::success(&format!("Deleted section {}.", section.title()));

        let original = original_index(current, &removed);
        let pos = removed.partition_point(|&d| d < original);
        removed.insert(pos, original);
    }

    if !failed.is_empty() {
        bail!("could not remove: {}", failed.join(", "));
    }
    Ok(())
}

/// Number of removed sections whose original index is below an index query.
///
/// Title queries get no offset.
pub(crate) fn index_offset(query: &str, removed: &[usize]) -> usize {
    match query.parse::<i64>() {
        Ok(q) if q > 0 => removed.iter().filter(|&&d| (d as i64) < q).count(),
        _ => 0,
    }
}

/// Maps an index in the current numbering back to the original numbering.
///
/// `removed` holds the original indices already removed, in ascending order.
pub(crate) fn original_index(current: usize, removed: &[usize]) -> usize {
    let mut original = current;
    for &d in removed {
        if d <= original {
            original += 1;
        }
    }
    original
}
