//! Edit command handler.

use anyhow::{Context, Result, bail};
use std::path::Path;
use std::process::Command;

use super::resolve::{Prompter, ResolveResult, StdinPrompter, resolve_section};
use crate::cli::EditArgs;
use crate::cli::config::{ProjectConfig, editor};
use crate::infra::{SectionStore, StoreError};

/// Trait for launching an editor (allows mocking in tests).
pub(crate) trait EditorLauncher {
    fn open(&self, path: &Path) -> Result<()>;
}

/// Launches the editor from the environment.
pub(crate) struct SystemEditor;

impl EditorLauncher for SystemEditor {
    fn open(&self, path: &Path) -> Result<()> {
        open_in_editor(path, &editor())
    }
}

/// Internal implementation that accepts a generic editor launcher.
pub(crate) fn handle_edit_impl<E: EditorLauncher, P: Prompter>(
    args: &EditArgs,
    root: &Path,
    editor: &E,
    prompter: &mut P,
) -> Result<()> {
    if args.config {
        return editor.open(&ProjectConfig::path(root));
    }

    let query = args.section.as_deref().unwrap_or_default();
    let store = match SectionStore::open(root) {
        Ok(store) => store,
        Err(StoreError::NoSections { .. }) => bail!("there are no sections in this document"),
        Err(e) => return Err(e).context("could not load section list"),
    };

    match resolve_section(&store, query, 0, "edit", prompter)? {
        ResolveResult::Found(section) => editor.open(section.path()),
        ResolveResult::NotFound(e) => Err(e.into()),
        ResolveResult::Quit => Ok(()),
    }
}

pub fn handle_edit(args: &EditArgs, root: &Path) -> Result<()> {
    handle_edit_impl(args, root, &SystemEditor, &mut StdinPrompter)
}

/// Runs `command` with `path` appended and waits for it to exit.
///
/// The command may carry arguments, as in `code --wait`.
pub(crate) fn open_in_editor(path: &Path, command: &str) -> Result<()> {
    let parts: Vec<&str> = command.split_whitespace().collect();
    let Some((cmd, args)) = parts.split_first() else {
        bail!("editor command is empty");
    };

    let status = Command::new(cmd)
        .args(args)
        .arg(path)
        .status()
        .with_context(|| format!("failed to launch editor '{}'", command))?;

    if !status.success() {
        bail!("editor '{}' exited with non-zero status", command);
    }

    Ok(())
}
