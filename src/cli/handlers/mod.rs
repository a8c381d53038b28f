//! Command handlers for the CLI.

mod add;
mod build;
mod deps;
mod edit;
mod list;
mod mv;
mod new;
mod remove;
mod resolve;
mod stats;
mod update;

#[cfg(test)]
pub(crate) mod tests;

// Re-export public items
pub use add::handle_add;
pub use build::handle_build;
pub use deps::handle_check_dependencies;
pub use edit::handle_edit;
pub use list::handle_list;
pub use mv::handle_move;
pub use new::{DEFAULT_SECTIONS, handle_new};
pub use remove::handle_remove;
pub use stats::handle_stats;
pub use update::handle_update;

// Re-export for tests
#[cfg(test)]
pub(crate) use build::render_plan;
#[cfg(test)]
pub(crate) use edit::{EditorLauncher, handle_edit_impl};
#[cfg(test)]
pub(crate) use mv::handle_move_impl;
#[cfg(test)]
pub(crate) use new::create_document;
#[cfg(test)]
pub(crate) use remove::{handle_remove_impl, index_offset, original_index};
#[cfg(test)]
pub(crate) use resolve::{Prompter, ResolveResult, choose, confirm, resolve_section};
#[cfg(test)]
pub(crate) use stats::count_words;
