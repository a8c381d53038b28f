//! Filesystem, section store, and Pandoc plumbing

mod filters;
mod fs;
mod pandoc;
mod slug;
mod store;

pub use filters::{ABSTRACT, BUILD_FILTERS, LuaFilter, WORDCOUNT};
pub use fs::{
    ASSETS_DIR, CONFIG_FILENAME, FsError, SECTIONS_DIR, data_dir, ensure_dir, find_executable,
    find_project_root, write_file, write_new_file,
};
pub use pandoc::{
    Diagnostics, RenderError, RenderPlan, clean_stderr, describe_exit_code, run_renderer,
};
pub use slug::{capitalize_first, section_slug};
pub use store::{SectionStore, StoreError};
