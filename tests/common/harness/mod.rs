//! Test harness for CLI integration tests.
//!
//! Provides isolated document projects, programmatic section creation,
//! and CLI assertion helpers using `assert_cmd`.

mod command;
mod env;
mod section;

// Re-export main types for external use
#[allow(unused_imports)]
pub use command::DoctorCommand;
#[allow(unused_imports)]
pub use env::TestProject;
#[allow(unused_imports)]
pub use section::TestSection;
