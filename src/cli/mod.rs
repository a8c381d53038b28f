//! CLI command definitions and handlers

pub mod config;
pub mod handlers;
pub mod msg;
pub mod output;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use output::OutputFormat;

/// doctor - write documents as numbered Markdown sections, build them with Pandoc
#[derive(Parser, Debug)]
#[command(name = "doctor", version, about, long_about = None)]
pub struct Cli {
    /// Directory to look for the document in (defaults to the current directory)
    #[arg(short = 'd', long, global = true)]
    pub dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Check for a newer release of Doctor
    #[arg(long)]
    pub update: bool,

    /// Report whether Pandoc and the PDF engine can be found
    #[arg(long)]
    pub check_dependencies: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new document
    New(NewArgs),

    /// Add a section to the document
    Add(AddArgs),

    /// Remove sections from the document
    #[command(alias = "rm")]
    Remove(RemoveArgs),

    /// Move a section to another index
    #[command(name = "move", alias = "mv")]
    Move(MoveArgs),

    /// List the sections of the document
    #[command(alias = "ls")]
    List(ListArgs),

    /// Open a section (or the config file) in your editor
    Edit(EditArgs),

    /// Build the document with Pandoc
    Build,

    /// Show word counts
    Stats(StatsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `new` command
#[derive(Parser, Debug)]
pub struct NewArgs {
    /// Directory to create the document in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Add a default set of sections
    #[arg(long)]
    pub default: bool,
}

/// Arguments for the `add` command
#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Name of the new section
    pub name: String,

    /// Index to insert the section at (later sections move up)
    #[arg(short = 'i', long = "at", value_name = "INDEX")]
    pub at: Option<usize>,
}

/// Arguments for the `remove` command
#[derive(Parser, Debug)]
pub struct RemoveArgs {
    /// Sections to remove, by title or index (comma-separated lists allowed)
    #[arg(required = true, num_args = 1.., value_delimiter = ',')]
    pub sections: Vec<String>,

    /// Do not ask for confirmation
    #[arg(short = 'y', long)]
    pub confirm: bool,
}

/// Arguments for the `move` command
#[derive(Parser, Debug)]
pub struct MoveArgs {
    /// Section to move, by title or index
    pub section: String,

    /// Index to move the section to
    pub to: usize,
}

/// Arguments for the `list` command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `edit` command
#[derive(Parser, Debug)]
pub struct EditArgs {
    /// Section to edit, by title or index
    #[arg(required_unless_present = "config", conflicts_with = "config")]
    pub section: Option<String>,

    /// Edit doctor.toml instead of a section
    #[arg(long)]
    pub config: bool,
}

/// Arguments for the `stats` command
#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Also count words with Pandoc
    #[arg(short, long)]
    pub wordcount: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}
