//! doctor - write documents as numbered Markdown sections, build them with Pandoc

pub mod cli;
pub mod domain;
pub mod infra;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use cli::{
    Cli, Command,
    handlers::{
        handle_add, handle_build, handle_check_dependencies, handle_edit, handle_list,
        handle_move, handle_new, handle_remove, handle_stats, handle_update,
    },
};
use infra::find_project_root;

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let start = cli.dir.clone().unwrap_or_else(|| PathBuf::from("."));

    if cli.update {
        handle_update()?;
    }
    if cli.check_dependencies {
        handle_check_dependencies(&start)?;
    }

    let Some(command) = &cli.command else {
        if !cli.update && !cli.check_dependencies {
            Cli::command().print_help()?;
        }
        return Ok(());
    };

    match command {
        Command::New(args) => handle_new(args),
        Command::Completions(args) => {
            clap_complete::generate(
                args.shell,
                &mut Cli::command(),
                "doctor",
                &mut std::io::stdout(),
            );
            Ok(())
        }
        Command::Add(args) => handle_add(args, &project_root(&start)?),
        Command::Remove(args) => handle_remove(args, &project_root(&start)?),
        Command::Move(args) => handle_move(args, &project_root(&start)?),
        Command::List(args) => handle_list(args, &project_root(&start)?),
        Command::Edit(args) => handle_edit(args, &project_root(&start)?),
        Command::Build => handle_build(&project_root(&start)?),
        Command::Stats(args) => handle_stats(args, &project_root(&start)?),
    }
}

fn project_root(start: &Path) -> Result<PathBuf> {
    let root = find_project_root(start)?;
    tracing::debug!("project root: {}", root.display());
    Ok(root)
}

/// Sets up diagnostic logging on stderr.
///
/// `RUST_LOG` takes precedence over the `-v` count.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("doctor={}", level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
