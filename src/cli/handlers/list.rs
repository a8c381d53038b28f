//! List command handler.

use anyhow::{Context, Result};
use console::Style;
use std::path::Path;

use crate::cli::ListArgs;
use crate::cli::output::{Output, OutputFormat, SectionListing};
use crate::infra::{SectionStore, StoreError};

pub fn handle_list(args: &ListArgs, root: &Path) -> Result<()> {
    let store = match SectionStore::open(root) {
        Ok(store) => store,
        Err(StoreError::NoSections { .. }) => {
            match args.format {
                OutputFormat::Human => println!("No sections found."),
                OutputFormat::Json => {
                    let output = Output::new(Vec::<SectionListing>::new());
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Paths => {}
            }
            return Ok(());
        }
        Err(e) => return Err(e).context("could not load section list"),
    };

    match args.format {
        OutputFormat::Human => {
            let dim = Style::new().dim();
            for section in store.sections() {
                let index = format!("{:>3}", section.index());
                println!("{} {}", dim.apply_to(index), section.title());
            }
        }
        OutputFormat::Json => {
            let listings: Vec<SectionListing> =
                store.sections().iter().map(SectionListing::from).collect();
            let output = Output::new(listings);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Paths => {
            for path in store.paths() {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}
