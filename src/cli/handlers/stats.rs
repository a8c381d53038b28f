//! Stats command handler.

use anyhow::{Context, Result, bail};
use pulldown_cmark::{Event, Parser, Tag};
use serde::Serialize;
use std::ffi::OsString;
use std::path::Path;

use crate::cli::StatsArgs;
use crate::cli::msg;
use crate::cli::output::{Output, OutputFormat, SectionStats};
use crate::infra::{
    RenderError, SectionStore, StoreError, WORDCOUNT, clean_stderr, data_dir, describe_exit_code,
    find_executable, run_renderer,
};

#[derive(Debug, Serialize)]
struct StatsReport {
    sections: Vec<SectionStats>,
    total: usize,
}

pub fn handle_stats(args: &StatsArgs, root: &Path) -> Result<()> {
    let store = match SectionStore::open(root) {
        Ok(store) => store,
        Err(StoreError::NoSections { .. }) => bail!("there are no sections in this document"),
        Err(e) => return Err(e).context("could not load section list"),
    };

    let sections = store
        .sections()
        .iter()
        .map(|s| -> Result<SectionStats> {
            let text = std::fs::read_to_string(s.path())
                .with_context(|| format!("failed to read {}", s.path().display()))?;
            Ok(SectionStats {
                index: s.index(),
                title: s.title().to_string(),
                words: count_words(&text),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let total: usize = sections.iter().map(|s| s.words).sum();

    match args.format {
        OutputFormat::Json => {
            let output = Output::new(StatsReport { sections, total });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human | OutputFormat::Paths => {
            let plural = if sections.len() == 1 { "" } else { "s" };
            println!("{} section{}", sections.len(), plural);
            for s in &sections {
                println!("{:>3} {:<40} {:>7} words", s.index, s.title, s.words);
            }
            println!("{:>3} {:<40} {:>7} words", "", "Total", total);
        }
    }

    if args.wordcount {
        pandoc_wordcount(&store)?;
    }
    Ok(())
}

/// Counts the words Pandoc sees in the whole document, using the embedded
/// wordcount filter.
fn pandoc_wordcount(store: &SectionStore) -> Result<()> {
    let pandoc = find_executable("pandoc")
        .context("wordcount failed, could not find pandoc on your PATH")?;
    let dir = data_dir().context("could not determine the Doctor data directory")?;
    let filter = WORDCOUNT.install(&dir)?;

    let mut args: Vec<OsString> = store
        .paths()
        .iter()
        .map(|p| p.as_os_str().to_owned())
        .collect();
    args.push("-L".into());
    args.push(filter.into_os_string());

    match run_renderer(&pandoc, &args) {
        Ok(stdout) | Err(RenderError::Warning { stdout, .. }) => {
            print!("{}", stdout);
            Ok(())
        }
        Err(RenderError::Fatal { code, stderr }) => {
            let diagnostics = clean_stderr(&stderr);
            bail!(
                "wordcount failed ({}):\n\n{}",
                describe_exit_code(code),
                msg::detail_block(&diagnostics.errors)
            );
        }
        Err(e @ RenderError::Other { .. }) => Err(e).context("could not run pandoc"),
    }
}

/// Counts whitespace-separated words in the text of a Markdown document.
///
/// Markup, raw HTML and link targets are not counted.
pub(crate) fn count_words(markdown: &str) -> usize {
    let mut text = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::Start(tag) | Event::End(tag) if !is_inline(&tag) => text.push(' '),
            Event::SoftBreak | Event::HardBreak | Event::Rule => text.push(' '),
            _ => {}
        }
    }
    text.split_whitespace().count()
}

fn is_inline(tag: &Tag) -> bool {
    matches!(
        tag,
        Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link(..) | Tag::Image(..)
    )
}
