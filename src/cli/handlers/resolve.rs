//! Section resolution and interactive prompts.

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

use crate::cli::msg;
use crate::domain::{Choice, Section, SectionNotFound, parse_choice};
use crate::infra::SectionStore;

/// Source of answers to interactive questions.
pub(crate) trait Prompter {
    /// Shows `question` and returns the answer, or `None` at end of input.
    fn ask(&mut self, question: &str) -> Result<Option<String>>;
}

/// Prompter reading answers from standard input.
pub(crate) struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        print!("{} ", question);
        io::stdout().flush().context("failed to write prompt")?;

        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .context("failed to read answer")?;
        if read == 0 {
            println!();
            return Ok(None);
        }
        Ok(Some(line))
    }
}

/// Result of resolving a section query.
#[derive(Debug)]
pub(crate) enum ResolveResult {
    /// A single section, either the only match or the one the user picked.
    Found(Section),
    /// Nothing matched the query.
    NotFound(SectionNotFound),
    /// Several sections matched and the user declined to pick one.
    Quit,
}

/// Resolves `query` to one section, asking the user to pick when several
/// sections match.
///
/// `action` completes the question "Which one do you want to ...?".
pub(crate) fn resolve_section<P: Prompter>(
    store: &SectionStore,
    query: &str,
    offset: usize,
    action: &str,
    prompter: &mut P,
) -> Result<ResolveResult> {
    let matches = match store.find(query, offset) {
        Ok(matches) => matches,
        Err(not_found) => return Ok(ResolveResult::NotFound(not_found)),
    };

    if let [only] = matches.as_slice() {
        return Ok(ResolveResult::Found((*only).clone()));
    }

    msg::info(&format!("Found {} matches.", matches.len()));
    let question = format!("Which one do you want to {}? (q to quit)", action);
    Ok(match choose(&matches, &question, prompter)? {
        Some(section) => ResolveResult::Found(section.clone()),
        None => ResolveResult::Quit,
    })
}

/// Runs the numbered choice loop until the user picks or quits.
pub(crate) fn choose<'a, P: Prompter>(
    candidates: &[&'a Section],
    question: &str,
    prompter: &mut P,
) -> Result<Option<&'a Section>> {
    loop {
        for (i, section) in candidates.iter().enumerate() {
            println!(" {}. {}", i + 1, section.title());
        }

        let Some(answer) = prompter.ask(question)? else {
            return Ok(None);
        };
        match parse_choice(&answer, candidates.len()) {
            Choice::Picked(i) => return Ok(Some(candidates[i])),
            Choice::Quit => return Ok(None),
            Choice::Invalid => {
                msg::info("That is not a valid option. Please enter the number of the section.")
            }
        }
    }
}

/// Asks a yes/no question where anything but `y` means no.
pub(crate) fn confirm<P: Prompter>(question: &str, prompter: &mut P) -> Result<bool> {
    let answer = prompter.ask(&format!("{} (y/N)", question))?;
    Ok(answer.is_some_and(|a| a.trim().eq_ignore_ascii_case("y")))
}
