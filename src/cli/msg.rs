//! Styled user-facing messages and the progress spinner.
//!
//! Info and success lines go to stdout, warnings and errors to stderr.
//! Styling is dropped automatically when the stream is not a terminal.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(500);

pub fn info(text: &str) {
    println!("    {}", Style::new().dim().apply_to(text));
}

pub fn success(text: &str) {
    println!(" {}  {}", Style::new().green().bold().apply_to("✓"), text);
}

pub fn warning(text: &str) {
    eprintln!(
        " {}  {}",
        Style::new().yellow().bold().for_stderr().apply_to("W"),
        text
    );
}

pub fn error(text: &str) {
    eprintln!(
        " {}  {}",
        Style::new().red().bold().for_stderr().apply_to("E"),
        text
    );
}

/// Formats diagnostic lines as an indented block under a message.
///
/// A leading `Label: ` is emphasised.
pub fn detail_block(lines: &[String]) -> String {
    let bold = Style::new().bold().for_stderr();
    lines
        .iter()
        .map(|line| match line.split_once(": ") {
            Some((label, rest)) if !label.contains(' ') => {
                format!("        {} {}", bold.apply_to(format!("{}:", label)), rest)
            }
            _ => format!("        {}", line),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A "working on it" indicator ticking on stderr.
///
/// Nothing is drawn when stderr is not a terminal.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn start(text: &str) -> Self {
        let style = ProgressStyle::with_template("{spinner:.dim} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&[".  ", ".. ", "...", ""]);

        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.set_message(text.to_string());
        bar.enable_steady_tick(TICK);
        Self { bar }
    }

    /// Stops ticking and clears the spinner line.
    pub fn stop(self) {
        self.bar.finish_and_clear();
    }
}
