//! Running Pandoc: argument construction, subprocess outcome, and stderr
//! classification.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::debug;

#[cfg(windows)]
const RESOURCE_SEP: &str = ";";
#[cfg(not(windows))]
const RESOURCE_SEP: &str = ":";

/// Outcome of a renderer run that did not finish cleanly.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The renderer exited unsuccessfully.
    #[error("renderer exited unsuccessfully")]
    Fatal { code: Option<i32>, stderr: String },

    /// The renderer succeeded but wrote diagnostics to stderr.
    #[error("renderer reported warnings")]
    Warning { stdout: String, stderr: String },

    /// The renderer could not be started.
    #[error("could not run {program}: {source}")]
    Other {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Runs `program` with `args` and waits for it to finish.
///
/// Returns stdout when the run succeeded with an empty stderr.
///
/// # Errors
///
/// Returns `RenderError::Fatal` on a non-zero exit, `RenderError::Warning`
/// when the run succeeded but stderr is not empty, and `RenderError::Other`
/// when the process could not be spawned.
pub fn run_renderer(program: &Path, args: &[OsString]) -> Result<String, RenderError> {
    debug!("running {} {:?}", program.display(), args);

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| RenderError::Other {
            program: program.display().to_string(),
            source: e,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(RenderError::Fatal {
            code: output.status.code(),
            stderr,
        });
    }
    if !stderr.trim().is_empty() {
        return Err(RenderError::Warning { stdout, stderr });
    }
    Ok(stdout)
}

/// Everything needed to build the Pandoc command line for a document.
#[derive(Debug, Default, Clone)]
pub struct RenderPlan {
    pub output: PathBuf,
    pub resource_paths: Vec<PathBuf>,
    /// Path of the PDF engine and whether it is tectonic.
    pub pdf_engine: Option<(PathBuf, bool)>,
    pub inputs: Vec<PathBuf>,
    pub filters: Vec<PathBuf>,
    pub bibliography: Option<PathBuf>,
    pub metadata_file: Option<PathBuf>,
}

impl RenderPlan {
    /// Returns the Pandoc arguments in the order Pandoc expects to see them.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-s".into(), "-o".into(), self.output.clone().into()];

        if !self.resource_paths.is_empty() {
            let joined = self
                .resource_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(RESOURCE_SEP);
            args.push(format!("--resource-path={}", joined).into());
        }

        if let Some((engine, is_tectonic)) = &self.pdf_engine {
            args.push(flag_with_path("--pdf-engine=", engine));
            if *is_tectonic {
                args.push("--pdf-engine-opt=-c=minimal".into());
            }
        }

        args.extend(self.inputs.iter().map(|p| p.clone().into_os_string()));

        for filter in &self.filters {
            args.push("-L".into());
            args.push(filter.clone().into_os_string());
        }

        if let Some(bib) = &self.bibliography {
            args.push("-C".into());
            args.push(flag_with_path("--bibliography=", bib));
        }

        if let Some(meta) = &self.metadata_file {
            args.push(flag_with_path("--metadata-file=", meta));
        }

        args
    }
}

fn flag_with_path(flag: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(flag);
    arg.push(path.as_os_str());
    arg
}

/// Diagnostics from renderer stderr, split by severity.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Splits renderer stderr into labelled warnings and errors.
///
/// - `[WARNING] x` is a Pandoc warning
/// - `[ERROR] x` is a Pandoc error
/// - `! x` is a TeX error
/// - `error: x` is a Tectonic error
/// - any other non-empty line is an error, kept verbatim
pub fn clean_stderr(stderr: &str) -> Diagnostics {
    let mut diagnostics = Diagnostics::default();

    for line in stderr.lines().map(str::trim_end).filter(|l| !l.is_empty()) {
        if let Some(rest) = line.strip_prefix("[WARNING] ") {
            diagnostics.warnings.push(format!("Pandoc: {}", rest));
        } else if let Some(rest) = line.strip_prefix("[ERROR] ") {
            diagnostics.errors.push(format!("Pandoc: {}", rest));
        } else if let Some(rest) = line.strip_prefix("! ") {
            diagnostics.errors.push(format!("TeX: {}", rest));
        } else if let Some(rest) = line.strip_prefix("error: ") {
            diagnostics.errors.push(format!("Tectonic: {}", rest));
        } else {
            diagnostics.errors.push(line.to_string());
        }
    }
    diagnostics
}

/// Describes a Pandoc exit code.
pub fn describe_exit_code(code: Option<i32>) -> &'static str {
    match code {
        None => "terminated by signal",
        Some(1) => "I/O error",
        Some(3) => "failed to load reference document",
        Some(4) => "application error",
        Some(5) => "template error",
        Some(6) => "option error",
        Some(21) => "unknown reader",
        Some(22) => "unknown writer",
        Some(23) => "unsupported extension",
        Some(24) => "citeproc error",
        Some(25) => "bibliography error",
        Some(31) => "EPUB subdirectory error",
        Some(43) => "PDF error",
        Some(44) => "XML error",
        Some(47) => "PDF engine not found",
        Some(61) => "HTTP error",
        Some(62) => "internal error",
        Some(63) => "could not open file",
        Some(64) => "parse error",
        Some(65) => "parsec error",
        Some(66) => "PDF creation failed",
        Some(67) => "syntax map error",
        Some(83) => "filter error",
        Some(84) => "Lua error",
        Some(91) => "macro loop",
        Some(92) => "UTF-8 decoding error",
        Some(94) => "unsupported charset",
        Some(97) => "could not find data file",
        Some(99) => "resource not found",
        Some(_) => "unknown error",
    }
}
