//! Project configuration file (`doctor.toml`) and its translation into
//! Pandoc metadata.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::infra::CONFIG_FILENAME;

/// A value given either as a single string or as a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl StringOrList {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            StringOrList::One(s) => vec![s.clone()],
            StringOrList::Many(v) => v.clone(),
        }
    }
}

/// Configuration of a document project.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub build: BuildConfig,
    pub meta: MetaConfig,
    pub style: StyleConfig,
    pub bib: BibConfig,
    pub latex: LatexConfig,
    pub html: HtmlConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct BuildConfig {
    /// Output filename without extension
    pub filename: String,
    /// PDF engine executable
    pub engine: String,
    pub lua_filters: bool,
    /// Pandoc output format, also used as the file extension
    pub output_format: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            filename: "document".to_string(),
            engine: "pdflatex".to_string(),
            lua_filters: true,
            output_format: "pdf".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetaConfig {
    pub title: Option<String>,
    pub author: Option<StringOrList>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct StyleConfig {
    pub document_class: String,
    pub class_options: Option<StringOrList>,
    pub number_sections: bool,
    pub two_column: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            document_class: "article".to_string(),
            class_options: None,
            number_sections: false,
            two_column: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct BibConfig {
    /// Bibliography filename inside `assets/`
    pub bibliography_file: String,
    pub csl: Option<String>,
    pub references_title: Option<String>,
    pub link_citations: bool,
    pub include_bibliography: bool,
}

impl Default for BibConfig {
    fn default() -> Self {
        Self {
            bibliography_file: "references.bib".to_string(),
            csl: None,
            references_title: None,
            link_citations: true,
            include_bibliography: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LatexConfig {
    /// Raw LaTeX added to the preamble
    pub header: Option<String>,
    pub packages: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HtmlConfig {
    /// Raw HTML added to the head
    pub header: Option<String>,
}

/// Metadata passed to Pandoc with `--metadata-file`.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PandocMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub author: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub documentclass: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classoption: Vec<String>,
    pub numbersections: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_section_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csl: Option<String>,
    pub link_citations: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_includes: Option<String>,
    pub suppress_bibliography: bool,
}

impl ProjectConfig {
    /// Loads `doctor.toml` from the project root.
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::path(root);

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    pub fn path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILENAME)
    }

    /// Contents of the config file written by `doctor new`.
    pub fn template(title: &str) -> String {
        format!(
            "[meta]\ntitle = \"{}\"\nauthor = \"AUTHOR\"\ndate = \"today\"\n",
            title.replace('\\', "\\\\").replace('"', "\\\"")
        )
    }

    /// Returns true when the output goes through LaTeX.
    pub fn is_latex_output(&self) -> bool {
        matches!(self.build.output_format.as_str(), "pdf" | "latex")
    }

    /// Builds the Pandoc metadata for a build happening today.
    pub fn to_metadata(&self) -> PandocMetadata {
        self.to_metadata_on(Local::now().date_naive())
    }

    /// Builds the Pandoc metadata, resolving special dates to `today`.
    pub fn to_metadata_on(&self, today: NaiveDate) -> PandocMetadata {
        let mut classoption = self
            .style
            .class_options
            .as_ref()
            .map(StringOrList::to_vec)
            .unwrap_or_default();
        if self.style.two_column && !classoption.iter().any(|o| o == "twocolumn") {
            classoption.push("twocolumn".to_string());
        }

        PandocMetadata {
            title: self.meta.title.clone(),
            author: self
                .meta
                .author
                .as_ref()
                .map(StringOrList::to_vec)
                .unwrap_or_default(),
            date: self.meta.date.as_deref().map(|d| self.resolve_date(d, today)),
            documentclass: self.style.document_class.clone(),
            classoption,
            numbersections: self.style.number_sections,
            reference_section_title: self.bib.references_title.clone(),
            csl: self.bib.csl.clone(),
            link_citations: self.bib.link_citations,
            header_includes: self.header_includes(),
            suppress_bibliography: !self.bib.include_bibliography,
        }
    }

    fn resolve_date(&self, date: &str, today: NaiveDate) -> String {
        match date.to_lowercase().as_str() {
            "today" | "now" | "present" => {
                if self.is_latex_output() {
                    "\\today".to_string()
                } else {
                    today.format("%B %-d, %Y").to_string()
                }
            }
            _ => date.to_string(),
        }
    }

    fn header_includes(&self) -> Option<String> {
        if self.is_latex_output() {
            let mut lines: Vec<String> = self
                .latex
                .packages
                .iter()
                .map(|p| {
                    if p.starts_with('[') || p.starts_with('{') {
                        format!("\\usepackage{}", p)
                    } else {
                        format!("\\usepackage{{{}}}", p)
                    }
                })
                .collect();
            lines.extend(self.latex.header.iter().cloned());
            (!lines.is_empty()).then(|| lines.join("\n"))
        } else if self.build.output_format == "html" {
            self.html.header.clone()
        } else {
            None
        }
    }
}

/// Resolves the command used to open files for editing.
///
/// Precedence order:
/// 1. $EDITOR environment variable
/// 2. $VISUAL environment variable
/// 3. The platform's default opener
pub fn editor() -> String {
    std::env::var("EDITOR")
        .ok()
        .filter(|e| !e.trim().is_empty())
        .or_else(|| std::env::var("VISUAL").ok().filter(|e| !e.trim().is_empty()))
        .unwrap_or_else(|| default_opener().to_string())
}

fn default_opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(windows) {
        "cmd /C start"
    } else {
        "xdg-open"
    }
}
