//! Build command handler.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::config::{PandocMetadata, ProjectConfig};
use crate::cli::msg::{self, Spinner};
use crate::infra::{
    ASSETS_DIR, BUILD_FILTERS, RenderError, RenderPlan, SECTIONS_DIR, SectionStore, StoreError,
    clean_stderr, data_dir, describe_exit_code, find_executable, run_renderer, write_file,
};

const METADATA_FILENAME: &str = ".metadata.json";

pub fn handle_build(root: &Path) -> Result<()> {
    let pandoc =
        find_executable("pandoc").context("build failed, could not find pandoc on your PATH")?;

    msg::info("Applying configuration from doctor.toml...");
    let config = ProjectConfig::load(root)?;

    let pdf_engine = if config.build.output_format == "pdf" {
        let engine = &config.build.engine;
        let path = find_executable(engine)
            .with_context(|| format!("build failed, could not find the PDF engine '{}'", engine))?;
        Some((path, engine == "tectonic"))
    } else {
        None
    };

    msg::info("Looking for source files...");
    let store = match SectionStore::open(root) {
        Ok(store) => store,
        Err(StoreError::NoSections { .. }) => bail!("there are no sections to build"),
        Err(e) => return Err(e).context("could not load section list"),
    };
    let plural = if store.len() == 1 { "" } else { "s" };
    msg::info(&format!("Found {} source file{}!", store.len(), plural));

    let filters = if config.build.lua_filters {
        msg::info("Running with Lua filters...");
        install_build_filters()
    } else {
        Vec::new()
    };

    let mut plan = render_plan(root, &config, &store);
    plan.pdf_engine = pdf_engine;
    plan.filters = filters;
    if plan.bibliography.is_some() {
        msg::info(&format!(
            "Running with citeproc. Bibliography: '{}'.",
            config.bib.bibliography_file
        ));
    } else {
        msg::warning(&format!(
            "Could not find bibliography file: '{}'. Skipping citation processing.",
            config.bib.bibliography_file
        ));
    }

    let metadata = MetadataFile::write(root, &config.to_metadata())?;
    plan.metadata_file = Some(metadata.path.clone());

    let args = plan.args();
    debug!("pandoc arguments: {:?}", args);

    let spinner = Spinner::start("Building document with Pandoc");
    let outcome = run_renderer(&pandoc, &args);
    spinner.stop();
    drop(metadata);

    report(outcome)
}

/// Builds the Pandoc invocation for the document at `root`.
///
/// The PDF engine, filters and metadata file are resolved by the caller.
pub(crate) fn render_plan(root: &Path, config: &ProjectConfig, store: &SectionStore) -> RenderPlan {
    let output = root.join(format!(
        "{}.{}",
        config.build.filename, config.build.output_format
    ));
    let bibliography = root.join(ASSETS_DIR).join(&config.bib.bibliography_file);

    RenderPlan {
        output,
        resource_paths: vec![
            root.to_path_buf(),
            root.join(ASSETS_DIR),
            root.join(SECTIONS_DIR),
        ],
        inputs: store.paths().into_iter().map(Path::to_path_buf).collect(),
        bibliography: bibliography.is_file().then_some(bibliography),
        ..Default::default()
    }
}

fn install_build_filters() -> Vec<PathBuf> {
    let Some(dir) = data_dir() else {
        msg::warning("Skipping Lua filters. Could not determine the Doctor data directory.");
        return Vec::new();
    };

    BUILD_FILTERS
        .iter()
        .filter_map(|filter| match filter.install(&dir) {
            Ok(path) => Some(path),
            Err(e) => {
                msg::warning(&format!("Could not create '{}', skipping it. {}", filter.name, e));
                None
            }
        })
        .collect()
}

fn report(outcome: Result<String, RenderError>) -> Result<()> {
    match outcome {
        Ok(_) => {
            msg::success("Document built.");
            Ok(())
        }
        Err(RenderError::Warning { stderr, .. }) => {
            let diagnostics = clean_stderr(&stderr);
            let mut lines = diagnostics.warnings;
            lines.extend(diagnostics.errors);

            msg::success("Document built.");
            msg::warning(&format!(
                "A warning was thrown during build:\n\n{}",
                msg::detail_block(&lines)
            ));
            Ok(())
        }
        Err(RenderError::Fatal { code, stderr }) => {
            let diagnostics = clean_stderr(&stderr);
            if diagnostics.errors.is_empty() {
                bail!("an error happened during build ({})", describe_exit_code(code));
            }
            bail!(
                "an error happened during build ({}):\n\n{}",
                describe_exit_code(code),
                msg::detail_block(&diagnostics.errors)
            );
        }
        Err(e @ RenderError::Other { .. }) => Err(e).context("could not run pandoc"),
    }
}

/// The metadata file handed to Pandoc, removed again when dropped.
struct MetadataFile {
    path: PathBuf,
}

impl MetadataFile {
    fn write(root: &Path, metadata: &PandocMetadata) -> Result<Self> {
        let path = root.join(METADATA_FILENAME);
        let json = serde_json::to_string_pretty(metadata)?;
        write_file(&path, &json).context("could not write metadata for Pandoc")?;
        Ok(Self { path })
    }
}

impl Drop for MetadataFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            msg::error(&format!("Failed to remove JSON metadata file. {}", e));
        }
    }
}
