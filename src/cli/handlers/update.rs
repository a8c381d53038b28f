//! `--update`: check GitHub for a newer release.

use anyhow::{Context, Result, bail};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::cli::msg;

const LATEST_RELEASE_URL: &str = "https://api.github.com/repos/kmaasrud/doctor/releases/latest";
const INSTALL_COMMAND: &str = "cargo install doctor --force";

#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
}

pub fn handle_update() -> Result<()> {
    let current = env!("CARGO_PKG_VERSION");

    let spinner = msg::Spinner::start("Looking for new version...");
    let latest = fetch_latest_tag();
    spinner.stop();
    let latest = latest?;

    if is_newer(&latest, current)? {
        msg::info(&format!(
            "Version {} is available (you have v{}).\n    Run '{}' to update.",
            latest, current, INSTALL_COMMAND
        ));
    } else {
        msg::success("Current version is the latest!");
    }
    Ok(())
}

fn fetch_latest_tag() -> Result<String> {
    let client = Client::builder()
        .timeout(Duration::from_secs(10))
        .user_agent(concat!("doctor/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("could not create HTTP client")?;

    let body = client
        .get(LATEST_RELEASE_URL)
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.text())
        .context("error occurred while detecting version")?;

    let release: Release =
        serde_json::from_str(&body).context("unexpected response from GitHub")?;
    Ok(release.tag_name)
}

/// Parses `vMAJOR.MINOR.PATCH` (the `v` is optional).
pub(crate) fn parse_version(version: &str) -> Result<(u64, u64, u64)> {
    let trimmed = version.trim().trim_start_matches('v');
    let core = trimmed.split(['-', '+']).next().unwrap_or_default();

    let parts = core
        .split('.')
        .map(|p| p.parse::<u64>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("invalid version '{}'", version))?;

    match parts.as_slice() {
        [major, minor, patch] => Ok((*major, *minor, *patch)),
        _ => bail!("invalid version '{}'", version),
    }
}

/// Returns true when `latest` is a higher version than `current`.
pub(crate) fn is_newer(latest: &str, current: &str) -> Result<bool> {
    Ok(parse_version(latest)? > parse_version(current)?)
}
