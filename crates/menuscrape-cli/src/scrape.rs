//! Command handlers for one-off scrape runs.
//!
//! Called from `main` after configuration and site profiles are loaded. A run
//! failure is returned as an error so the process exits non-zero.

use std::path::{Path, PathBuf};

use anyhow::Context;
use menuscrape_core::{AppConfig, ProfileSet, SiteProfile};
use menuscrape_scraper::{scrape_to_file, HttpPageLoader, RunSettings};

/// Base delay for the static loader's retry backoff.
const FETCH_BACKOFF_BASE_MS: u64 = 500;

#[derive(Debug)]
pub(crate) struct ScrapeRequest<'a> {
    pub site: &'a str,
    pub url: Option<&'a str>,
    pub output_dir: Option<&'a Path>,
    pub dry_run: bool,
}

/// A scrape request with every default filled in.
#[derive(Debug)]
pub(crate) struct ResolvedRun<'p> {
    pub profile: &'p SiteProfile,
    pub url: String,
    pub output_dir: PathBuf,
}

/// Looks up the profile and applies the URL and output directory defaults.
///
/// # Errors
///
/// Returns an error naming the known site ids when `request.site` is unknown.
pub(crate) fn resolve_run<'p>(
    config: &AppConfig,
    profiles: &'p ProfileSet,
    request: &ScrapeRequest<'_>,
) -> anyhow::Result<ResolvedRun<'p>> {
    let profile = profiles.get(request.site).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown site '{}'; known sites: [{}]",
            request.site,
            profiles.ids().join(", ")
        )
    })?;

    let url = request
        .url
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(&profile.default_url)
        .to_string();
    let output_dir = request
        .output_dir
        .map_or_else(|| config.output_dir.clone(), Path::to_path_buf);

    Ok(ResolvedRun {
        profile,
        url,
        output_dir,
    })
}

/// Runs one site's pipeline, writes its menu file and prints the run report.
///
/// # Errors
///
/// Returns an error if the site is unknown, the page session cannot be
/// built, or the run fails.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    profiles: &ProfileSet,
    request: &ScrapeRequest<'_>,
) -> anyhow::Result<()> {
    let run = resolve_run(config, profiles, request)?;
    let target = run.output_dir.join(&run.profile.output_file);

    if request.dry_run {
        println!(
            "dry-run: would scrape {} from {} into {}",
            run.profile.id,
            run.url,
            target.display()
        );
        return Ok(());
    }

    let loader = HttpPageLoader::new(config.fetch_max_retries, FETCH_BACKOFF_BASE_MS)
        .context("failed to build page loader")?;
    let settings = RunSettings::from_config(config);

    tracing::info!(site = %run.profile.id, url = %run.url, "starting scrape");
    let report = scrape_to_file(&loader, run.profile, &run.url, &settings, &run.output_dir)
        .await
        .with_context(|| format!("scrape of {} failed", run.profile.id))?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    tracing::info!(
        site = %run.profile.id,
        count = report.total_items,
        path = %target.display(),
        "menu written"
    );
    Ok(())
}

pub(crate) fn profile_line(profile: &SiteProfile) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        profile.id, profile.display_name, profile.output_file, profile.default_url
    )
}

pub(crate) fn print_profiles(profiles: &ProfileSet) {
    for profile in profiles.iter() {
        println!("{}", profile_line(profile));
    }
}
