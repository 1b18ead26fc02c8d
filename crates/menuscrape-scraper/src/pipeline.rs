//! Menu run orchestration.
//!
//! One run owns one page session and walks the stages in order:
//! load, locate, extract, reconcile images, normalize add-ons, transform.
//! Strategy misses and per-item anomalies only shrink the result; the run
//! fails only when the page cannot be loaded or read. The session is closed
//! on both outcomes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use menuscrape_core::config::DEFAULT_USER_AGENT;
use menuscrape_core::{AppConfig, CanonicalMenuItem, SiteProfile, StrategyKind};
use serde::Serialize;

use crate::addons::normalize_addons;
use crate::error::ScraperError;
use crate::locator::option_sets::{expand_option_sets, state_expression, state_from_html};
use crate::locator::restaurant::extract_restaurant;
use crate::locator::locate;
use crate::output::write_menu;
use crate::page::{LoadOptions, PageHandle, PageLoader};
use crate::reconcile::{dismiss_popups, reconcile_images};
use crate::transform::{transform_menu, PreparedCategory, PreparedItem};
use crate::types::{RawCategory, RestaurantInfo};

/// Where a run is. `Failed` is reachable from every stage before `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    LoadingPage,
    LocatingCategories,
    ExtractingItems,
    ReconcilingImages,
    NormalizingAddOns,
    Transforming,
    Done,
    Failed,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStage::Idle => write!(f, "idle"),
            PipelineStage::LoadingPage => write!(f, "loading_page"),
            PipelineStage::LocatingCategories => write!(f, "locating_categories"),
            PipelineStage::ExtractingItems => write!(f, "extracting_items"),
            PipelineStage::ReconcilingImages => write!(f, "reconciling_images"),
            PipelineStage::NormalizingAddOns => write!(f, "normalizing_add_ons"),
            PipelineStage::Transforming => write!(f, "transforming"),
            PipelineStage::Done => write!(f, "done"),
            PipelineStage::Failed => write!(f, "failed"),
        }
    }
}

/// Per-run timeouts and debug output.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub page_load_timeout: Duration,
    pub selector_timeout: Duration,
    pub user_agent: String,
    /// When set, the rendered HTML and a screenshot are saved here.
    pub debug_dir: Option<PathBuf>,
}

impl RunSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            page_load_timeout: Duration::from_secs(config.page_load_timeout_secs),
            selector_timeout: Duration::from_secs(config.selector_timeout_secs),
            user_agent: config.user_agent.clone(),
            debug_dir: config.debug_dir.clone(),
        }
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            page_load_timeout: Duration::from_secs(60),
            selector_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            debug_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub name: String,
    pub item_count: usize,
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct MenuRun {
    pub items: Vec<CanonicalMenuItem>,
    pub categories: Vec<CategorySummary>,
    pub restaurant: RestaurantInfo,
    /// `None` when no strategy found anything; the run still succeeds.
    pub strategy: Option<StrategyKind>,
}

/// What a run-to-file reports back to callers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    pub success: bool,
    pub filename: String,
    pub total_items: usize,
    pub categories: Vec<CategorySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_item: Option<CanonicalMenuItem>,
    pub restaurant: String,
    pub strategy: Option<StrategyKind>,
}

impl PipelineReport {
    fn new(filename: &str, run: MenuRun) -> Self {
        Self {
            success: true,
            filename: filename.to_string(),
            total_items: run.items.len(),
            categories: run.categories,
            sample_item: run.items.into_iter().next(),
            restaurant: run.restaurant.name,
            strategy: run.strategy,
        }
    }
}

/// Runs the full pipeline for `profile` against `url`.
///
/// # Errors
///
/// Returns [`ScraperError::Navigation`] when the page cannot be loaded and
/// [`ScraperError::Page`] when the loaded page cannot be read.
pub async fn run_pipeline<L: PageLoader>(
    loader: &L,
    profile: &SiteProfile,
    url: &str,
    settings: &RunSettings,
) -> Result<MenuRun, ScraperError> {
    let mut stage = PipelineStage::Idle;
    tracing::info!(site = %profile.id, %url, %stage, "starting menu run");

    stage = PipelineStage::LoadingPage;
    let options = LoadOptions {
        timeout: settings.page_load_timeout,
        user_agent: settings.user_agent.clone(),
    };
    let page = match loader.load(url, &options).await {
        Ok(page) => page,
        Err(source) => {
            log_failure(profile, url, &mut stage, &source);
            return Err(ScraperError::Navigation {
                url: url.to_string(),
                source,
            });
        }
    };

    let result = run_on_page(&page, profile, settings, &mut stage).await;
    page.close().await;

    match &result {
        Ok(run) => tracing::info!(
            site = %profile.id,
            %stage,
            categories = run.categories.len(),
            count = run.items.len(),
            "menu run finished"
        ),
        Err(err) => log_failure(profile, url, &mut stage, err),
    }
    result
}

fn log_failure(
    profile: &SiteProfile,
    url: &str,
    stage: &mut PipelineStage,
    err: &dyn std::error::Error,
) {
    let failed_at = std::mem::replace(stage, PipelineStage::Failed);
    tracing::error!(
        site = %profile.id,
        %url,
        %failed_at,
        error = %err,
        "menu run failed"
    );
}

/// A finished run that has been written to disk, with the exact items that
/// were written.
#[derive(Debug, Clone)]
pub struct SavedMenu {
    pub report: PipelineReport,
    pub items: Vec<CanonicalMenuItem>,
}

/// Runs the pipeline and writes the items to the profile's output file
/// under `output_dir`.
///
/// # Errors
///
/// Everything [`run_pipeline`] returns, plus [`ScraperError::Output`] when
/// the file cannot be written.
pub async fn scrape_to_file<L: PageLoader>(
    loader: &L,
    profile: &SiteProfile,
    url: &str,
    settings: &RunSettings,
    output_dir: &Path,
) -> Result<PipelineReport, ScraperError> {
    scrape_and_save(loader, profile, url, settings, output_dir)
        .await
        .map(|saved| saved.report)
}

/// Like [`scrape_to_file`], but also hands back this run's items so callers
/// never have to read the shared file back.
///
/// # Errors
///
/// Same as [`scrape_to_file`].
pub async fn scrape_and_save<L: PageLoader>(
    loader: &L,
    profile: &SiteProfile,
    url: &str,
    settings: &RunSettings,
    output_dir: &Path,
) -> Result<SavedMenu, ScraperError> {
    let run = run_pipeline(loader, profile, url, settings).await?;
    let path = output_dir.join(&profile.output_file);
    write_menu(&path, &run.items).await?;

    tracing::info!(
        site = %profile.id,
        path = %path.display(),
        count = run.items.len(),
        "saved menu"
    );
    let items = run.items.clone();
    Ok(SavedMenu {
        report: PipelineReport::new(&profile.output_file, run),
        items,
    })
}

async fn run_on_page<P: PageHandle>(
    page: &P,
    profile: &SiteProfile,
    settings: &RunSettings,
    stage: &mut PipelineStage,
) -> Result<MenuRun, ScraperError> {
    if let Some(config) = &profile.interactive {
        dismiss_popups(page, config).await;
    }
    if let Some(selector) = &profile.ready_selector {
        if let Err(err) = page.wait_for(selector, settings.selector_timeout).await {
            tracing::warn!(
                site = %profile.id,
                %selector,
                error = %err,
                "menu content did not appear, extracting from the page as loaded"
            );
        }
    }
    let html = page.content().await?;
    if let Some(dir) = &settings.debug_dir {
        save_debug_artifacts(page, dir, &profile.id, &html).await;
    }

    *stage = PipelineStage::LocatingCategories;
    let restaurant = extract_restaurant(&html, profile);
    let located = locate(&html, profile);
    let strategy = located.strategy;
    let mut categories = located.categories;

    *stage = PipelineStage::ExtractingItems;
    expand_drink_containers(page, &html, &mut categories, profile).await;

    *stage = PipelineStage::ReconcilingImages;
    reconcile_images(page, &html, &mut categories, profile).await;

    *stage = PipelineStage::NormalizingAddOns;
    let prepared: Vec<PreparedCategory> = categories
        .into_iter()
        .map(|category| PreparedCategory {
            name: category.name,
            items: category
                .items
                .into_iter()
                .map(|raw| PreparedItem {
                    add_ons: normalize_addons(&raw, profile),
                    raw,
                })
                .collect(),
        })
        .collect();

    *stage = PipelineStage::Transforming;
    let summaries: Vec<CategorySummary> = prepared
        .iter()
        .map(|c| CategorySummary {
            name: c.name.clone(),
            item_count: c.items.len(),
        })
        .collect();
    let items = {
        let mut rng = rand::rng();
        transform_menu(&prepared, &restaurant.name, profile, &mut rng)
    };
    for summary in &summaries {
        tracing::debug!(site = %profile.id, category = %summary.name, count = summary.item_count, "category");
    }

    *stage = PipelineStage::Done;
    Ok(MenuRun {
        items,
        categories: summaries,
        restaurant,
        strategy,
    })
}

/// Option-set expansion reads the application state from the live page when
/// the session can evaluate scripts, else from the inline script.
async fn expand_drink_containers<P: PageHandle>(
    page: &P,
    html: &str,
    categories: &mut [RawCategory],
    profile: &SiteProfile,
) {
    let Some(config) = &profile.option_sets else {
        return;
    };
    let live_state = match page.evaluate(&state_expression(config)).await {
        Ok(value) if !value.is_null() => Some(value),
        Ok(_) => None,
        Err(err) => {
            tracing::debug!(site = %profile.id, error = %err, "could not read live application state");
            None
        }
    };
    let Some(state) = live_state.or_else(|| state_from_html(html, config)) else {
        tracing::debug!(site = %profile.id, "no application state for option sets");
        return;
    };
    expand_option_sets(categories, &state, config);
}

async fn save_debug_artifacts<P: PageHandle>(page: &P, dir: &Path, site: &str, html: &str) {
    if let Err(err) = tokio::fs::create_dir_all(dir).await {
        tracing::warn!(dir = %dir.display(), error = %err, "cannot create debug directory");
        return;
    }

    let html_path = dir.join(format!("{site}_debug.html"));
    if let Err(err) = tokio::fs::write(&html_path, html).await {
        tracing::warn!(path = %html_path.display(), error = %err, "failed to save debug HTML");
    }

    match page.screenshot().await {
        Ok(png) => {
            let png_path = dir.join(format!("{site}_debug.png"));
            if let Err(err) = tokio::fs::write(&png_path, png).await {
                tracing::warn!(path = %png_path.display(), error = %err, "failed to save debug screenshot");
            }
        }
        Err(err) => tracing::debug!(error = %err, "no debug screenshot"),
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
