//! Image reconciliation for items the extractor left without an image.
//!
//! The page-wide pool is tried first; the click-through detail view is the
//! last resort and runs strictly one item at a time.

pub mod interactive;
pub mod matching;
pub mod pool;

use std::time::Duration;

use menuscrape_core::SiteProfile;

pub use interactive::{dismiss_popups, DetailView};
pub use matching::{find_image, MatchKind};
pub use pool::{build_pool, ImagePool, PoolEntry};

use crate::page::PageHandle;
use crate::types::{RawCategory, RawOptions};

/// Counts from one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub from_pool: usize,
    pub from_detail_view: usize,
    /// Items still without an image. They are kept as-is.
    pub missing: usize,
}

/// Fills missing images from the pool. Returns the number filled.
pub fn reconcile_from_pool(categories: &mut [RawCategory], pool: &ImagePool) -> usize {
    if pool.is_empty() {
        return 0;
    }
    let mut filled = 0usize;
    for item in categories
        .iter_mut()
        .flat_map(|c| c.items.iter_mut())
        .filter(|i| i.image_url.is_none())
    {
        if let Some((entry, kind)) = find_image(&item.name, pool) {
            tracing::debug!(item = %item.name, label = %entry.label, ?kind, "matched pooled image");
            item.image_url = Some(entry.url.clone());
            filled += 1;
        }
    }
    filled
}

/// Opens the detail view of each item still missing an image. Detail views
/// also supply add-on groups for items that have none.
///
/// Stops at the first sign the session cannot interact at all.
pub async fn reconcile_interactive<P: PageHandle>(
    page: &P,
    html: &str,
    categories: &mut [RawCategory],
    profile: &SiteProfile,
) -> usize {
    let Some(config) = &profile.interactive else {
        return 0;
    };

    let names: Vec<String> = categories
        .iter()
        .flat_map(|c| &c.items)
        .filter(|i| i.image_url.is_none())
        .map(|i| i.name.clone())
        .collect();
    if names.is_empty() {
        return 0;
    }
    let targets = interactive::click_targets(html, config, &profile.dom.name, &names);
    let timeout = Duration::from_secs(config.overlay_timeout_secs);

    let mut filled = 0usize;
    for item in categories
        .iter_mut()
        .flat_map(|c| c.items.iter_mut())
        .filter(|i| i.image_url.is_none())
    {
        let Some(target) = targets.get(&item.name) else {
            continue;
        };
        match interactive::open_detail(page, config, target, timeout).await {
            Ok(view) => {
                if view.image_url.is_some() {
                    item.image_url = view.image_url;
                    filled += 1;
                }
                if item.raw_options.is_none() && !view.groups.is_empty() {
                    item.raw_options = RawOptions::Groups(view.groups);
                }
            }
            Err(err) if err.is_unsupported() => {
                tracing::info!(site = %profile.id, "page session cannot open detail views; skipping");
                break;
            }
            Err(err) => {
                tracing::debug!(item = %item.name, error = %err, "detail view yielded nothing");
            }
        }
    }
    filled
}

/// Pool pass, then the interactive pass, over one page snapshot.
pub async fn reconcile_images<P: PageHandle>(
    page: &P,
    html: &str,
    categories: &mut [RawCategory],
    profile: &SiteProfile,
) -> ReconcileSummary {
    let pool = build_pool(html, &profile.image_pool);
    let from_pool = reconcile_from_pool(categories, &pool);
    let from_detail_view = reconcile_interactive(page, html, categories, profile).await;
    let missing = categories
        .iter()
        .flat_map(|c| &c.items)
        .filter(|i| i.image_url.is_none())
        .count();

    let summary = ReconcileSummary {
        from_pool,
        from_detail_view,
        missing,
    };
    tracing::debug!(site = %profile.id, ?summary, "reconciled images");
    summary
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;
