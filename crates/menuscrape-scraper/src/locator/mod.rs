//! Menu locator.
//!
//! Tries the profile's strategies in cascade order (structured metadata,
//! embedded application state, tagged DOM, heuristic content) against one
//! page snapshot and returns the first non-empty result. A strategy that
//! finds nothing or hits malformed data is a miss, never an error.

mod embedded;
mod heuristic;
pub mod option_sets;
pub mod restaurant;
mod structured;
mod tagged_dom;

use menuscrape_core::{CategoryRule, SiteProfile, StrategyKind};
use scraper::Html;

use crate::extract::NameRules;
use crate::types::{RawCategory, RawItem};

pub(crate) use embedded::extract_balanced;

/// Categories found on a page and the strategy that found them.
#[derive(Debug, Clone, Default)]
pub struct LocatedMenu {
    pub categories: Vec<RawCategory>,
    pub strategy: Option<StrategyKind>,
}

impl LocatedMenu {
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }
}

/// Locates the raw menu in `html` using `profile`'s strategies.
///
/// Returns an empty [`LocatedMenu`] when every strategy misses.
#[must_use]
pub fn locate(html: &str, profile: &SiteProfile) -> LocatedMenu {
    let document = Html::parse_document(html);
    let rules = NameRules::new(&profile.name_filter);

    for strategy in profile.strategy_order() {
        let categories = match strategy {
            StrategyKind::StructuredMetadata => structured::locate(html, profile, &rules),
            StrategyKind::EmbeddedState => embedded::locate(html, profile, &rules),
            StrategyKind::TaggedDom => tagged_dom::locate(&document, profile, &rules),
            StrategyKind::HeuristicContent => heuristic::locate(&document, profile, &rules),
        };
        let categories = retain_nonempty(categories);

        if categories.is_empty() {
            tracing::debug!(site = %profile.id, %strategy, "strategy found no menu data");
            continue;
        }

        let located = LocatedMenu {
            categories,
            strategy: Some(strategy),
        };
        tracing::debug!(
            site = %profile.id,
            %strategy,
            categories = located.categories.len(),
            count = located.item_count(),
            "located menu"
        );
        return located;
    }

    tracing::warn!(site = %profile.id, "no menu data located by any strategy");
    LocatedMenu::default()
}

fn retain_nonempty(categories: Vec<RawCategory>) -> Vec<RawCategory> {
    categories
        .into_iter()
        .filter(|c| !c.items.is_empty())
        .collect()
}

/// Category for an item title from ordered keyword rules.
pub(crate) fn infer_category<'p>(
    title: &str,
    rules: &'p [CategoryRule],
    default_category: &'p str,
) -> &'p str {
    rules
        .iter()
        .find(|rule| rule.any.iter().any(|kw| title.contains(kw.as_str())))
        .map_or(default_category, |rule| rule.category.as_str())
}

/// Groups items by inferred category, keeping first-seen category order.
pub(crate) fn group_by_inferred_category(
    items: Vec<RawItem>,
    rules: &[CategoryRule],
    default_category: &str,
) -> Vec<RawCategory> {
    let mut categories: Vec<RawCategory> = Vec::new();
    for item in items {
        let name = infer_category(&item.name, rules, default_category);
        match categories.iter_mut().find(|c| c.name == name) {
            Some(category) => category.items.push(item),
            None => categories.push(RawCategory::new(name, vec![item])),
        }
    }
    categories
}

#[cfg(test)]
#[path = "locator_test.rs"]
mod tests;
