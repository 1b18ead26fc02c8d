//! Strategy 3: category and item markers in the DOM.

use std::collections::HashMap;
use std::sync::LazyLock;

use menuscrape_core::{CategoryLayout, SiteProfile};
use scraper::{ElementRef, Html, Selector};

use super::group_by_inferred_category;
use crate::dom;
use crate::extract::{extract_fields, ExtractContext, FieldSelectors, NameRules};
use crate::types::{RawCategory, RawItem};

const UNTITLED_CATEGORY: &str = "Menu";

static ID_SELECTOR: LazyLock<Selector> = LazyLock::new(|| dom::static_selector("[id]"));

pub(super) fn locate(document: &Html, profile: &SiteProfile, rules: &NameRules) -> Vec<RawCategory> {
    let config = &profile.dom;
    let fields = FieldSelectors::new(config);
    let item_selectors = dom::compile(&config.item);
    let root = document.root_element();

    let category_nodes = dom::all_matches(root, &dom::compile(&config.category));
    if category_nodes.is_empty() {
        return flat_items(root, profile, &fields, rules);
    }

    let title_selectors = dom::compile(&config.category_title);
    let sections = match config.layout {
        CategoryLayout::Linked { .. } => elements_by_id(document),
        CategoryLayout::Nested => HashMap::new(),
    };
    let mut categories = Vec::new();

    for category_node in category_nodes {
        let (name, scope) = match &config.layout {
            CategoryLayout::Nested => {
                let name = dom::first_text(category_node, &title_selectors)
                    .unwrap_or_else(|| UNTITLED_CATEGORY.to_string());
                (name, Some(category_node))
            }
            CategoryLayout::Linked { id_prefix } => {
                let name = dom::text_of(category_node);
                let scope = category_node
                    .value()
                    .id()
                    .and_then(|id| id.strip_prefix(id_prefix.as_str()))
                    .and_then(|section_id| sections.get(section_id).copied());
                (name, scope)
            }
        };

        if name.is_empty() || is_excluded(&name, profile) {
            tracing::debug!(category = %name, "skipping non-menu category");
            continue;
        }
        let Some(scope) = scope else {
            tracing::debug!(category = %name, "category has no matching item section");
            continue;
        };

        let items = extract_items(scope, &item_selectors, &fields, rules, profile, &name);
        if !items.is_empty() {
            categories.push(RawCategory::new(name, items));
        }
    }

    categories
}

fn flat_items(
    root: ElementRef<'_>,
    profile: &SiteProfile,
    fields: &FieldSelectors,
    rules: &NameRules,
) -> Vec<RawCategory> {
    let flat_selectors = dom::compile(&profile.dom.flat_item);
    let items = extract_items(
        root,
        &flat_selectors,
        fields,
        rules,
        profile,
        &profile.default_category,
    );
    if !items.is_empty() {
        tracing::debug!(site = %profile.id, count = items.len(), "no category markers; grouped flat items");
    }
    group_by_inferred_category(items, &profile.category_rules, &profile.default_category)
}

fn extract_items(
    scope: ElementRef<'_>,
    item_selectors: &[Selector],
    fields: &FieldSelectors,
    rules: &NameRules,
    profile: &SiteProfile,
    category: &str,
) -> Vec<RawItem> {
    dom::all_matches(scope, item_selectors)
        .into_iter()
        .enumerate()
        .filter_map(|(index, node)| {
            let ctx = ExtractContext {
                profile,
                category,
                index,
            };
            extract_fields(node, fields, rules, &ctx)
        })
        .collect()
}

/// First element carrying each `id`, in document order.
fn elements_by_id(document: &Html) -> HashMap<&str, ElementRef<'_>> {
    let mut index = HashMap::new();
    for el in document.select(&ID_SELECTOR) {
        if let Some(id) = el.value().id() {
            index.entry(id).or_insert(el);
        }
    }
    index
}

fn is_excluded(name: &str, profile: &SiteProfile) -> bool {
    profile
        .excluded_categories
        .iter()
        .any(|ex| name.contains(ex.as_str()))
}
