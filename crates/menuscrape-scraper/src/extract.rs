//! Item field extraction and name filtering.

use std::sync::LazyLock;

use menuscrape_core::{AddOnGroup, AddOnOption, DomSelectors, NameFilter, SiteProfile};
use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::dom;
use crate::parse::parse_price;
use crate::types::{ChoiceGroup, RawItem, RawOptions};

static IMG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| dom::static_selector("img[src]"));
static LABEL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| dom::static_selector("label[for]"));

/// Where an item sits: its category and its position among the category's
/// raw item nodes (before any filtering).
#[derive(Debug, Clone, Copy)]
pub struct ExtractContext<'p> {
    pub profile: &'p SiteProfile,
    pub category: &'p str,
    pub index: usize,
}

/// Compiled name filter for one profile.
#[derive(Debug, Clone)]
pub struct NameRules {
    min_len: usize,
    deny_substrings: Vec<String>,
    deny_substrings_ci: Vec<String>,
    deny_pattern: Option<Regex>,
}

impl NameRules {
    #[must_use]
    pub fn new(filter: &NameFilter) -> Self {
        let deny_pattern = filter
            .deny_pattern
            .as_deref()
            .and_then(|raw| match Regex::new(&format!("^(?:{raw})$")) {
                Ok(re) => Some(re),
                Err(err) => {
                    tracing::warn!(pattern = raw, error = %err, "ignoring invalid name deny pattern");
                    None
                }
            });
        Self {
            min_len: filter.min_len.max(1),
            deny_substrings: filter.deny_substrings.clone(),
            deny_substrings_ci: filter
                .deny_substrings_ci
                .iter()
                .map(|s| s.to_lowercase())
                .collect(),
            deny_pattern,
        }
    }

    /// True when `name` (already trimmed) is a real item name.
    #[must_use]
    pub fn accepts(&self, name: &str) -> bool {
        if name.chars().count() < self.min_len {
            return false;
        }
        if self.deny_substrings.iter().any(|d| name.contains(d.as_str())) {
            return false;
        }
        let lowered = name.to_lowercase();
        if self
            .deny_substrings_ci
            .iter()
            .any(|d| lowered.contains(d.as_str()))
        {
            return false;
        }
        !self.deny_pattern.as_ref().is_some_and(|re| re.is_match(name))
    }
}

/// Applies the positional remap and the name filter.
///
/// Returns the name to use, or `None` when the item must be dropped.
#[must_use]
pub fn resolve_name(raw: &str, ctx: &ExtractContext<'_>, rules: &NameRules) -> Option<String> {
    let mut name = dom::collapse_whitespace(raw);

    if let Some(remap) = &ctx.profile.name_remap {
        if ctx.category.trim().eq_ignore_ascii_case(remap.category.trim())
            && name.contains(remap.marker.as_str())
        {
            if let Some(replacement) = remap.names.get(ctx.index) {
                tracing::debug!(
                    category = ctx.category,
                    index = ctx.index,
                    replacement = replacement.as_str(),
                    "remapped placeholder item name"
                );
                name.clone_from(replacement);
            }
        }
    }

    rules.accepts(&name).then_some(name)
}

/// Compiled per-field selectors for the tagged-DOM strategy.
pub(crate) struct FieldSelectors {
    name: Vec<Selector>,
    price: Vec<Selector>,
    description: Vec<Selector>,
    image: Vec<Selector>,
    img_fallback: bool,
    badge: Vec<Selector>,
    option_group: Vec<Selector>,
    option_group_title: Vec<Selector>,
    option_choice: Vec<Selector>,
}

impl FieldSelectors {
    pub(crate) fn new(dom_selectors: &DomSelectors) -> Self {
        Self {
            name: dom::compile(&dom_selectors.name),
            price: dom::compile(&dom_selectors.price),
            description: dom::compile(&dom_selectors.description),
            image: dom::compile(&dom_selectors.image),
            img_fallback: dom_selectors.img_fallback,
            badge: dom::compile(&dom_selectors.badge),
            option_group: dom::compile(&dom_selectors.option_group),
            option_group_title: dom::compile(&dom_selectors.option_group_title),
            option_choice: dom::compile(&dom_selectors.option_choice),
        }
    }
}

/// Extracts one item from its DOM node, or `None` when it has no usable name.
pub(crate) fn extract_fields(
    node: ElementRef<'_>,
    fields: &FieldSelectors,
    rules: &NameRules,
    ctx: &ExtractContext<'_>,
) -> Option<RawItem> {
    let raw_name = dom::first_text(node, &fields.name)?;
    let name = resolve_name(&raw_name, ctx, rules)?;

    let price_text = dom::first_text(node, &fields.price);
    let price = price_text.as_deref().and_then(parse_price);

    let description = fields
        .description
        .iter()
        .flat_map(|s| node.select(s))
        .map(dom::text_of)
        .find(|t| !t.is_empty() && Some(t) != price_text.as_ref() && *t != name);

    let image_url = extract_image(node, fields);

    let dietary = extract_badges(node, fields, ctx.profile);

    let choices = extract_choice_groups(
        node,
        &fields.option_group,
        &fields.option_group_title,
        &fields.option_choice,
    );
    let raw_options = if !choices.is_empty() {
        RawOptions::Choices(choices)
    } else {
        badge_addon_groups(&dietary, ctx.profile).map_or(RawOptions::None, RawOptions::Groups)
    };

    Some(RawItem {
        name,
        price,
        description,
        image_url,
        raw_options,
        dietary,
    })
}

fn extract_image(node: ElementRef<'_>, fields: &FieldSelectors) -> Option<String> {
    let from_markers = fields
        .image
        .iter()
        .flat_map(|s| node.select(s))
        .find_map(dom::element_background);
    if from_markers.is_some() {
        return from_markers;
    }
    if let Some(own) = dom::element_background(node) {
        return Some(own);
    }
    if fields.img_fallback {
        return node
            .select(&IMG_SELECTOR)
            .filter_map(|el| el.value().attr("src"))
            .map(str::trim)
            .find(|src| !src.is_empty() && !src.starts_with("data:"))
            .map(str::to_string);
    }
    None
}

fn extract_badges(node: ElementRef<'_>, fields: &FieldSelectors, profile: &SiteProfile) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for badge in fields.badge.iter().flat_map(|s| node.select(s)) {
        let code = dom::text_of(badge);
        if let Some(label) = profile.badge_label(&code) {
            if !labels.iter().any(|l| l == label) {
                labels.push(label.to_string());
            }
        }
    }
    labels
}

/// Add-on group implied by dietary badges, if the profile defines one.
pub(crate) fn badge_addon_groups(dietary: &[String], profile: &SiteProfile) -> Option<Vec<AddOnGroup>> {
    let options: Vec<AddOnOption> = profile
        .badge_addons
        .iter()
        .filter(|b| dietary.iter().any(|d| d == &b.dietary))
        .map(|b| AddOnOption::new(b.option.clone(), b.price.clone()))
        .collect();
    if options.is_empty() {
        None
    } else {
        Some(vec![AddOnGroup::new(profile.badge_addon_group.clone(), options)])
    }
}

/// Reads option groups under `scope`. Group title defaults to `Options`;
/// radio and checkbox inputs contribute their label text.
pub(crate) fn extract_choice_groups(
    scope: ElementRef<'_>,
    group_selectors: &[Selector],
    title_selectors: &[Selector],
    choice_selectors: &[Selector],
) -> Vec<ChoiceGroup> {
    let mut groups = Vec::new();
    for group in dom::all_matches(scope, group_selectors) {
        let name = dom::first_text(group, title_selectors).unwrap_or_else(|| "Options".to_string());
        let mut choices: Vec<String> = Vec::new();
        for choice in dom::all_matches(group, choice_selectors) {
            let label = choice_label(choice, scope);
            if let Some(label) = label {
                if label != name && !choices.contains(&label) {
                    choices.push(label);
                }
            }
        }
        if !choices.is_empty() {
            groups.push(ChoiceGroup { name, choices });
        }
    }
    groups
}

fn choice_label(choice: ElementRef<'_>, scope: ElementRef<'_>) -> Option<String> {
    let element = choice.value();
    if element.name() == "input" {
        if let Some(id) = element.attr("id") {
            let label = scope
                .select(&LABEL_SELECTOR)
                .find(|l| l.value().attr("for") == Some(id))
                .map(dom::text_of);
            if let Some(label) = label.filter(|t| !t.is_empty()) {
                return Some(label);
            }
        }
        if let Some(parent) = choice.parent().and_then(ElementRef::wrap) {
            if parent.value().name() == "label" {
                let text = dom::text_of(parent);
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
        return element
            .attr("aria-label")
            .or_else(|| element.attr("value"))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
    }
    let text = dom::text_of(choice);
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
