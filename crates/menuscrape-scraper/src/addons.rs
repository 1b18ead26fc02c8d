//! Normalizes site-native customization data into canonical add-on groups.

use std::sync::LazyLock;

use menuscrape_core::{AddOnGroup, AddOnOption, PortionRule, SiteProfile};
use regex::Regex;
use rust_decimal::Decimal;

use crate::parse::{format_modifier, round_cents};
use crate::types::{ChoiceGroup, RawItem, RawOptions};

static PORTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Whole \(([^)]*)\),\s*Half \(([^)]*)\)").expect("valid regex")
});

/// Builds the add-on groups for one item.
///
/// Canonical groups pass through; choice lists become options (upsize
/// choices get the profile's upsize price); an item with nothing gets the
/// profile's default catalog when its text names a configurable dish. Portion
/// and size groups are appended independently of all that.
#[must_use]
pub fn normalize_addons(item: &RawItem, profile: &SiteProfile) -> Vec<AddOnGroup> {
    let mut groups = match &item.raw_options {
        RawOptions::None => Vec::new(),
        RawOptions::Groups(groups) => groups.clone(),
        RawOptions::Choices(choices) => choice_groups(choices, profile),
    };

    if groups.is_empty() {
        if let Some(defaults) = &profile.default_addons {
            let text = format!("{} {}", item.name, item.description.as_deref().unwrap_or_default())
                .to_lowercase();
            if defaults.keywords.iter().any(|kw| text.contains(&kw.to_lowercase())) {
                groups.extend(defaults.groups.iter().cloned());
            }
        }
    }

    if let Some(rule) = &profile.portion {
        if let Some(portion) = item
            .description
            .as_deref()
            .and_then(|desc| portion_group(desc, item.price, rule))
        {
            groups.push(portion);
        }
    }

    let name = item.name.to_lowercase();
    for rule in &profile.size_groups {
        let matches = rule
            .name_keywords
            .iter()
            .any(|kw| name.contains(&kw.to_lowercase()));
        if matches && !groups.iter().any(|g| g.group_name == rule.group_name) {
            groups.push(AddOnGroup::new(rule.group_name.clone(), rule.options.clone()));
        }
    }

    groups
}

fn choice_groups(choices: &[ChoiceGroup], profile: &SiteProfile) -> Vec<AddOnGroup> {
    choices
        .iter()
        .filter(|group| !group.choices.is_empty())
        .map(|group| {
            let options = group
                .choices
                .iter()
                .map(|choice| {
                    let lower = choice.to_lowercase();
                    let upsize = profile
                        .upsize_keywords
                        .iter()
                        .any(|kw| lower.contains(&kw.to_lowercase()));
                    if upsize {
                        AddOnOption::new(choice.clone(), profile.upsize_price.clone())
                    } else {
                        AddOnOption::free(choice.clone())
                    }
                })
                .collect();
            AddOnGroup::new(group.name.clone(), options)
        })
        .collect()
}

/// `Whole (..), Half (..)` in a description yields a portion group. The
/// whole portion costs a percentage of the base price once the base exceeds
/// the free threshold.
fn portion_group(description: &str, base: Option<Decimal>, rule: &PortionRule) -> Option<AddOnGroup> {
    if !PORTION_RE.is_match(description) {
        return None;
    }

    let threshold = Decimal::from(rule.free_threshold_cents) / Decimal::ONE_HUNDRED;
    let whole_price = match base {
        Some(base) if base > threshold => {
            let increment = base * Decimal::from(rule.whole_percent) / Decimal::ONE_HUNDRED;
            format_modifier(round_cents(increment))
        }
        _ => String::new(),
    };

    Some(AddOnGroup::new(
        rule.group_name.clone(),
        vec![AddOnOption::free("Half"), AddOnOption::new("Whole", whole_price)],
    ))
}
