//! Dietary labels, tags, ingredients and spice level from item text.
//!
//! All matching is case-insensitive substring matching over the profile's
//! term lists. Nothing here touches the page.

use menuscrape_core::SiteProfile;

/// Default spice level when no rule matches.
pub const NO_SPICE_LEVEL: &str = " ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub dietary: Vec<String>,
    pub tags: Vec<String>,
    pub ingredients: Vec<String>,
    pub spice_level: String,
}

/// Classifies one item. `badge_dietary` are labels already read from badges
/// on the item card; rule-derived labels are appended after them.
#[must_use]
pub fn classify(
    name: &str,
    description: Option<&str>,
    badge_dietary: &[String],
    profile: &SiteProfile,
) -> Classification {
    let text = format!("{name} {}", description.unwrap_or_default()).to_lowercase();
    let contains_any = |terms: &[String]| terms.iter().any(|t| text.contains(&t.to_lowercase()));

    let mut dietary: Vec<String> = Vec::new();
    for label in badge_dietary {
        push_unique(&mut dietary, label);
    }
    for rule in &profile.dietary_rules {
        if contains_any(&rule.any) && !contains_any(&rule.none) {
            for label in &rule.labels {
                push_unique(&mut dietary, label);
            }
        }
    }

    let mut tags: Vec<String> = Vec::new();
    for rule in &profile.tag_rules {
        if contains_any(&rule.any) {
            push_unique(&mut tags, &rule.tag);
        }
    }
    for mapping in &profile.dietary_tags {
        if dietary.contains(&mapping.dietary) {
            push_unique(&mut tags, &mapping.tag);
        }
    }

    let ingredients = description
        .map(str::to_lowercase)
        .map(|desc| {
            profile
                .ingredient_terms
                .iter()
                .filter(|term| desc.contains(&term.to_lowercase()))
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    let spice_level = profile
        .spice_rules
        .iter()
        .find(|rule| contains_any(&rule.any))
        .map_or_else(|| NO_SPICE_LEVEL.to_string(), |rule| rule.level.clone());

    Classification {
        dietary,
        tags,
        ingredients,
        spice_level,
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}
