//! Strategy 1: schema.org JSON-LD `Restaurant` menus.

use std::sync::LazyLock;

use menuscrape_core::SiteProfile;
use regex::Regex;
use serde_json::Value;

use crate::dom::decode_entities;
use crate::extract::{resolve_name, ExtractContext, NameRules};
use crate::parse::{json_price, normalize_cents_heuristic};
use crate::types::{ChoiceGroup, RawCategory, RawItem, RawOptions};

static JSONLD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]+type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("valid regex")
});

const RESTAURANT_TYPES: [&str; 3] = ["Restaurant", "FoodEstablishment", "FastFoodRestaurant"];

pub(super) fn locate(html: &str, profile: &SiteProfile, rules: &NameRules) -> Vec<RawCategory> {
    for restaurant in jsonld_restaurants(html) {
        let Some(menu) = restaurant.get("hasMenu") else {
            continue;
        };
        let categories = menu_categories(menu, profile, rules);
        if !categories.is_empty() {
            return categories;
        }
    }
    Vec::new()
}

/// Every JSON-LD object typed as a restaurant, in document order.
pub(crate) fn jsonld_restaurants(html: &str) -> Vec<Value> {
    let mut restaurants = Vec::new();

    for cap in JSONLD_RE.captures_iter(html) {
        let Some(json_text) = cap.get(1).map(|m| m.as_str()) else {
            continue;
        };
        let value: Value = match serde_json::from_str(json_text.trim()) {
            Ok(v) => v,
            Err(err) => {
                tracing::debug!(error = %err, "skipping malformed JSON-LD block");
                continue;
            }
        };

        // Accept a top-level object, an array, or a `@graph` container.
        let mut candidates: Vec<Value> = match value {
            Value::Array(items) => items,
            other => vec![other],
        };
        let graphs: Vec<Value> = candidates
            .iter()
            .filter_map(|c| c.get("@graph").and_then(Value::as_array))
            .flatten()
            .cloned()
            .collect();
        candidates.extend(graphs);

        restaurants.extend(candidates.into_iter().filter(is_restaurant));
    }

    restaurants
}

fn is_restaurant(item: &Value) -> bool {
    let type_matches = |s: &str| RESTAURANT_TYPES.iter().any(|t| s.eq_ignore_ascii_case(t));
    match item.get("@type") {
        Some(Value::String(s)) => type_matches(s),
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).any(type_matches),
        _ => false,
    }
}

/// `hasMenu` may be one menu or a list of menus; sections may nest.
fn menu_categories(menu: &Value, profile: &SiteProfile, rules: &NameRules) -> Vec<RawCategory> {
    let mut categories = Vec::new();
    for menu in one_or_many(menu) {
        for section in menu.get("hasMenuSection").map(one_or_many).unwrap_or_default() {
            collect_section(section, profile, rules, &mut categories);
        }
    }
    categories
}

fn collect_section(
    section: &Value,
    profile: &SiteProfile,
    rules: &NameRules,
    out: &mut Vec<RawCategory>,
) {
    let name = section
        .get("name")
        .and_then(Value::as_str)
        .map(decode_entities)
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| profile.default_category.clone());

    let items: Vec<RawItem> = section
        .get("hasMenuItem")
        .map(one_or_many)
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let ctx = ExtractContext {
                profile,
                category: &name,
                index,
            };
            menu_item(item, &ctx, rules)
        })
        .collect();

    if !items.is_empty() {
        out.push(RawCategory::new(name, items));
    }

    for nested in section.get("hasMenuSection").map(one_or_many).unwrap_or_default() {
        collect_section(nested, profile, rules, out);
    }
}

fn menu_item(item: &Value, ctx: &ExtractContext<'_>, rules: &NameRules) -> Option<RawItem> {
    let raw_name = item.get("name").and_then(Value::as_str)?;
    let name = resolve_name(&decode_entities(raw_name), ctx, rules)?;

    let price = item
        .get("offers")
        .map(one_or_many)
        .unwrap_or_default()
        .into_iter()
        .find_map(|offer| offer.get("price").and_then(json_price))
        .map(normalize_cents_heuristic);

    let description = item
        .get("description")
        .and_then(Value::as_str)
        .map(|d| decode_entities(d).trim().to_string())
        .filter(|d| !d.is_empty());

    let raw_options = if item
        .get("hasCustomizations")
        .is_some_and(|v| v.as_bool().unwrap_or(!v.is_null()))
    {
        RawOptions::Choices(vec![ChoiceGroup {
            name: "Customizations".to_string(),
            choices: vec!["Available - See menu for details".to_string()],
        }])
    } else {
        RawOptions::None
    };

    Some(RawItem {
        name,
        price,
        description,
        image_url: json_image(item),
        raw_options,
        dietary: Vec::new(),
    })
}

/// Image URL from `imageUrl`, `image`, `photo` or `thumbnail`; each may be a
/// string, an array, or an `ImageObject` with `url`.
pub(crate) fn json_image(item: &Value) -> Option<String> {
    ["imageUrl", "image", "photo", "thumbnail"]
        .iter()
        .filter_map(|key| item.get(*key))
        .find_map(image_value)
}

fn image_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Array(items) => items.iter().find_map(image_value),
        Value::Object(_) => value
            .get("url")
            .or_else(|| value.get("contentUrl"))
            .and_then(image_value),
        _ => None,
    }
}

fn one_or_many(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    }
}
