//! Option-set expansion for container dishes.
//!
//! Ordering platforms list drinks as one dish per family ("BEERS", "RED
//! WINES") whose real products live in option sets inside the embedded
//! application state. Each option becomes its own item and the container
//! dish is removed.

use menuscrape_core::OptionSetExpansion;
use regex::Regex;
use serde_json::Value;

use super::extract_balanced;
use crate::parse::json_price;
use crate::types::{RawCategory, RawItem};

/// Script expression that yields the restaurant object from a live page.
#[must_use]
pub fn state_expression(config: &OptionSetExpansion) -> String {
    let var = &config.state_variable;
    format!("window.{var} && window.{var}.restaurant")
}

/// Reads the `<state_variable> = {...}` assignment from inline scripts.
#[must_use]
pub fn state_from_html(html: &str, config: &OptionSetExpansion) -> Option<Value> {
    let pattern = format!(r"{}\s*=\s*", regex::escape(&config.state_variable));
    let assignment = Regex::new(&pattern).ok()?;

    let state = assignment.find_iter(html).find_map(|m| {
        let object_text = extract_balanced(&html[m.end()..])?;
        match serde_json::from_str::<Value>(object_text) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::debug!(error = %err, "embedded state is not valid JSON");
                None
            }
        }
    });
    state
}

/// Expands container dishes in the configured category. `state` may be the
/// whole application state or just its `restaurant` object.
///
/// Returns the number of items added.
pub fn expand_option_sets(
    categories: &mut [RawCategory],
    state: &Value,
    config: &OptionSetExpansion,
) -> usize {
    let restaurant = state.get("restaurant").unwrap_or(state);
    let Some(target) = categories.iter_mut().find(|c| c.name == config.category) else {
        return 0;
    };
    let option_sets = restaurant
        .get("option_sets")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut added = 0usize;
    for dish in container_dishes(restaurant, &config.category) {
        let Some(dish_name) = dish.get("name").and_then(Value::as_str) else {
            continue;
        };
        let image_url = dish_image_url(dish, &config.image_url_template);
        let set_ids = dish
            .get("option_sets")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for set_id in set_ids {
            let Some(set) = option_sets.iter().find(|s| s.get("_id") == Some(set_id)) else {
                continue;
            };
            let options = set
                .get("options")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            if options.is_empty() {
                continue;
            }
            let set_name = set.get("name").and_then(Value::as_str).unwrap_or_default();

            for option in options {
                let Some(option_name) = option
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                else {
                    continue;
                };
                target.items.push(RawItem {
                    name: option_name.to_string(),
                    price: option.get("price").and_then(json_price),
                    description: Some(format!("{set_name} - {option_name}")),
                    image_url: image_url.clone(),
                    ..RawItem::default()
                });
                added += 1;
            }

            target
                .items
                .retain(|item| item.name != dish_name && !item.name.contains(&config.drop_marker));
        }
    }

    if added > 0 {
        tracing::debug!(
            category = %config.category,
            count = added,
            "expanded option sets into individual items"
        );
    }
    added
}

fn container_dishes<'a>(restaurant: &'a Value, category: &'a str) -> impl Iterator<Item = &'a Value> {
    restaurant
        .get("menus")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|menu| menu.get("categories").and_then(Value::as_array))
        .flatten()
        .filter(move |c| c.get("name").and_then(Value::as_str) == Some(category))
        .filter_map(|c| c.get("dishes").and_then(Value::as_array))
        .flatten()
}

fn dish_image_url(dish: &Value, template: &str) -> Option<String> {
    let image = dish.get("image")?;
    let id = image.get("_id").and_then(Value::as_str)?;
    let name = image.get("name").and_then(Value::as_str).unwrap_or_default();
    Some(template.replace("{id}", id).replace("{name}", name))
}
