//! Restaurant name and contact details.

use menuscrape_core::SiteProfile;
use scraper::Html;
use serde_json::Value;

use super::structured::jsonld_restaurants;
use crate::dom;
use crate::types::RestaurantInfo;

/// Reads restaurant details from JSON-LD first, then the profile's DOM
/// selectors. The name falls back to the profile default.
#[must_use]
pub fn extract_restaurant(html: &str, profile: &SiteProfile) -> RestaurantInfo {
    let mut info = jsonld_restaurants(html)
        .first()
        .map(restaurant_from_jsonld)
        .unwrap_or_default();

    let document = Html::parse_document(html);
    let root = document.root_element();
    let selectors = &profile.restaurant;

    if info.name.is_empty() {
        info.name = dom::first_text(root, &dom::compile(&selectors.name)).unwrap_or_default();
    }
    if info.address.is_none() {
        info.address = dom::first_text(root, &dom::compile(&selectors.address));
    }
    if info.phone.is_none() {
        info.phone = dom::first_match(root, &dom::compile(&selectors.phone)).and_then(|el| {
            let text = dom::text_of(el);
            if text.is_empty() {
                el.value()
                    .attr("href")
                    .and_then(|href| href.strip_prefix("tel:"))
                    .map(str::to_string)
            } else {
                Some(text)
            }
        });
    }
    if info.rating.is_none() {
        info.rating = dom::first_text(root, &dom::compile(&selectors.rating));
    }

    if info.name.is_empty() {
        info.name.clone_from(&profile.default_restaurant_name);
    }
    info
}

fn restaurant_from_jsonld(value: &Value) -> RestaurantInfo {
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .map(|n| dom::decode_entities(n).trim().to_string())
        .unwrap_or_default();

    let address = match value.get("address") {
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(addr @ Value::Object(_)) => {
            let parts: Vec<&str> = ["streetAddress", "addressLocality", "addressRegion", "postalCode"]
                .iter()
                .filter_map(|k| addr.get(*k).and_then(Value::as_str))
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
    .filter(|a| !a.is_empty());

    let phone = value
        .get("telephone")
        .and_then(Value::as_str)
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());

    let rating = value
        .get("aggregateRating")
        .and_then(|r| r.get("ratingValue"))
        .and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

    RestaurantInfo {
        name,
        address,
        phone,
        rating,
    }
}
