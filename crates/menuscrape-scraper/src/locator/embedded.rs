//! Strategy 2: catalog items embedded in inline application state.

use std::sync::LazyLock;

use menuscrape_core::SiteProfile;
use regex::Regex;
use serde_json::Value;

use super::group_by_inferred_category;
use super::structured::json_image;
use crate::extract::{resolve_name, ExtractContext, NameRules};
use crate::parse::{from_minor_units, json_price};
use crate::types::{ChoiceGroup, RawCategory, RawItem, RawOptions};

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>(.*?)</script>").expect("valid regex"));
static CATALOG_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""catalogItems"\s*:\s*"#).expect("valid regex"));

/// Reads the first `catalogItems` array that yields items; later arrays,
/// including repeats of the same payload, are ignored.
pub(super) fn locate(html: &str, profile: &SiteProfile, rules: &NameRules) -> Vec<RawCategory> {
    for cap in SCRIPT_RE.captures_iter(html) {
        let Some(content) = cap.get(1).map(|m| m.as_str()) else {
            continue;
        };
        if !content.contains("\"catalogItems\"") {
            continue;
        }

        for key in CATALOG_KEY_RE.find_iter(content) {
            let Some(array_text) = extract_balanced(&content[key.end()..]) else {
                continue;
            };
            let entries: Vec<Value> = match serde_json::from_str(array_text) {
                Ok(Value::Array(entries)) => entries,
                Ok(_) => continue,
                Err(err) => {
                    tracing::debug!(error = %err, "skipping malformed catalogItems array");
                    continue;
                }
            };
            let items: Vec<RawItem> = entries
                .iter()
                .enumerate()
                .filter_map(|(index, entry)| {
                    let ctx = ExtractContext {
                        profile,
                        category: &profile.default_category,
                        index,
                    };
                    catalog_item(entry, &ctx, rules)
                })
                .collect();
            if !items.is_empty() {
                return group_by_inferred_category(
                    items,
                    &profile.embedded_category_rules,
                    &profile.default_category,
                );
            }
        }
    }

    Vec::new()
}

fn catalog_item(entry: &Value, ctx: &ExtractContext<'_>, rules: &NameRules) -> Option<RawItem> {
    let raw_name = entry
        .get("title")
        .or_else(|| entry.get("name"))
        .and_then(Value::as_str)?;
    let name = resolve_name(raw_name, ctx, rules)?;

    let price = entry
        .get("price")
        .and_then(json_price)
        .map(from_minor_units);

    let description = entry
        .get("itemDescription")
        .or_else(|| entry.get("description"))
        .and_then(Value::as_str)
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let raw_options = if entry
        .get("hasCustomizations")
        .and_then(Value::as_bool)
        .unwrap_or(false)
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
        image_url: json_image(entry),
        raw_options,
        dietary: Vec::new(),
    })
}

/// Returns the balanced JSON array or object at the start of `s`.
///
/// Tracks bracket depth while respecting string literals and escapes. Only a
/// closer matching the opening bracket at depth zero ends the value, so
/// malformed input like `[42}` is never accepted.
pub(crate) fn extract_balanced(s: &str) -> Option<&str> {
    let close = match s.chars().next()? {
        '[' => ']',
        '{' => '}',
        _ => return None,
    };
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escape = false;
    for (i, c) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        if in_string {
            match c {
                '\\' => escape = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth -= 1;
                if depth == 0 {
                    return (c == close).then(|| &s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
