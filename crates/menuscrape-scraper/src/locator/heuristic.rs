//! Strategy 4: generic containers that look like menu entries.

use std::sync::LazyLock;

use menuscrape_core::SiteProfile;
use regex::Regex;
use scraper::{Html, Selector};

use crate::dom;
use crate::extract::{resolve_name, ExtractContext, NameRules};
use crate::types::{RawCategory, RawItem};

static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\d+(?:\.\d+)?)").expect("valid regex"));
static NAME_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| dom::static_selector("h3, h4, h5, .title, .name"));
static DIV_SELECTOR: LazyLock<Selector> = LazyLock::new(|| dom::static_selector("div"));

const MIN_TEXT_LEN: usize = 10;
const MAX_TEXT_LEN: usize = 500;
const FALLBACK_NAME_CHARS: usize = 50;
const MIN_NAME_LEN: usize = 3;

pub(super) fn locate(document: &Html, profile: &SiteProfile, rules: &NameRules) -> Vec<RawCategory> {
    let category = profile.default_category.as_str();
    let candidates = document
        .select(&DIV_SELECTOR)
        .map(|div| (div, dom::text_of(div)))
        .filter(|(_, text)| {
            let len = text.chars().count();
            len > MIN_TEXT_LEN
                && len < MAX_TEXT_LEN
                && (text.contains('$') || text.contains("Menu") || text.contains("Item"))
        })
        .take(profile.heuristic_max_items);

    let mut items: Vec<RawItem> = Vec::new();
    for (index, (div, text)) in candidates.enumerate() {
        let raw_name = div
            .select(&NAME_SELECTOR)
            .map(dom::text_of)
            .find(|t| !t.is_empty())
            .unwrap_or_else(|| text.chars().take(FALLBACK_NAME_CHARS).collect());
        let raw_name = raw_name.trim();
        if raw_name.chars().count() <= MIN_NAME_LEN {
            continue;
        }

        let ctx = ExtractContext {
            profile,
            category,
            index,
        };
        let Some(name) = resolve_name(raw_name, &ctx, rules) else {
            continue;
        };
        if items.iter().any(|i| i.name == name) {
            continue;
        }

        let price = PRICE_RE
            .captures(&text)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok());

        items.push(RawItem {
            name,
            price,
            ..RawItem::default()
        });
    }

    if items.is_empty() {
        Vec::new()
    } else {
        vec![RawCategory::new(category, items)]
    }
}
