//! DOM helpers shared by the locator, extractor and reconciler.
//!
//! `scraper::Html` is not `Send`, so every caller parses and walks the
//! document inside a synchronous function and returns owned data.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

static BACKGROUND_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"background(?:-image)?\s*:[^;]*url\(\s*['"]?([^'")]+)['"]?\s*\)"#)
        .expect("valid regex")
});

/// Compiles profile selectors, skipping (and logging) invalid ones.
pub(crate) fn compile(selectors: &[String]) -> Vec<Selector> {
    selectors
        .iter()
        .filter_map(|raw| match Selector::parse(raw) {
            Ok(selector) => Some(selector),
            Err(err) => {
                tracing::warn!(selector = %raw, error = %err, "skipping invalid selector");
                None
            }
        })
        .collect()
}

/// Parses a selector literal that is known to be valid.
pub(crate) fn static_selector(raw: &str) -> Selector {
    Selector::parse(raw).expect("valid selector")
}

/// First element under `scope` matched by the first selector that matches at all.
pub(crate) fn first_match<'a>(scope: ElementRef<'a>, selectors: &[Selector]) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|s| scope.select(s).next())
}

/// All elements matched by the first selector that matches anything.
pub(crate) fn all_matches<'a>(scope: ElementRef<'a>, selectors: &[Selector]) -> Vec<ElementRef<'a>> {
    selectors
        .iter()
        .map(|s| scope.select(s).collect::<Vec<_>>())
        .find(|found| !found.is_empty())
        .unwrap_or_default()
}

/// Element text with runs of whitespace collapsed to single spaces.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    collapse_whitespace(&raw)
}

pub(crate) fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trimmed, non-empty text of the first matching element.
pub(crate) fn first_text(scope: ElementRef<'_>, selectors: &[Selector]) -> Option<String> {
    selectors
        .iter()
        .flat_map(|s| scope.select(s))
        .map(text_of)
        .find(|t| !t.is_empty())
}

/// URL inside a CSS `background`/`background-image` declaration.
pub(crate) fn background_url(style: &str) -> Option<String> {
    BACKGROUND_URL_RE
        .captures(style)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|u| !u.is_empty())
}

/// Image URL carried by `element` itself: `data-bg` first, then inline style.
pub(crate) fn element_background(element: ElementRef<'_>) -> Option<String> {
    let value = element.value();
    value
        .attr("data-bg")
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .or_else(|| value.attr("style").and_then(background_url))
}

/// Decodes the handful of entities that survive in JSON-LD text fields.
pub(crate) fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;

    #[test]
    fn background_url_handles_quotes_and_spacing() {
        assert_eq!(
            background_url("background-image: url('https://cdn.example/a.jpg')").as_deref(),
            Some("https://cdn.example/a.jpg")
        );
        assert_eq!(
            background_url("width:10px;background: #fff url( \"/b.png\" ) no-repeat").as_deref(),
            Some("/b.png")
        );
        assert_eq!(background_url("color: red"), None);
    }

    #[test]
    fn element_background_prefers_data_bg() {
        let html = Html::parse_fragment(
            r#"<div data-bg="https://cdn.example/bg.jpg" style="background-image:url(/inline.jpg)"></div>"#,
        );
        let div = html.select(&static_selector("div")).next().unwrap();
        assert_eq!(
            element_background(div).as_deref(),
            Some("https://cdn.example/bg.jpg")
        );
    }

    #[test]
    fn first_match_respects_selector_order() {
        let html = Html::parse_fragment(r#"<div><h3>Second</h3><h2>First</h2></div>"#);
        let root = html.root_element();
        let selectors = compile(&["h2".to_string(), "h3".to_string()]);
        assert_eq!(text_of(first_match(root, &selectors).unwrap()), "First");
    }

    #[test]
    fn compile_skips_invalid_selectors() {
        let selectors = compile(&["[[bad".to_string(), "p".to_string()]);
        assert_eq!(selectors.len(), 1);
    }

    #[test]
    fn text_collapses_whitespace() {
        let html = Html::parse_fragment("<p>  Margherita \n\t Pizza </p>");
        let p = html.select(&static_selector("p")).next().unwrap();
        assert_eq!(text_of(p), "Margherita Pizza");
    }

    #[test]
    fn decodes_common_entities() {
        assert_eq!(
            decode_entities("Mac &amp; Cheese &quot;Kid&#39;s&quot;"),
            "Mac & Cheese \"Kid's\""
        );
    }
}
