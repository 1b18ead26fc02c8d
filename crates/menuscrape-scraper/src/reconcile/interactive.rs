//! Click-through detail views on a live page.
//!
//! One detail view is open at a time. [`open_detail`] closes the overlay on
//! every exit path, including failures after the click.

use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;

use menuscrape_core::{AddOnGroup, AddOnOption, InteractiveConfig};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::dom;
use crate::error::PageError;
use crate::extract::extract_choice_groups;
use crate::page::PageHandle;
use crate::parse::{format_modifier, parse_price};

static CHOICE_PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\s*\$\s*\d[\d,]*(?:\.\d+)?").expect("valid regex"));
static TESTID_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| dom::static_selector("[data-testid]"));

/// What an item's detail overlay showed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailView {
    pub image_url: Option<String>,
    pub groups: Vec<AddOnGroup>,
}

/// Resolves a unique selector for each item's clickable card, by name.
///
/// Cards are matched on their title (via `title_selectors`) or, failing
/// that, their full text. Only `id` or a document-unique `data-testid` make a
/// usable target.
#[must_use]
pub fn click_targets(
    html: &str,
    config: &InteractiveConfig,
    title_selectors: &[String],
    names: &[String],
) -> HashMap<String, String> {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let titles = dom::compile(title_selectors);

    let mut testid_counts: HashMap<&str, usize> = HashMap::new();
    for el in root.select(&TESTID_SELECTOR) {
        if let Some(id) = el.value().attr("data-testid") {
            *testid_counts.entry(id).or_default() += 1;
        }
    }

    let mut targets = HashMap::new();
    for card in dom::all_matches(root, &dom::compile(&config.clickable)) {
        let title = dom::first_text(card, &titles).unwrap_or_else(|| dom::text_of(card));
        let Some(name) = names
            .iter()
            .find(|n| !targets.contains_key(*n) && title.eq_ignore_ascii_case(n))
            .or_else(|| names.iter().find(|n| !targets.contains_key(*n) && title.contains(n.as_str())))
        else {
            continue;
        };
        if let Some(selector) = unique_selector(card, &testid_counts) {
            targets.insert(name.clone(), selector);
        }
    }
    targets
}

fn unique_selector(card: ElementRef<'_>, testid_counts: &HashMap<&str, usize>) -> Option<String> {
    let element = card.value();
    if let Some(id) = element.id().filter(|id| !id.contains('"')) {
        return Some(format!("[id=\"{id}\"]"));
    }
    element
        .attr("data-testid")
        .filter(|t| testid_counts.get(t) == Some(&1) && !t.contains('"'))
        .map(|t| format!("[data-testid=\"{t}\"]"))
}

/// Reads the open overlay from a page snapshot. `None` when no overlay is
/// present.
#[must_use]
pub fn read_detail_view(html: &str, config: &InteractiveConfig) -> Option<DetailView> {
    let document = Html::parse_document(html);
    let overlay_selectors = dom::compile(std::slice::from_ref(&config.overlay));
    let overlay = dom::first_match(document.root_element(), &overlay_selectors)?;

    let image_url = dom::compile(&config.overlay_image)
        .iter()
        .flat_map(|s| overlay.select(s))
        .filter_map(|img| img.value().attr("src"))
        .map(str::trim)
        .find(|src| !src.is_empty() && !src.starts_with("data:"))
        .map(str::to_string);

    let groups = extract_choice_groups(
        overlay,
        &dom::compile(&config.option_group),
        &dom::compile(&config.option_group_title),
        &dom::compile(&config.option_choice),
    )
    .into_iter()
    .map(|group| {
        let options = group.choices.iter().map(String::as_str).map(priced_choice).collect();
        AddOnGroup::new(group.name, options)
    })
    .collect();

    Some(DetailView { image_url, groups })
}

/// Splits `"Guacamole +$2.95"` into a named option with its increment.
fn priced_choice(label: &str) -> AddOnOption {
    let Some(found) = CHOICE_PRICE_RE.find(label) else {
        return AddOnOption::free(label);
    };
    let name = format!("{}{}", &label[..found.start()], &label[found.end()..]);
    let name = name.trim().trim_end_matches(['-', ',', '(', ')']).trim();
    let price = parse_price(found.as_str()).map(format_modifier).unwrap_or_default();
    AddOnOption::new(if name.is_empty() { label } else { name }, price)
}

/// Opens the detail view behind `target`, reads it, and closes it.
///
/// # Errors
///
/// Returns the first [`PageError`] from clicking, waiting for the overlay, or
/// reading the page. The overlay is closed regardless.
pub async fn open_detail<P: PageHandle>(
    page: &P,
    config: &InteractiveConfig,
    target: &str,
    timeout: Duration,
) -> Result<DetailView, PageError> {
    let result = read_open_detail(page, config, target, timeout).await;
    if !matches!(&result, Err(err) if err.is_unsupported()) {
        close_detail(page, config).await;
    }
    result
}

async fn read_open_detail<P: PageHandle>(
    page: &P,
    config: &InteractiveConfig,
    target: &str,
    timeout: Duration,
) -> Result<DetailView, PageError> {
    page.click(target).await?;
    page.wait_for(&config.overlay, timeout).await?;
    let html = page.content().await?;
    read_detail_view(&html, config).ok_or_else(|| PageError::SelectorNotFound {
        selector: config.overlay.clone(),
    })
}

/// Explicit close controls first, then the cancel key.
async fn close_detail<P: PageHandle>(page: &P, config: &InteractiveConfig) {
    for selector in &config.close {
        if page.click(selector).await.is_ok() {
            return;
        }
    }
    if let Err(err) = page.press_key(&config.cancel_key).await {
        tracing::debug!(error = %err, "could not dismiss detail view");
    }
}

/// Dismisses popups and banners once after the page loads. Returns how many
/// were closed.
pub async fn dismiss_popups<P: PageHandle>(page: &P, config: &InteractiveConfig) -> usize {
    let mut closed = 0usize;
    for selector in &config.popup_close {
        match page.click(selector).await {
            Ok(()) => {
                tracing::debug!(%selector, "dismissed popup");
                closed += 1;
            }
            Err(err) if err.is_unsupported() => break,
            Err(_) => {}
        }
    }
    closed
}
