//! Page-wide `(label, image URL)` pool.

use std::sync::LazyLock;

use menuscrape_core::ImagePoolConfig;
use scraper::{ElementRef, Html, Selector};

use crate::dom;

static IMG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| dom::static_selector("img[src]"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolEntry {
    pub label: String,
    pub url: String,
}

/// Labeled images collected once per page. Earlier sources win on duplicate
/// labels: `alt` text, then item containers, then headings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImagePool {
    entries: Vec<PoolEntry>,
}

impl ImagePool {
    #[must_use]
    pub fn entries(&self) -> &[PoolEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, label: String, url: &str) {
        let label = label.trim().to_string();
        if label.is_empty() || self.entries.iter().any(|e| e.label == label) {
            return;
        }
        self.entries.push(PoolEntry {
            label,
            url: url.to_string(),
        });
    }
}

/// Builds the pool from a page snapshot.
#[must_use]
pub fn build_pool(html: &str, config: &ImagePoolConfig) -> ImagePool {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let mut pool = ImagePool::default();

    for element in root.select(&IMG_SELECTOR) {
        if let (Some(url), Some(alt)) = (accepted_src(element, config), element.value().attr("alt")) {
            pool.insert(alt.to_string(), url);
        }
    }

    let title_selectors = dom::compile(&config.container_title);
    for container in dom::all_matches(root, &dom::compile(&config.containers)) {
        let Some(title) = dom::first_text(container, &title_selectors) else {
            continue;
        };
        if let Some(url) = container.select(&IMG_SELECTOR).find_map(|el| accepted_src(el, config)) {
            pool.insert(title, url);
        }
    }

    for heading in dom::all_matches(root, &dom::compile(&config.headings)) {
        let title = dom::text_of(heading);
        let Some(parent) = heading.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        if let Some(url) = parent.select(&IMG_SELECTOR).find_map(|el| accepted_src(el, config)) {
            pool.insert(title, url);
        }
    }

    tracing::debug!(count = pool.len(), "built image pool");
    pool
}

fn accepted_src<'a>(img: ElementRef<'a>, config: &ImagePoolConfig) -> Option<&'a str> {
    let src = img.value().attr("src")?.trim();
    if src.is_empty() || src.starts_with("data:") {
        return None;
    }
    let accepted = config.domains.is_empty() || config.domains.iter().any(|d| src.contains(d.as_str()));
    accepted.then_some(src)
}
