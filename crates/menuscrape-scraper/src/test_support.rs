//! Scripted page sessions for unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::PageError;
use crate::page::{LoadOptions, PageHandle, PageLoader};

#[derive(Debug, Default)]
struct State {
    open: Option<String>,
    log: Vec<String>,
    closed: bool,
}

/// A page whose detail overlays open when their target selector is clicked.
#[derive(Debug, Clone)]
pub(crate) struct ScriptedPage {
    url: String,
    html: String,
    details: HashMap<String, String>,
    close_selector: String,
    overlay: String,
    state_value: Option<serde_json::Value>,
    unreadable: bool,
    state: Arc<Mutex<State>>,
}

impl ScriptedPage {
    pub(crate) fn new(url: &str, html: &str) -> Self {
        Self {
            url: url.to_string(),
            html: html.to_string(),
            details: HashMap::new(),
            close_selector: "[aria-label=\"Close\"]".to_string(),
            overlay: "[role=\"dialog\"]".to_string(),
            state_value: None,
            unreadable: false,
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Clicking `target` shows `overlay_html` appended to the page.
    pub(crate) fn with_detail(mut self, target: &str, overlay_html: &str) -> Self {
        self.details.insert(target.to_string(), overlay_html.to_string());
        self
    }

    pub(crate) fn with_state(mut self, value: serde_json::Value) -> Self {
        self.state_value = Some(value);
        self
    }

    /// `content` fails, as when the session dies after navigation.
    pub(crate) fn unreadable(mut self) -> Self {
        self.unreadable = true;
        self
    }

    pub(crate) fn log(&self) -> Vec<String> {
        self.state.lock().unwrap().log.clone()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }

    fn record(&self, entry: String) {
        self.state.lock().unwrap().log.push(entry);
    }
}

impl PageHandle for ScriptedPage {
    fn url(&self) -> &str {
        &self.url
    }

    async fn content(&self) -> Result<String, PageError> {
        if self.unreadable {
            return Err(PageError::Evaluate("target closed".to_string()));
        }
        let open = self.state.lock().unwrap().open.clone();
        let overlay = open.and_then(|target| self.details.get(&target).cloned());
        Ok(match overlay {
            Some(overlay) => self.html.replace("</body>", &format!("{overlay}</body>")),
            None => self.html.clone(),
        })
    }

    async fn evaluate(&self, expression: &str) -> Result<serde_json::Value, PageError> {
        self.record(format!("evaluate {expression}"));
        self.state_value
            .clone()
            .ok_or_else(|| PageError::Evaluate("undefined".to_string()))
    }

    async fn click(&self, selector: &str) -> Result<(), PageError> {
        self.record(format!("click {selector}"));
        let mut state = self.state.lock().unwrap();
        if self.details.contains_key(selector) {
            state.open = Some(selector.to_string());
            return Ok(());
        }
        if selector == self.close_selector && state.open.is_some() {
            state.open = None;
            return Ok(());
        }
        Err(PageError::SelectorNotFound {
            selector: selector.to_string(),
        })
    }

    async fn wait_for(&self, selector: &str, _timeout: Duration) -> Result<(), PageError> {
        let open = self.state.lock().unwrap().open.is_some();
        if selector == self.overlay && open {
            return Ok(());
        }
        if selector != self.overlay && has_match(&self.html, selector) {
            return Ok(());
        }
        Err(PageError::Timeout {
            what: selector.to_string(),
            timeout_secs: 0,
        })
    }

    async fn press_key(&self, key: &str) -> Result<(), PageError> {
        self.record(format!("press {key}"));
        self.state.lock().unwrap().open = None;
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>, PageError> {
        Ok(b"\x89PNG".to_vec())
    }

    async fn close(self) {
        self.state.lock().unwrap().closed = true;
    }
}

fn has_match(html: &str, selector: &str) -> bool {
    let Ok(parsed) = scraper::Selector::parse(selector) else {
        return false;
    };
    scraper::Html::parse_document(html).select(&parsed).next().is_some()
}

/// Hands out clones of one scripted page, or fails every load.
#[derive(Debug, Clone)]
pub(crate) struct ScriptedLoader {
    page: Option<ScriptedPage>,
}

impl ScriptedLoader {
    pub(crate) fn serving(page: ScriptedPage) -> Self {
        Self { page: Some(page) }
    }

    pub(crate) fn failing() -> Self {
        Self { page: None }
    }
}

impl PageLoader for ScriptedLoader {
    type Page = ScriptedPage;

    async fn load(&self, url: &str, _options: &LoadOptions) -> Result<ScriptedPage, PageError> {
        self.page.clone().ok_or_else(|| PageError::UnexpectedStatus {
            status: 503,
            url: url.to_string(),
        })
    }
}
