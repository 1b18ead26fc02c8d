//! Page-session seam.
//!
//! The pipeline only ever talks to a loaded page through [`PageHandle`].
//! [`HttpPageLoader`] is the built-in static implementation: it fetches the
//! document once and answers DOM questions from that snapshot. Browser-backed
//! sessions implement the same traits.

mod http;

use std::future::Future;
use std::time::Duration;

pub use http::{HttpPage, HttpPageLoader};

use crate::error::PageError;

/// Navigation settings for one page load.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub timeout: Duration,
    pub user_agent: String,
}

/// A loaded page. All waits are bounded by the supplied timeouts.
pub trait PageHandle: Send + Sync {
    /// Final URL after redirects.
    fn url(&self) -> &str;

    /// Current serialized document.
    fn content(&self) -> impl Future<Output = Result<String, PageError>> + Send;

    /// Evaluates a script expression and returns its JSON value.
    fn evaluate(
        &self,
        expression: &str,
    ) -> impl Future<Output = Result<serde_json::Value, PageError>> + Send;

    fn click(&self, selector: &str) -> impl Future<Output = Result<(), PageError>> + Send;

    /// Waits until `selector` matches at least one element.
    fn wait_for(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<(), PageError>> + Send;

    fn press_key(&self, key: &str) -> impl Future<Output = Result<(), PageError>> + Send;

    /// PNG screenshot of the full page.
    fn screenshot(&self) -> impl Future<Output = Result<Vec<u8>, PageError>> + Send;

    /// Releases the session. Called exactly once, on every exit path.
    fn close(self) -> impl Future<Output = ()> + Send
    where
        Self: Sized;
}

/// Opens page sessions.
pub trait PageLoader: Send + Sync {
    type Page: PageHandle;

    /// # Errors
    ///
    /// Returns [`PageError`] when the page cannot be loaded within the timeout.
    fn load(
        &self,
        url: &str,
        options: &LoadOptions,
    ) -> impl Future<Output = Result<Self::Page, PageError>> + Send;
}
