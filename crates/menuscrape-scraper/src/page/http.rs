//! Static page session over `reqwest`.
//!
//! The document is fetched once; `content` and `wait_for` answer from that
//! snapshot. Script evaluation and input events need a live browser and
//! report [`PageError::Unsupported`].

use std::time::Duration;

use reqwest::Client;

use super::{LoadOptions, PageHandle, PageLoader};
use crate::error::{PageError, ScraperError};
use crate::retry::retry_with_backoff;

/// Loads pages with plain HTTP GETs, retrying transient failures.
#[derive(Debug, Clone)]
pub struct HttpPageLoader {
    client: Client,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl HttpPageLoader {
    /// # Errors
    ///
    /// Returns [`ScraperError::Page`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(max_retries: u32, backoff_base_ms: u64) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(PageError::from)?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_ms,
        })
    }

    async fn fetch_once(&self, url: &str, options: &LoadOptions) -> Result<HttpPage, PageError> {
        let response = self
            .client
            .get(url)
            .timeout(options.timeout)
            .header(reqwest::header::USER_AGENT, &options.user_agent)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PageError::Timeout {
                        what: format!("navigation to {url}"),
                        timeout_secs: options.timeout.as_secs(),
                    }
                } else {
                    PageError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PageError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let final_url = response.url().to_string();
        let body = response.text().await?;
        if looks_like_bot_challenge(&body) {
            return Err(PageError::BotChallenge {
                url: url.to_owned(),
            });
        }

        Ok(HttpPage::from_html(final_url, body))
    }
}

impl PageLoader for HttpPageLoader {
    type Page = HttpPage;

    async fn load(&self, url: &str, options: &LoadOptions) -> Result<HttpPage, PageError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.fetch_once(url, options)
        })
        .await
    }
}

fn looks_like_bot_challenge(body: &str) -> bool {
    let lowered = body.to_ascii_lowercase();
    let has_cloudflare_banner = lowered.contains("attention required! | cloudflare");
    let has_challenge_platform = lowered.contains("/cdn-cgi/challenge-platform/");
    let has_just_a_moment = lowered.contains("just a moment...");
    let has_cookie_gate = lowered.contains("please enable cookies");
    let has_cf_chl = lowered.contains("cf-chl-");

    has_cloudflare_banner
        || has_challenge_platform
        || (has_just_a_moment && has_cookie_gate)
        || (has_just_a_moment && has_cf_chl)
}

/// A fetched document.
#[derive(Debug, Clone)]
pub struct HttpPage {
    url: String,
    html: String,
}

impl HttpPage {
    #[must_use]
    pub fn from_html(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }

    fn has_match(&self, selector: &str) -> Result<bool, PageError> {
        let parsed =
            scraper::Selector::parse(selector).map_err(|_| PageError::SelectorNotFound {
                selector: selector.to_owned(),
            })?;
        let document = scraper::Html::parse_document(&self.html);
        let found = document.select(&parsed).next().is_some();
        Ok(found)
    }
}

impl PageHandle for HttpPage {
    fn url(&self) -> &str {
        &self.url
    }

    async fn content(&self) -> Result<String, PageError> {
        Ok(self.html.clone())
    }

    async fn evaluate(&self, _expression: &str) -> Result<serde_json::Value, PageError> {
        Err(PageError::Unsupported {
            operation: "evaluate",
        })
    }

    async fn click(&self, _selector: &str) -> Result<(), PageError> {
        Err(PageError::Unsupported { operation: "click" })
    }

    async fn wait_for(&self, selector: &str, _timeout: Duration) -> Result<(), PageError> {
        if self.has_match(selector)? {
            Ok(())
        } else {
            Err(PageError::SelectorNotFound {
                selector: selector.to_owned(),
            })
        }
    }

    async fn press_key(&self, _key: &str) -> Result<(), PageError> {
        Err(PageError::Unsupported {
            operation: "press_key",
        })
    }

    async fn screenshot(&self) -> Result<Vec<u8>, PageError> {
        Err(PageError::Unsupported {
            operation: "screenshot",
        })
    }

    async fn close(self) {}
}
