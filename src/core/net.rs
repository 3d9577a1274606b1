// src/core/net.rs
//
// GET-only page access. The scrape pipeline only sees `PageSource`, so tests
// can hand it canned HTML instead of the live site.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::consts::{REQUEST_TIMEOUT_SECS, USER_AGENT};
use crate::error::{Error, Result};

/// Anything that can turn an absolute URL into an HTML document.
pub trait PageSource: Send + Sync {
    fn get(&self, url: &str) -> Result<String>;
}

/// Live HTTP(S) source backed by a blocking reqwest client.
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::fetch("<client>", e))?;
        Ok(Self { client })
    }
}

impl PageSource for HttpSource {
    fn get(&self, url: &str) -> Result<String> {
        let resp = self.client.get(url).send().map_err(|e| Error::fetch(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::fetch(url, format!("HTTP status {status}")));
        }
        resp.text().map_err(|e| Error::fetch(url, e))
    }
}

/// Resolve an href against `origin`. Absolute hrefs pass through untouched.
pub fn absolute_url(origin: &str, href: &str) -> String {
    let href = href.trim();
    if href.starts_with("http://") || href.starts_with("https://") {
        return s!(href);
    }
    let origin = origin.trim_end_matches('/');
    if href.starts_with('/') {
        join!(origin, href)
    } else {
        join!(origin, "/", href)
    }
}
