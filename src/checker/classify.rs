// src/checker/classify.rs
// =============================================================================
// This module decides whether a link points inside or outside the page's site.
//
// Rules, checked in order:
// 1. href starts with "/" or contains the page's hostname -> Internal
// 2. href starts with "http:" or "https:"                  -> External
// 3. anything else (mailto:, javascript:, "#top", "")       -> Ignored
//
// Only a broken *base* URL is an error. Any href, however mangled, gets a
// classification.
//
// Rust concepts:
// - Enums with data: Internal/External carry the absolute URL
// - Option<&str>: an <a> tag may have no href at all
// =============================================================================

use serde::Serialize;
use url::Url;

use crate::error::{AnalyzeError, Result};

/// Where a single href points, relative to the page it was found on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkClass {
    Internal(String),
    External(String),
    Ignored,
}

/// Absolute link URLs, split by origin, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassifiedLinkSet {
    pub internal: Vec<String>,
    pub external: Vec<String>,
}

impl ClassifiedLinkSet {
    /// Internal links followed by external links, duplicates included
    pub fn all(&self) -> impl Iterator<Item = &String> {
        self.internal.iter().chain(self.external.iter())
    }
}

/// Classifies hrefs against one parsed base URL.
///
/// Parsing the base once and reusing it matters when a page has hundreds
/// of anchors.
#[derive(Debug, Clone)]
pub struct LinkClassifier {
    base: Url,
    host: String,
}

impl LinkClassifier {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|e| AnalyzeError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        // "mailto:x@y" parses fine but has nothing to compare hrefs against
        let host = match base.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => {
                return Err(AnalyzeError::InvalidBaseUrl {
                    url: base_url.to_string(),
                    reason: "URL has no host".to_string(),
                })
            }
        };

        Ok(Self { base, host })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn classify(&self, raw_href: Option<&str>) -> LinkClass {
        let href = match raw_href {
            Some(href) => href.trim(),
            None => return LinkClass::Ignored,
        };

        if href.starts_with('/') {
            return match self.base.join(href) {
                Ok(url) => LinkClass::Internal(url.to_string()),
                Err(_) => LinkClass::Ignored,
            };
        }

        // Substring match on purpose: it also catches the hostname sitting
        // in a query string of a foreign URL (see the tests below).
        if href.contains(self.host.as_str()) {
            return LinkClass::Internal(href.to_string());
        }

        if has_http_scheme(href) {
            return LinkClass::External(href.to_string());
        }

        LinkClass::Ignored
    }

    /// Classifies every href found on a page, dropping the ignored ones.
    pub fn classify_all<'a, I>(&self, hrefs: I) -> ClassifiedLinkSet
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut set = ClassifiedLinkSet::default();

        for href in hrefs {
            match self.classify(href) {
                LinkClass::Internal(url) => set.internal.push(url),
                LinkClass::External(url) => set.external.push(url),
                LinkClass::Ignored => {}
            }
        }

        set
    }
}

// Checks for an http:// or https:// style prefix, ignoring case
fn has_http_scheme(href: &str) -> bool {
    let lower = href.get(..6).unwrap_or(href).to_ascii_lowercase();
    lower.starts_with("http:") || lower.starts_with("https:")
}
