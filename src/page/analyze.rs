// src/page/analyze.rs
// =============================================================================
// This module runs a full page analysis.
//
// How it works:
// 1. Check that the page URL is usable as a base for its links
// 2. Fetch the page HTML
// 3. Extract title, headings, doctype, login-form flag and anchor hrefs
// 4. Split the hrefs into internal and external absolute URLs
// 5. Validate every distinct link through the shared scheduler
// 6. Bundle it all into one AnalysisReport
//
// Only steps 1 and 2 can fail the analysis. Broken links are reported as
// data inside the report, never as an error.
// =============================================================================

use std::collections::HashSet;

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

use super::html::{HeadingCounts, PageFeatures};
use crate::checker::{HttpTransport, LinkClassifier, ValidationResult, ValidationScheduler};
use crate::config::ValidatorConfig;
use crate::error::{AnalyzeError, Result};

// The JSON shape of a finished analysis
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub html_version: String,
    pub title: String,
    pub headings: HeadingCounts,
    pub internal_links: Vec<String>,
    pub external_links: Vec<String>,
    pub link_validation_results: Vec<ValidationResult>,
    #[serde(rename = "loginform")]
    pub login_form: bool,
}

pub struct PageAnalyzer<'s> {
    client: Client,
    scheduler: &'s ValidationScheduler<HttpTransport>,
}

impl<'s> PageAnalyzer<'s> {
    pub fn new(
        config: &ValidatorConfig,
        scheduler: &'s ValidationScheduler<HttpTransport>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.page_timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client, scheduler })
    }

    pub async fn analyze(&self, url: &str) -> Result<AnalysisReport> {
        // Fail on a bad URL before spending a request on it
        let classifier = LinkClassifier::new(url)?;

        info!("Analyzing {}", url);
        let html = fetch_page(&self.client, url).await?;
        let features = PageFeatures::extract(&html);

        let links = classifier.classify_all(features.hrefs.iter().map(|h| h.as_deref()));
        debug!(
            host = classifier.host(),
            internal = links.internal.len(),
            external = links.external.len(),
            "classified links"
        );

        let to_check = distinct(links.all());
        let link_validation_results = self.scheduler.validate_all(&to_check).await;

        Ok(AnalysisReport {
            html_version: features.html_version,
            title: features.title,
            headings: features.headings,
            internal_links: links.internal,
            external_links: links.external,
            link_validation_results,
            login_form: features.login_form,
        })
    }
}

// Fetches a web page and returns its HTML content
pub async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(AnalyzeError::PageStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let html = response.text().await?;
    Ok(html)
}

// First occurrence wins, so the report keeps discovery order
fn distinct<'a>(links: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen = HashSet::new();
    links
        .filter(|link| seen.insert(link.as_str()))
        .cloned()
        .collect()
}
