//! Client for a remote PDF-to-cells extraction service.
//!
//! The service receives raw PDF bytes plus the strategy list and answers with
//! a `GridDocument`. PDF parsing itself happens entirely on that side.

use anyhow::{Context, Result};
use ledgerlift_core::{ExtractError, ExtractionStrategy};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use std::time::Duration;
use tracing::{debug, info};

use crate::grid::GridDocument;

#[derive(Debug, Clone)]
pub struct ExtractorClient {
    base_url: String,
    http: reqwest::Client,
}

impl ExtractorClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build http client")?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/extract-tables", self.base_url.trim_end_matches('/'))
    }

    /// Send a statement PDF for segmentation under every strategy.
    pub async fn extract(&self, pdf: &[u8], strategies: &[ExtractionStrategy]) -> Result<GridDocument> {
        if pdf.is_empty() {
            return Err(ExtractError::EmptyPayload.into());
        }

        let strategies = serde_json::to_string(strategies).context("serialize strategies")?;
        debug!(bytes = pdf.len(), endpoint = %self.endpoint(), "posting statement");

        let resp = self
            .http
            .post(self.endpoint())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/pdf"))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .query(&[("strategies", strategies)])
            .body(pdf.to_vec())
            .send()
            .await
            .context("extraction request")?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ExtractError::Service {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let bytes = resp.bytes().await.context("read extraction response")?;
        let doc = GridDocument::from_slice(&bytes)?;
        info!(pages = doc.pages.len(), "extraction service returned grid");
        Ok(doc)
    }

    /// Download a statement PDF by URL.
    pub async fn fetch_pdf(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("fetch {url}"))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ExtractError::Service {
                status: status.as_u16(),
                message: format!("Upstream error: {status}"),
            }
            .into());
        }

        let bytes = resp.bytes().await.with_context(|| format!("read body of {url}"))?;
        if bytes.is_empty() {
            return Err(ExtractError::EmptyPayload.into());
        }
        Ok(bytes.to_vec())
    }
}
