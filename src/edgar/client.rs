// src/edgar/client.rs
use std::time::Duration;

use reqwest::header;

use crate::edgar::models::{CompanyConcept, CompanySubmission, FilingInfo, TickerEntry};
use crate::utils::error::EdgarError;

const TICKER_DIRECTORY_URL: &str = "https://www.sec.gov/files/company_tickers.json";

// SEC asks for 10 requests/second max. Be conservative. >100ms delay.
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 150;

/// Handle for all SEC EDGAR interaction. Built once at startup and shared;
/// every request carries the identifying User-Agent the SEC requires and
/// waits out a fixed delay first.
#[derive(Debug, Clone)]
pub struct EdgarClient {
    client: reqwest::Client,
    request_delay: Duration,
}

impl EdgarClient {
    /// `user_agent` must identify the operator, e.g. "Company name@example.com".
    pub fn new(user_agent: &str, request_delay_ms: u64) -> Result<Self, EdgarError> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            client,
            request_delay: Duration::from_millis(request_delay_ms),
        })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, EdgarError> {
        tokio::time::sleep(self.request_delay).await;

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("HTTP error status: {} for URL: {}", status, url);
            if status == reqwest::StatusCode::FORBIDDEN {
                tracing::warn!("Received 403 Forbidden - check User-Agent and rate limits.");
                return Err(EdgarError::RateLimited);
            }
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(EdgarError::FilingDocNotFound(url.to_string()));
            }
            return Err(EdgarError::Http(status));
        }

        Ok(response)
    }

    /// Fetches the full company ticker directory. Always a fresh fetch; the
    /// directory is never cached between calls.
    pub async fn company_tickers(&self) -> Result<Vec<TickerEntry>, EdgarError> {
        let response = self.get(TICKER_DIRECTORY_URL).await?;
        let json: serde_json::Value = response.json().await?;

        let entries = json
            .as_object()
            .ok_or_else(|| EdgarError::Parse("Invalid ticker directory structure".to_string()))?;

        let mut directory = Vec::with_capacity(entries.len());
        for (_idx, company) in entries {
            let entry: TickerEntry = serde_json::from_value(company.clone())
                .map_err(|e| EdgarError::Parse(format!("Invalid ticker entry: {}", e)))?;
            directory.push(entry);
        }
        Ok(directory)
    }

    /// Resolves a ticker to its zero-padded CIK by exact, case-sensitive
    /// match against the directory.
    pub async fn resolve_cik(&self, ticker: &str) -> Result<String, EdgarError> {
        let directory = self.company_tickers().await?;
        resolve_cik_in(&directory, ticker)
    }

    /// Fetches the company submission index for a given CIK
    pub async fn submissions(&self, cik: &str) -> Result<CompanySubmission, EdgarError> {
        let url = format!("https://data.sec.gov/submissions/CIK{}.json", cik);
        let response = self.get(&url).await?;
        let submission: CompanySubmission = response.json().await?;
        Ok(submission)
    }

    /// Lists the `limit` most recent 10-K filings for a ticker, in the order
    /// the submission index returns them (most recent first).
    pub async fn recent_10k_filings(
        &self,
        ticker: &str,
        limit: usize,
    ) -> Result<Vec<FilingInfo>, EdgarError> {
        let cik = self.resolve_cik(ticker).await?;
        let submissions = self.submissions(&cik).await?;
        let recent = &submissions.filings.recent;

        let mut filings = Vec::new();
        for i in 0..recent.accession_number.len() {
            if filings.len() == limit {
                break;
            }
            let form = recent
                .form
                .get(i)
                .ok_or_else(|| EdgarError::Parse("Missing form type".to_string()))?;
            if form != "10-K" {
                continue;
            }

            let accession_number = recent
                .accession_number
                .get(i)
                .ok_or_else(|| EdgarError::Parse("Missing accession number".to_string()))?;
            let filing_date = recent
                .filing_date
                .get(i)
                .ok_or_else(|| EdgarError::Parse("Missing filing date".to_string()))?;
            let primary_doc = recent
                .primary_document
                .get(i)
                .ok_or_else(|| EdgarError::Parse("Missing primary document".to_string()))?;

            filings.push(FilingInfo {
                accession_number: accession_number.clone(),
                filing_date: filing_date.clone(),
                form_type: form.clone(),
                ticker: ticker.to_string(),
                cik: cik.clone(),
                primary_doc: primary_doc.clone(),
            });
        }

        Ok(filings)
    }

    /// Downloads a filing document from its archive URL.
    pub async fn download_filing_doc(&self, url: &str) -> Result<String, EdgarError> {
        tracing::info!("Downloading document from: {}", url);
        tokio::time::sleep(self.request_delay).await;

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/xml,text/html,text/plain,*/*")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("HTTP error status: {} for URL: {}", status, url);
            if status == reqwest::StatusCode::FORBIDDEN {
                return Err(EdgarError::RateLimited);
            }
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(EdgarError::FilingDocNotFound(url.to_string()));
            }
            return Err(EdgarError::Http(status));
        }

        let body = response.text().await?;
        tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }

    /// Fetches every reported value of a us-gaap concept for one company.
    pub async fn company_concept(
        &self,
        cik: &str,
        concept: &str,
    ) -> Result<CompanyConcept, EdgarError> {
        let url = format!(
            "https://data.sec.gov/api/xbrl/companyconcept/CIK{}/us-gaap/{}.json",
            cik, concept
        );
        let response = self.get(&url).await?;
        let payload: CompanyConcept = response.json().await?;
        Ok(payload)
    }
}

/// Exact, case-sensitive lookup. The first directory entry whose ticker is
/// byte-equal wins; anything else, including a case mismatch, is an error.
pub fn resolve_cik_in(directory: &[TickerEntry], ticker: &str) -> Result<String, EdgarError> {
    directory
        .iter()
        .find(|entry| entry.ticker == ticker)
        .map(TickerEntry::padded_cik)
        .ok_or_else(|| EdgarError::TickerNotFound(ticker.to_string()))
}
