// src/edgar/models.rs
#![allow(dead_code)] // wire models mirror the upstream JSON shapes
use serde::{Deserialize, Serialize};

use crate::utils::error::EdgarError;

/// Subset of the EDGAR company submission index that this crate consumes.
/// Example: https://data.sec.gov/submissions/CIK0000320193.json
#[derive(Debug, Deserialize)]
pub struct CompanySubmission {
    pub name: String,
    pub filings: Filings,
}

#[derive(Debug, Deserialize)]
pub struct Filings {
    pub recent: FilingsList,
}

/// Column-oriented list of recent filings, indexed in parallel.
/// Most recent filings come first.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingsList {
    pub accession_number: Vec<String>,
    pub filing_date: Vec<String>,
    pub form: Vec<String>,
    pub primary_document: Vec<String>,
}

/// One entry of the company ticker directory
/// (https://www.sec.gov/files/company_tickers.json).
#[derive(Debug, Clone, Deserialize)]
pub struct TickerEntry {
    pub cik_str: u64,
    pub ticker: String,
    pub title: String,
}

impl TickerEntry {
    /// CIK zero-padded to the 10 digits the data APIs expect.
    pub fn padded_cik(&self) -> String {
        format!("{:010}", self.cik_str)
    }
}

/// A specific filing selected for processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingInfo {
    pub accession_number: String,
    pub filing_date: String,
    pub form_type: String,
    pub ticker: String,
    pub cik: String,
    pub primary_doc: String,
}

impl FilingInfo {
    /// Constructs the URL to access the primary document of this filing
    pub fn primary_doc_url(&self) -> String {
        let acc_no_dashes = self.accession_number.replace("-", "");
        format!(
            "https://www.sec.gov/Archives/edgar/data/{}/{}/{}",
            self.cik, acc_no_dashes, self.primary_doc
        )
    }
}

/// XBRL company-concept response
/// (https://data.sec.gov/api/xbrl/companyconcept/CIK{cik}/us-gaap/{tag}.json).
/// `units` maps a unit of measure ("USD", "shares", ...) to its reported
/// facts; the map keeps JSON document order so the first unit is the one the
/// endpoint lists first.
#[derive(Debug, Deserialize)]
pub struct CompanyConcept {
    pub tag: String,
    #[serde(rename = "entityName")]
    pub entity_name: String,
    pub units: serde_json::Map<String, serde_json::Value>,
}

/// One reported value of a concept.
#[derive(Debug, Clone, Deserialize)]
pub struct ConceptFact {
    /// Period end date, "YYYY-MM-DD"
    pub end: String,
    pub val: f64,
    #[serde(default)]
    pub accn: Option<String>,
    #[serde(default)]
    pub fy: Option<i32>,
    #[serde(default)]
    pub fp: Option<String>,
    /// Form type the value was reported on ("10-K", "10-Q", ...)
    #[serde(default)]
    pub form: Option<String>,
    /// Date the filing was submitted, "YYYY-MM-DD"
    #[serde(default)]
    pub filed: Option<String>,
}

impl CompanyConcept {
    /// Facts for the first unit of measure in the response, document order.
    pub fn first_unit_facts(&self) -> Result<Vec<ConceptFact>, EdgarError> {
        let (unit, values) = self
            .units
            .iter()
            .next()
            .ok_or_else(|| EdgarError::Parse(format!("concept {} has no units", self.tag)))?;
        tracing::debug!("Using unit '{}' for concept {}", unit, self.tag);
        serde_json::from_value(values.clone())
            .map_err(|e| EdgarError::Parse(format!("bad unit facts for {}: {}", self.tag, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_doc_url_strips_accession_dashes() {
        let filing = FilingInfo {
            accession_number: "0000320193-23-000106".to_string(),
            filing_date: "2023-11-03".to_string(),
            form_type: "10-K".to_string(),
            ticker: "AAPL".to_string(),
            cik: "0000320193".to_string(),
            primary_doc: "aapl-20230930.htm".to_string(),
        };
        assert_eq!(
            filing.primary_doc_url(),
            "https://www.sec.gov/Archives/edgar/data/0000320193/000032019323000106/aapl-20230930.htm"
        );
    }

    #[test]
    fn cik_is_zero_padded_to_ten_digits() {
        let entry = TickerEntry {
            cik_str: 320193,
            ticker: "AAPL".to_string(),
            title: "Apple Inc.".to_string(),
        };
        assert_eq!(entry.padded_cik(), "0000320193");
    }

    #[test]
    fn first_unit_facts_follows_document_order() {
        let json = r#"{
            "tag": "Assets",
            "entityName": "Apple Inc.",
            "units": {
                "USD": [{"end": "2023-09-30", "val": 352583000000.0, "form": "10-K", "filed": "2023-11-03"}],
                "EUR": [{"end": "2023-09-30", "val": 1.0}]
            }
        }"#;
        let concept: CompanyConcept = serde_json::from_str(json).unwrap();
        let facts = concept.first_unit_facts().unwrap();
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].end, "2023-09-30");
        assert_eq!(facts[0].form.as_deref(), Some("10-K"));
    }

    #[test]
    fn concept_without_units_is_an_error() {
        let json = r#"{"tag": "Assets", "entityName": "X", "units": {}}"#;
        let concept: CompanyConcept = serde_json::from_str(json).unwrap();
        assert!(concept.first_unit_facts().is_err());
    }
}
