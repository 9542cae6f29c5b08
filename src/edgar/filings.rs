// src/edgar/filings.rs

use crate::edgar::client::EdgarClient;
use crate::extractors::{extract_sections, parse_document_elements, FilingRow, FilingTable};
use crate::utils::error::EdgarError;

/// Retrieves the `years` most recent 10-K filings for `ticker` and builds the
/// consolidated section table, one row per filing, in the order the
/// submission index returns them.
///
/// All-or-nothing: a download or parse failure for any one filing fails the
/// whole fetch. There is no per-filing retry and no partial table.
pub async fn fetch_filing_table(
    edgar: &EdgarClient,
    ticker: &str,
    years: usize,
) -> Result<FilingTable, EdgarError> {
    let filings = edgar.recent_10k_filings(ticker, years).await?;
    tracing::info!("Found {} 10-K filings for {}", filings.len(), ticker);

    let mut table = FilingTable::new();
    for filing in filings {
        let url = filing.primary_doc_url();
        tracing::info!(
            "Processing filing {} ({})",
            filing.accession_number,
            filing.filing_date
        );

        let html = edgar.download_filing_doc(&url).await?;
        let elements = parse_document_elements(&html);
        let sections = extract_sections(&elements);
        tracing::debug!(
            "Extracted {} sections from {}",
            sections.len(),
            filing.accession_number
        );

        table.push(FilingRow {
            ticker: filing.ticker,
            form_type: filing.form_type,
            accession_number: filing.accession_number,
            filing_date: filing.filing_date,
            sections,
        });
    }

    tracing::info!(
        "Consolidated {} filing rows for {}",
        table.rows().len(),
        ticker
    );
    Ok(table)
}
