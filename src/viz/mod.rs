// src/viz/mod.rs
pub mod chart;

use std::collections::BTreeSet;

use chrono::{Datelike, Local, NaiveDate};

use crate::edgar::models::ConceptFact;
use crate::edgar::EdgarClient;
use crate::utils::error::{AppError, EdgarError};
use chart::{build_concept_figure, Figure};

pub const DEFAULT_TICKER: &str = "AAPL";
pub const DEFAULT_CONCEPT: &str = "Assets";

/// One reported value of a concept, ready for charting.
#[derive(Debug, Clone)]
pub struct ConceptPoint {
    pub end: NaiveDate,
    pub val: f64,
}

fn parse_end_date(fact: &ConceptFact) -> Result<NaiveDate, EdgarError> {
    NaiveDate::parse_from_str(&fact.end, "%Y-%m-%d")
        .map_err(|e| EdgarError::Parse(format!("bad end date '{}': {}", fact.end, e)))
}

/// Quarterly-report values only, in the order the endpoint returned them.
fn quarterly_points(facts: &[ConceptFact]) -> Result<Vec<ConceptPoint>, EdgarError> {
    facts
        .iter()
        .filter(|fact| fact.form.as_deref() == Some("10-Q"))
        .map(|fact| {
            Ok(ConceptPoint {
                end: parse_end_date(fact)?,
                val: fact.val,
            })
        })
        .collect()
}

/// Distinct filing dates among annual-report values, ascending. ISO dates
/// sort lexicographically, so a string set is already chronological.
fn annual_filed_dates(facts: &[ConceptFact]) -> Vec<String> {
    facts
        .iter()
        .filter(|fact| fact.form.as_deref() == Some("10-K"))
        .filter_map(|fact| fact.filed.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Resolves the ticker (exact match, fresh directory fetch), pulls the
/// concept's history, and builds the three-window chart figure.
pub async fn visualize_concept(
    edgar: &EdgarClient,
    ticker: &str,
    concept: &str,
) -> Result<Figure, AppError> {
    let cik = edgar.resolve_cik(ticker).await?;
    let response = edgar.company_concept(&cik, concept).await?;
    let facts = response.first_unit_facts()?;
    let points = quarterly_points(&facts)?;
    tracing::info!(
        "Charting {} quarterly values of {} for {}",
        points.len(),
        concept,
        ticker
    );

    Ok(build_concept_figure(&points, concept, Local::now().year()))
}

/// Sorted distinct filing dates for a concept's annual reports.
pub async fn filing_dates(
    edgar: &EdgarClient,
    ticker: &str,
    concept: &str,
) -> Result<Vec<String>, AppError> {
    let cik = edgar.resolve_cik(ticker).await?;
    let response = edgar.company_concept(&cik, concept).await?;
    let facts = response.first_unit_facts()?;
    Ok(annual_filed_dates(&facts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact(end: &str, val: f64, form: &str, filed: &str) -> ConceptFact {
        ConceptFact {
            end: end.to_string(),
            val,
            accn: None,
            fy: None,
            fp: None,
            form: Some(form.to_string()),
            filed: Some(filed.to_string()),
        }
    }

    #[test]
    fn only_quarterly_values_are_charted() {
        let facts = vec![
            fact("2023-09-30", 350.0, "10-K", "2023-11-03"),
            fact("2023-06-30", 330.0, "10-Q", "2023-08-04"),
            fact("2023-03-31", 320.0, "10-Q", "2023-05-05"),
        ];

        let points = quarterly_points(&facts).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].end.to_string(), "2023-06-30");
    }

    #[test]
    fn malformed_end_dates_fail_the_fetch() {
        let facts = vec![fact("soon", 1.0, "10-Q", "2023-08-04")];
        assert!(quarterly_points(&facts).is_err());
    }

    #[test]
    fn filing_dates_are_distinct_and_ascending() {
        let facts = vec![
            fact("2023-09-30", 350.0, "10-K", "2023-11-03"),
            fact("2022-09-24", 340.0, "10-K", "2022-10-28"),
            fact("2023-09-30", 350.0, "10-K", "2023-11-03"),
            fact("2023-06-30", 330.0, "10-Q", "2023-08-04"),
        ];

        assert_eq!(
            annual_filed_dates(&facts),
            vec!["2022-10-28", "2023-11-03"]
        );
    }
}
