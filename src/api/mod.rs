// src/api/mod.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::edgar::EdgarClient;
use crate::insight::{self, EmotionSummaries, SentimentClassifier, Summarizer};
use crate::utils::error::AppError;
use crate::viz;

/// Shared service handles. Built once at startup, read-only afterwards;
/// handlers hold no other state.
#[derive(Clone)]
pub struct AppState {
    pub edgar: EdgarClient,
    pub classifier: SentimentClassifier,
    pub summarizer: Summarizer,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/visualize", get(visualize))
        .route("/api/filing-dates/:ticker", get(list_filing_dates))
        .route("/api/filing-insight", post(create_filing_insight))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct VisualizeParams {
    ticker: Option<String>,
    concept: Option<String>,
}

/// GET /api/visualize?ticker=AAPL&concept=Assets
async fn visualize(
    State(state): State<AppState>,
    Query(params): Query<VisualizeParams>,
) -> Result<impl IntoResponse, AppError> {
    let ticker = params.ticker.as_deref().unwrap_or(viz::DEFAULT_TICKER);
    let concept = params.concept.as_deref().unwrap_or(viz::DEFAULT_CONCEPT);

    let figure = viz::visualize_concept(&state.edgar, ticker, concept).await?;
    Ok(Json(figure))
}

/// GET /api/filing-dates/:ticker
async fn list_filing_dates(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    let dates = viz::filing_dates(&state.edgar, &ticker, viz::DEFAULT_CONCEPT).await?;
    Ok(Json(dates))
}

#[derive(Debug, Deserialize)]
struct InsightRequest {
    ticker: String,
    filing_year: String,
}

/// POST /api/filing-insight  {"ticker": ..., "filing_year": ...}
async fn create_filing_insight(
    State(state): State<AppState>,
    Json(request): Json<InsightRequest>,
) -> Result<Json<EmotionSummaries>, AppError> {
    let summaries = insight::filing_insight(
        &state.edgar,
        &state.classifier,
        &state.summarizer,
        &request.ticker,
        &request.filing_year,
    )
    .await?;
    Ok(Json(summaries))
}

// Any upstream failure propagates here uncaught and becomes a plain 500.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insight_request_uses_the_wire_field_names() {
        let request: InsightRequest =
            serde_json::from_str(r#"{"ticker": "AAPL", "filing_year": "2023-11-03"}"#).unwrap();
        assert_eq!(request.ticker, "AAPL");
        assert_eq!(request.filing_year, "2023-11-03");
    }

    #[test]
    fn visualize_params_are_optional() {
        let params: VisualizeParams = serde_json::from_str("{}").unwrap();
        assert!(params.ticker.is_none());
        assert!(params.concept.is_none());
    }
}
