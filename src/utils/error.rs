// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum EdgarError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 404 Not Found, 403 Forbidden

    #[error("SEC Rate limit likely exceeded")]
    RateLimited,

    #[error("No ticker directory entry matches '{0}'")]
    TickerNotFound(String),

    #[error("Could not find specified filing: {0}")]
    FilingDocNotFound(String),

    #[error("Failed to parse EDGAR response: {0}")]
    Parse(String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("No filing matches date {0}")]
    FilingNotFound(String),
}

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Inference request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Inference endpoint returned {0}")]
    Http(reqwest::StatusCode),

    #[error("Unexpected model response: {0}")]
    Response(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("EDGAR interaction failed: {0}")]
    Edgar(#[from] EdgarError), // Automatically convert Edgar errors

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Model inference failed: {0}")]
    Model(#[from] ModelError),
}
