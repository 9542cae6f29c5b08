// src/main.rs
mod api;
mod edgar;
mod extractors;
mod insight;
mod utils;
mod viz;

use clap::Parser;

use api::AppState;
use edgar::client::DEFAULT_REQUEST_DELAY_MS;
use edgar::EdgarClient;
use insight::{SentimentClassifier, Summarizer};
use utils::AppError;

/// Filing digest service: labeled-section extraction, per-emotion summaries,
/// and concept time-series charts for SEC filings.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the HTTP API on
    #[arg(long, default_value = "0.0.0.0:5000")]
    bind: String,

    /// Identifying contact the SEC requires in the User-Agent header
    #[arg(long, default_value = "filing-digest analyst@example.com")]
    sec_contact: String,

    /// Base URL of the model inference host
    #[arg(long, default_value = "https://api-inference.huggingface.co")]
    inference_url: String,

    /// API token for the inference host (falls back to INFERENCE_API_TOKEN)
    #[arg(long)]
    inference_token: Option<String>,

    /// Delay before each EDGAR request, in milliseconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_DELAY_MS)]
    request_delay_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::init();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!(
        "Starting filing digest service on {} (inference host {})",
        args.bind,
        args.inference_url
    );

    let inference_token = args
        .inference_token
        .or_else(|| std::env::var("INFERENCE_API_TOKEN").ok());

    // 3. Build the shared service handles
    let edgar = EdgarClient::new(&args.sec_contact, args.request_delay_ms)?;
    let classifier = SentimentClassifier::new(&args.inference_url, inference_token.clone())?;
    let summarizer = Summarizer::new(&args.inference_url, inference_token)?;

    // 4. Serve the API
    let app = api::router(AppState {
        edgar,
        classifier,
        summarizer,
    });

    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    tracing::info!("Listening on {}", args.bind);
    axum::serve(listener, app).await?;

    Ok(())
}
