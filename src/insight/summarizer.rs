// src/insight/summarizer.rs

use serde::Deserialize;

use crate::utils::error::ModelError;

/// Abstractive summarization model served by the inference host.
pub const SUMMARIZER_MODEL: &str = "t5-base";

#[derive(Debug, Deserialize)]
struct SummaryOutput {
    summary_text: String,
}

/// Handle on the hosted summarization model. Constructed once at startup and
/// passed into the components that need it.
#[derive(Debug, Clone)]
pub struct Summarizer {
    client: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
}

impl Summarizer {
    /// `base_url` is the inference host, e.g.
    /// "https://api-inference.huggingface.co".
    pub fn new(base_url: &str, api_token: Option<String>) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/models/{}", base_url.trim_end_matches('/'), SUMMARIZER_MODEL),
            api_token,
        })
    }

    /// Produces an abstractive summary bounded by (min_length, max_length)
    /// tokens.
    pub async fn summarize(
        &self,
        text: &str,
        min_length: usize,
        max_length: usize,
    ) -> Result<String, ModelError> {
        let mut request = self.client.post(&self.endpoint).json(&serde_json::json!({
            "inputs": text,
            "parameters": { "min_length": min_length, "max_length": max_length },
        }));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::error!("Summarization request failed with {}", status);
            return Err(ModelError::Http(status));
        }

        let outputs: Vec<SummaryOutput> = response.json().await?;
        outputs
            .into_iter()
            .next()
            .map(|output| output.summary_text)
            .ok_or_else(|| ModelError::Response("empty summarization result".to_string()))
    }
}

/// Splits a produced summary into its sentences: split on periods, trim,
/// drop empty fragments, preserve order.
pub fn split_summary(summary: &str) -> Vec<String> {
    summary
        .split('.')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .collect()
}
