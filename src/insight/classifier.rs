// src/insight/classifier.rs

use serde::Deserialize;

use crate::utils::error::ModelError;

/// Financial-sentiment classification model served by the inference host.
pub const CLASSIFIER_MODEL: &str = "ProsusAI/finbert";

/// Top label and confidence for one sentence.
#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub score: f64,
}

/// Handle on the hosted text-classification model. Constructed once at
/// startup and passed into the components that need it.
#[derive(Debug, Clone)]
pub struct SentimentClassifier {
    client: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
}

impl SentimentClassifier {
    /// `base_url` is the inference host, e.g.
    /// "https://api-inference.huggingface.co".
    pub fn new(base_url: &str, api_token: Option<String>) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/models/{}", base_url.trim_end_matches('/'), CLASSIFIER_MODEL),
            api_token,
        })
    }

    /// Classifies one sentence and returns the top prediction.
    pub async fn classify(&self, sentence: &str) -> Result<Prediction, ModelError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "inputs": sentence }));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::error!("Classification request failed with {}", status);
            return Err(ModelError::Http(status));
        }

        // One input yields one list of label scores, best first.
        let predictions: Vec<Vec<Prediction>> = response.json().await?;
        predictions
            .into_iter()
            .flatten()
            .next()
            .ok_or_else(|| ModelError::Response("empty classification result".to_string()))
    }
}
