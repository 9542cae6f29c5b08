// src/insight/mod.rs
pub mod classifier;
pub mod sentences;
pub mod summarizer;

use std::collections::BTreeMap;

pub use classifier::{Prediction, SentimentClassifier};
pub use summarizer::Summarizer;

use crate::edgar::filings::fetch_filing_table;
use crate::edgar::EdgarClient;
use crate::insight::sentences::split_sentences;
use crate::insight::summarizer::split_summary;
use crate::utils::error::{AppError, ExtractError, ModelError};

/// Emotion labels the classifier can produce.
pub const EMOTIONS: [&str; 3] = ["positive", "neutral", "negative"];

/// A sentence joins a bucket only above this confidence.
pub const CONFIDENCE_THRESHOLD: f64 = 0.9;

pub const SUMMARY_MIN_LENGTH: usize = 30;
pub const SUMMARY_MAX_LENGTH: usize = 200;

/// How far back to look for the requested filing.
const LOOKBACK_YEARS: usize = 30;

/// The management-discussion section the digest is built from.
const INSIGHT_SECTION: &str = "ITEM 7.";

pub type EmotionBuckets = BTreeMap<String, Vec<String>>;
pub type EmotionSummaries = BTreeMap<String, Vec<String>>;

/// True when a classified sentence qualifies for its bucket: the top label
/// is not neutral and its confidence strictly exceeds the threshold.
fn qualifies(prediction: &Prediction, threshold: f64) -> bool {
    prediction.label != "neutral" && prediction.score > threshold
}

/// Buckets already-classified sentences. Every target label is present as a
/// key; sentences that fail the threshold are dropped entirely, neutral
/// included.
pub fn bucket_sentences(
    classified: Vec<(String, Prediction)>,
    emotions: &[&str],
    threshold: f64,
) -> Result<EmotionBuckets, ModelError> {
    let mut buckets: EmotionBuckets = emotions
        .iter()
        .map(|emotion| (emotion.to_string(), Vec::new()))
        .collect();

    for (sentence, prediction) in classified {
        if !qualifies(&prediction, threshold) {
            continue;
        }
        let bucket = buckets
            .get_mut(&prediction.label)
            .ok_or_else(|| ModelError::Response(format!("unknown label '{}'", prediction.label)))?;
        bucket.push(sentence);
    }

    Ok(buckets)
}

/// Splits `text` into sentences, classifies each one, and buckets the
/// confident non-neutral ones by emotion.
pub async fn find_emotional_sentences(
    classifier: &SentimentClassifier,
    text: &str,
    emotions: &[&str],
    threshold: f64,
) -> Result<EmotionBuckets, ModelError> {
    let sentences = split_sentences(text);
    tracing::debug!("Classifying {} sentences", sentences.len());

    let mut classified = Vec::with_capacity(sentences.len());
    for sentence in sentences {
        let prediction = classifier.classify(&sentence).await?;
        classified.push((sentence, prediction));
    }

    bucket_sentences(classified, emotions, threshold)
}

/// Summarizes each non-empty bucket. Labels with empty buckets never appear
/// in the output.
pub async fn summarize_sentences(
    summarizer: &Summarizer,
    buckets: &EmotionBuckets,
    min_length: usize,
    max_length: usize,
) -> Result<EmotionSummaries, ModelError> {
    let mut summaries = EmotionSummaries::new();

    for (emotion, sentences) in buckets {
        if sentences.is_empty() {
            continue;
        }
        let joined = sentences.join(" ");
        let summary = summarizer.summarize(&joined, min_length, max_length).await?;
        summaries.insert(emotion.clone(), split_summary(&summary));
    }

    Ok(summaries)
}

/// Full digest for one filing: fetch up to thirty years of 10-Ks, take the
/// management-discussion column of the row whose filing date matches
/// `filing_year` exactly, and summarize its emotional sentences.
pub async fn filing_insight(
    edgar: &EdgarClient,
    classifier: &SentimentClassifier,
    summarizer: &Summarizer,
    ticker: &str,
    filing_year: &str,
) -> Result<EmotionSummaries, AppError> {
    let table = fetch_filing_table(edgar, ticker, LOOKBACK_YEARS).await?;

    let column = table
        .find_section_column(INSIGHT_SECTION)
        .ok_or_else(|| ExtractError::SectionNotFound(INSIGHT_SECTION.to_string()))?
        .to_string();

    let row = table
        .find_by_filing_date(filing_year)
        .ok_or_else(|| ExtractError::FilingNotFound(filing_year.to_string()))?;

    let text = row.sections.get(&column).ok_or_else(|| {
        ExtractError::SectionNotFound(format!("{} in filing {}", column, row.accession_number))
    })?;

    let buckets =
        find_emotional_sentences(classifier, text, &EMOTIONS, CONFIDENCE_THRESHOLD).await?;
    let summaries =
        summarize_sentences(summarizer, &buckets, SUMMARY_MIN_LENGTH, SUMMARY_MAX_LENGTH).await?;

    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(label: &str, score: f64) -> Prediction {
        Prediction {
            label: label.to_string(),
            score,
        }
    }

    #[test]
    fn confident_non_neutral_sentences_are_bucketed() {
        let classified = vec![
            ("Great quarter.".to_string(), prediction("positive", 0.95)),
            ("Meh quarter.".to_string(), prediction("positive", 0.85)),
            ("Bad quarter.".to_string(), prediction("negative", 0.99)),
        ];

        let buckets = bucket_sentences(classified, &EMOTIONS, 0.9).unwrap();
        assert_eq!(buckets["positive"], vec!["Great quarter."]);
        assert_eq!(buckets["negative"], vec!["Bad quarter."]);
    }

    #[test]
    fn threshold_comparison_is_strict() {
        let classified = vec![("At the line.".to_string(), prediction("positive", 0.9))];
        let buckets = bucket_sentences(classified, &EMOTIONS, 0.9).unwrap();
        assert!(buckets["positive"].is_empty());
    }

    #[test]
    fn neutral_sentences_are_never_bucketed() {
        let classified = vec![("Facts only.".to_string(), prediction("neutral", 0.99))];
        let buckets = bucket_sentences(classified, &EMOTIONS, 0.9).unwrap();
        assert!(buckets.values().all(Vec::is_empty));
        // the neutral key still exists, it just never fills
        assert!(buckets.contains_key("neutral"));
    }

    #[test]
    fn every_target_label_has_a_bucket() {
        let buckets = bucket_sentences(Vec::new(), &EMOTIONS, 0.9).unwrap();
        assert_eq!(buckets.len(), EMOTIONS.len());
    }

    #[test]
    fn unknown_labels_are_an_error() {
        let classified = vec![("Odd.".to_string(), prediction("bullish", 0.99))];
        assert!(bucket_sentences(classified, &EMOTIONS, 0.9).is_err());
    }

    #[tokio::test]
    async fn empty_buckets_never_reach_the_output() {
        // all buckets empty: the summarizer handle is never called
        let summarizer = Summarizer::new("http://localhost:0", None).unwrap();
        let buckets: EmotionBuckets = EMOTIONS
            .iter()
            .map(|emotion| (emotion.to_string(), Vec::new()))
            .collect();

        let summaries = summarize_sentences(&summarizer, &buckets, 30, 200)
            .await
            .unwrap();
        assert!(summaries.is_empty());
    }

    #[test]
    fn sentence_order_is_preserved_within_a_bucket() {
        let classified = vec![
            ("First.".to_string(), prediction("positive", 0.95)),
            ("Second.".to_string(), prediction("positive", 0.96)),
        ];
        let buckets = bucket_sentences(classified, &EMOTIONS, 0.9).unwrap();
        assert_eq!(buckets["positive"], vec!["First.", "Second."]);
    }
}
