//! Review sentiment, delegated to a pretrained classifier.
//!
//! The model itself is external. [`HostedClassifier`] talks to it over HTTP
//! and [`CachedClassifier`] keeps answers around so repeated page renders do
//! not ask twice.

mod cache;
mod hosted;

use std::fmt;

use async_trait::async_trait;
use eyre::{bail, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::DataPaths;
use crate::scrape::Review;
use crate::store::{load_json, save_json};

pub use cache::CachedClassifier;
pub use hosted::{HostedClassifier, MODEL};

/// Binary sentiment label. Serialized the way the model reports it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sentiment {
    #[serde(rename = "POSITIVE", alias = "Positive", alias = "positive")]
    Positive,
    #[serde(rename = "NEGATIVE", alias = "Negative", alias = "negative")]
    Negative,
}

impl Sentiment {
    /// Maps a model label onto a sentiment. SST-2 checkpoints without label
    /// names report `LABEL_1` for positive and `LABEL_0` for negative.
    pub fn from_label(label: &str) -> Result<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" | "LABEL_1" => Ok(Sentiment::Positive),
            "NEGATIVE" | "LABEL_0" => Ok(Sentiment::Negative),
            other => bail!("unexpected sentiment label {other:?}"),
        }
    }

    pub fn as_label(self) -> &'static str {
        match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Negative => "NEGATIVE",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "Positive"),
            Sentiment::Negative => write!(f, "Negative"),
        }
    }
}

/// A label and the model's probability for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: Sentiment,
    /// Always within `[0, 1]`.
    pub confidence: f64,
}

impl Classification {
    pub fn new(label: Sentiment, confidence: f64) -> Self {
        Classification {
            label,
            confidence: clamp_confidence(confidence),
        }
    }
}

/// Pins a probability into `[0, 1]`. NaN reads as no confidence at all.
pub fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Classification>;

    /// Classifies `texts` in order. The default asks one text at a time.
    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<Classification>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.classify(text).await?);
        }
        Ok(out)
    }
}

/// Fills in `sentiment` and `confidence` on every review that lacks them.
/// Returns how many reviews were classified.
pub async fn score_reviews(
    classifier: &dyn SentimentClassifier,
    reviews: &mut [Review],
) -> Result<usize> {
    let pending = reviews
        .iter()
        .enumerate()
        .filter(|(_, r)| r.sentiment.is_none() || r.confidence.is_none())
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    if pending.is_empty() {
        return Ok(0);
    }

    let texts = pending
        .iter()
        .map(|&i| reviews[i].text.clone())
        .collect::<Vec<_>>();
    let results = classifier.classify_batch(&texts).await?;
    if results.len() != pending.len() {
        bail!(
            "classifier returned {} results for {} reviews",
            results.len(),
            pending.len()
        );
    }

    for (&i, result) in pending.iter().zip(results) {
        reviews[i].sentiment = Some(result.label);
        reviews[i].confidence = Some(result.confidence);
    }
    debug!("classified {} reviews", pending.len());
    Ok(pending.len())
}

/// Scores `reviews.json` into `reviews_scored.json`. A missing input is an
/// error; an empty one still writes an empty output. Returns how many
/// reviews were saved.
pub async fn score_file(paths: &DataPaths, classifier: &dyn SentimentClassifier) -> Result<usize> {
    let input = paths.reviews();
    if !input.exists() {
        bail!("{} not found", input.display());
    }

    let mut reviews: Vec<Review> = load_json(&input)?;
    if !reviews.is_empty() {
        let scored = score_reviews(classifier, &mut reviews).await?;
        info!("classified {scored} of {} reviews", reviews.len());
    }

    save_json(&paths.reviews_scored(), &reviews)?;
    Ok(reviews.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ByLength;

    #[async_trait]
    impl SentimentClassifier for ByLength {
        async fn classify(&self, text: &str) -> Result<Classification> {
            let label = if text.len() > 10 {
                Sentiment::Positive
            } else {
                Sentiment::Negative
            };
            Ok(Classification::new(label, 0.75))
        }
    }

    #[test]
    fn parses_model_labels() {
        assert_eq!(Sentiment::from_label("POSITIVE").unwrap(), Sentiment::Positive);
        assert_eq!(Sentiment::from_label("negative").unwrap(), Sentiment::Negative);
        assert_eq!(Sentiment::from_label("LABEL_1").unwrap(), Sentiment::Positive);
        assert_eq!(Sentiment::from_label("LABEL_0").unwrap(), Sentiment::Negative);
        assert!(Sentiment::from_label("NEUTRAL").is_err());
    }

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(Classification::new(Sentiment::Positive, 1.2).confidence, 1.0);
        assert_eq!(Classification::new(Sentiment::Positive, -0.1).confidence, 0.0);
        assert_eq!(Classification::new(Sentiment::Negative, f64::NAN).confidence, 0.0);
    }

    #[test]
    fn sentiment_round_trips_model_labels() {
        let json = serde_json::to_string(&Sentiment::Negative).unwrap();
        assert_eq!(json, "\"NEGATIVE\"");
        let parsed: Sentiment = serde_json::from_str("\"Positive\"").unwrap();
        assert_eq!(parsed, Sentiment::Positive);
        assert_eq!(Sentiment::Positive.to_string(), "Positive");
    }

    #[tokio::test]
    async fn scores_only_unscored_reviews() {
        let mut reviews = vec![
            Review {
                text: "a long and happy review".into(),
                ..Default::default()
            },
            Review {
                text: "meh".into(),
                sentiment: Some(Sentiment::Positive),
                confidence: Some(0.9),
                ..Default::default()
            },
            Review {
                text: "bad".into(),
                ..Default::default()
            },
        ];

        let scored = score_reviews(&ByLength, &mut reviews).await.unwrap();
        assert_eq!(scored, 2);
        assert_eq!(reviews[0].sentiment, Some(Sentiment::Positive));
        assert_eq!(reviews[1].confidence, Some(0.9));
        assert_eq!(reviews[2].sentiment, Some(Sentiment::Negative));
        assert!(reviews
            .iter()
            .all(|r| matches!(r.confidence, Some(c) if (0.0..=1.0).contains(&c))));
    }
}
