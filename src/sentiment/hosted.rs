use async_trait::async_trait;
use eyre::{bail, eyre, Result, WrapErr};
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::{Classification, Sentiment, SentimentClassifier};

/// The one model reviews are scored with.
pub const MODEL: &str = "distilbert-base-uncased-finetuned-sst-2-english";

const DEFAULT_ENDPOINT: &str = "https://api-inference.huggingface.co/models/";
const BATCH_SIZE: usize = 8;
/// Inputs are cut to this many words before they are sent.
const MAX_WORDS: usize = 256;

/// Sends review text to the hosted inference endpoint for [`MODEL`].
pub struct HostedClassifier {
    client: Client,
    endpoint: Url,
    token: Option<String>,
}

#[derive(Deserialize, Debug)]
struct LabelScore {
    label: String,
    score: f64,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum InferenceResponse {
    /// One list of label scores per input.
    Batch(Vec<Vec<LabelScore>>),
    /// Single input, top label only.
    Single(Vec<LabelScore>),
}

impl HostedClassifier {
    pub fn new(endpoint: Url, token: Option<String>) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(HostedClassifier {
            client,
            endpoint,
            token,
        })
    }

    /// `SENTIMENT_API_URL` (full model URL) or the public endpoint for
    /// [`MODEL`]; `HF_TOKEN` as bearer token when set.
    pub fn from_env() -> Result<Self> {
        let endpoint = match std::env::var("SENTIMENT_API_URL") {
            Ok(url) => Url::parse(&url).wrap_err("invalid SENTIMENT_API_URL")?,
            Err(_) => Url::parse(DEFAULT_ENDPOINT)?.join(MODEL)?,
        };
        let token = std::env::var("HF_TOKEN").ok().filter(|t| !t.is_empty());
        HostedClassifier::new(endpoint, token)
    }

    async fn request(&self, inputs: &[String]) -> Result<Vec<Classification>> {
        let inputs = inputs.iter().map(|t| truncate_words(t)).collect::<Vec<_>>();
        let body = json!({
            "inputs": inputs,
            "options": { "wait_for_model": true },
        });

        let mut request = self.client.post(self.endpoint.to_owned()).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        debug!("classifying {} texts with {MODEL}", inputs.len());
        let response = request
            .send()
            .await
            .wrap_err_with(|| format!("request to {} failed", self.endpoint))?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("sentiment endpoint returned {status}: {detail}");
        }
        let parsed: InferenceResponse = response
            .json()
            .await
            .wrap_err("unreadable sentiment response")?;
        classifications(parsed, inputs.len())
    }
}

fn truncate_words(text: &str) -> String {
    text.split_whitespace()
        .take(MAX_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Highest scoring label of each input.
fn classifications(response: InferenceResponse, expected: usize) -> Result<Vec<Classification>> {
    let per_input = match response {
        InferenceResponse::Batch(lists) => lists,
        InferenceResponse::Single(list) if expected == 1 => vec![list],
        InferenceResponse::Single(list) => list.into_iter().map(|top| vec![top]).collect(),
    };
    if per_input.len() != expected {
        bail!(
            "sentiment endpoint answered {} of {expected} inputs",
            per_input.len()
        );
    }

    per_input
        .into_iter()
        .map(|scores| {
            let best = scores
                .into_iter()
                .max_by(|a, b| a.score.total_cmp(&b.score))
                .ok_or_else(|| eyre!("empty label list"))?;
            Ok(Classification::new(
                Sentiment::from_label(&best.label)?,
                best.score,
            ))
        })
        .collect()
}

#[async_trait]
impl SentimentClassifier for HostedClassifier {
    async fn classify(&self, text: &str) -> Result<Classification> {
        let mut results = self.request(&[text.to_owned()]).await?;
        results.pop().ok_or_else(|| eyre!("no classification returned"))
    }

    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<Classification>> {
        let mut out = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(BATCH_SIZE) {
            out.extend(self.request(chunk).await?);
        }
        Ok(out)
    }
}
