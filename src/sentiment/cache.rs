use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use eyre::{eyre, Result};

use super::{Classification, SentimentClassifier};

/// Remembers every answer of the wrapped classifier, keyed by input text.
/// Lives as long as the process.
pub struct CachedClassifier<C> {
    inner: C,
    memo: Mutex<HashMap<String, Classification>>,
}

impl<C> CachedClassifier<C> {
    pub fn new(inner: C) -> Self {
        CachedClassifier {
            inner,
            memo: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.memo.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, text: &str) -> Result<Option<Classification>> {
        let memo = self.memo.lock().map_err(|_| eyre!("classifier cache poisoned"))?;
        Ok(memo.get(text).copied())
    }

    fn remember(&self, text: &str, result: Classification) -> Result<()> {
        let mut memo = self.memo.lock().map_err(|_| eyre!("classifier cache poisoned"))?;
        memo.insert(text.to_owned(), result);
        Ok(())
    }
}

#[async_trait]
impl<C: SentimentClassifier> SentimentClassifier for CachedClassifier<C> {
    async fn classify(&self, text: &str) -> Result<Classification> {
        if let Some(hit) = self.lookup(text)? {
            return Ok(hit);
        }
        let result = self.inner.classify(text).await?;
        self.remember(text, result)?;
        Ok(result)
    }

    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<Classification>> {
        let mut known = Vec::with_capacity(texts.len());
        let mut misses = Vec::new();
        for text in texts {
            let hit = self.lookup(text)?;
            if hit.is_none() && !misses.contains(text) {
                misses.push(text.clone());
            }
            known.push(hit);
        }

        if !misses.is_empty() {
            let fresh = self.inner.classify_batch(&misses).await?;
            for (text, result) in misses.iter().zip(fresh) {
                self.remember(text, result)?;
            }
        }

        texts
            .iter()
            .zip(known)
            .map(|(text, hit)| match hit {
                Some(hit) => Ok(hit),
                None => self
                    .lookup(text)?
                    .ok_or_else(|| eyre!("classifier skipped {text:?}")),
            })
            .collect()
    }
}
