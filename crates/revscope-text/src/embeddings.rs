//! Embedding model seam and the TEI (Text Embeddings Inference) client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::TextError;

/// Maximum number of texts per /embed call.
const BATCH_SIZE: usize = 64;

/// A pretrained model that maps short texts to dense vectors.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Return one vector per input text, in input order.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, TextError>;
}

/// TEI HTTP client.
#[derive(Debug, Clone)]
pub struct TeiClient {
    client: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [&'a str],
}

impl TeiClient {
    /// Create a new `TeiClient` for the server at `tei_url`.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Http`] if the HTTP client cannot be built.
    pub fn new(tei_url: &str, timeout_secs: u64) -> Result<Self, TextError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: format!("{}/embed", tei_url.trim_end_matches('/')),
        })
    }

    async fn embed_batch(&self, batch: &[&str]) -> Result<Vec<Vec<f32>>, TextError> {
        let response = self
            .client
            .post(&self.url)
            .json(&EmbedRequest { inputs: batch })
            .send()
            .await
            .map_err(|e| TextError::Tei(format!("TEI request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TextError::Tei(format!("TEI returned status {status}")));
        }

        let vectors: Vec<Vec<f32>> = response
            .json()
            .await
            .map_err(|e| TextError::Tei(format!("TEI response parse error: {e}")))?;

        if vectors.len() == batch.len() {
            Ok(vectors)
        } else {
            Err(TextError::Tei(format!(
                "TEI returned {} embeddings for {} inputs",
                vectors.len(),
                batch.len()
            )))
        }
    }
}

#[async_trait]
impl Embedder for TeiClient {
    /// Inputs are sent [`BATCH_SIZE`] at a time; output order matches input.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Tei`] if a request fails, the server answers with a
    /// non-success status, or a response is malformed or short.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, TextError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(BATCH_SIZE) {
            vectors.extend(self.embed_batch(batch).await?);
            tracing::trace!(sent = batch.len(), total = texts.len(), "TEI batch embedded");
        }
        Ok(vectors)
    }
}
