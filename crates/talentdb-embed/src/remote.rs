//! Gemini-style REST provider: batch/query embeddings and text generation.
//!
//! Requests carry the key in the `x-goog-api-key` header. Every response is
//! parsed into one typed shape; anything else is an `EmbeddingProvider` error.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use talentdb_core::config::RemoteSettings;
use talentdb_core::traits::{normalize_if_needed, EmbeddingStrategy, SummaryGenerator};
use talentdb_core::types::EmbeddingStats;
use talentdb_core::{Error, Result};

use crate::provider_err;

/// Provider cap on `batchEmbedContents` requests.
pub const MAX_BATCH: usize = 100;

struct ApiClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
}

impl ApiClient {
    fn new(settings: &RemoteSettings, api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::EmbeddingUnavailable(format!(
                "API key is empty (set {})",
                settings.api_key_env
            )));
        }
        if settings.endpoint.trim().is_empty() {
            return Err(Error::EmbeddingUnavailable("remote endpoint is empty".into()));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .build()
            .map_err(|e| Error::EmbeddingUnavailable(format!("http client: {e}")))?;
        Ok(Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn from_env(settings: &RemoteSettings) -> Result<Self> {
        let key = std::env::var(&settings.api_key_env).map_err(|_| {
            Error::EmbeddingUnavailable(format!("{} is not set", settings.api_key_env))
        })?;
        Self::new(settings, key)
    }

    fn call<B: Serialize, R: DeserializeOwned>(&self, model: &str, method: &str, body: &B) -> Result<R> {
        let url = format!("{}/models/{}:{}", self.endpoint, model, method);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .map_err(|e| provider_err(format!("{method} request failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(Error::EmbeddingProvider(format!(
                "{method} returned HTTP {status}: {}",
                detail.chars().take(200).collect::<String>()
            )));
        }
        response
            .json()
            .map_err(|e| provider_err(format!("{method} response parse: {e}")))
    }
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

impl<'a> Content<'a> {
    fn text(text: &'a str) -> Self {
        Self { role: None, parts: vec![Part { text }] }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedRequest<'a> {
    model: String,
    content: Content<'a>,
    task_type: &'static str,
    output_dimensionality: usize,
}

#[derive(Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedRequest<'a>>,
}

#[derive(Deserialize)]
struct Values {
    values: Vec<f32>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Values,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    embeddings: Vec<Values>,
}

pub struct RemoteApiEmbedding {
    api: ApiClient,
    model: String,
    dim: usize,
}

impl RemoteApiEmbedding {
    /// Reads the key from the env var named by `settings.api_key_env`.
    pub fn new(settings: &RemoteSettings, dim: usize) -> Result<Self> {
        Self::build(ApiClient::from_env(settings)?, settings, dim)
    }

    pub fn with_api_key(settings: &RemoteSettings, dim: usize, api_key: impl Into<String>) -> Result<Self> {
        Self::build(ApiClient::new(settings, api_key.into())?, settings, dim)
    }

    fn build(api: ApiClient, settings: &RemoteSettings, dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(Error::EmbeddingUnavailable("remote embedding needs dimension >= 1".into()));
        }
        Ok(Self { api, model: settings.model.clone(), dim })
    }

    fn request<'a>(&self, text: &'a str, task_type: &'static str) -> EmbedRequest<'a> {
        EmbedRequest {
            model: format!("models/{}", self.model),
            content: Content::text(text),
            task_type,
            output_dimensionality: self.dim,
        }
    }

    fn finish(&self, mut v: Vec<f32>) -> Result<Vec<f32>> {
        if v.len() != self.dim {
            return Err(Error::EmbeddingProvider(format!(
                "expected {}-d embedding, provider returned {}",
                self.dim,
                v.len()
            )));
        }
        normalize_if_needed(&mut v);
        Ok(v)
    }
}

impl EmbeddingStrategy for RemoteApiEmbedding {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(MAX_BATCH) {
            let body = BatchEmbedRequest {
                requests: chunk.iter().map(|t| self.request(t, "RETRIEVAL_DOCUMENT")).collect(),
            };
            let resp: BatchEmbedResponse = self.api.call(&self.model, "batchEmbedContents", &body)?;
            if resp.embeddings.len() != chunk.len() {
                return Err(Error::EmbeddingProvider(format!(
                    "batch of {} texts returned {} embeddings",
                    chunk.len(),
                    resp.embeddings.len()
                )));
            }
            for e in resp.embeddings {
                out.push(self.finish(e.values)?);
            }
            tracing::debug!(done = out.len(), total = texts.len(), "remote batch embedded");
        }
        Ok(out)
    }

    fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let body = self.request(text, "RETRIEVAL_QUERY");
        let resp: EmbedResponse = self.api.call(&self.model, "embedContent", &body)?;
        self.finish(resp.embedding.values)
    }

    fn stats(&self) -> EmbeddingStats {
        EmbeddingStats {
            model: self.model.clone(),
            dimension: self.dim,
            provider: "remote".into(),
            query_mode: true,
            normalized: self.dim < talentdb_core::traits::NORMALIZATION_THRESHOLD,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Result<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(Error::EmbeddingProvider("generation response carried no candidate text".into()));
        }
        Ok(text)
    }
}

pub struct RemoteApiGenerator {
    api: ApiClient,
    model: String,
}

impl RemoteApiGenerator {
    pub fn new(settings: &RemoteSettings) -> Result<Self> {
        Ok(Self { api: ApiClient::from_env(settings)?, model: settings.generation_model.clone() })
    }

    pub fn with_api_key(settings: &RemoteSettings, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(settings, api_key.into())?,
            model: settings.generation_model.clone(),
        })
    }
}

impl SummaryGenerator for RemoteApiGenerator {
    fn generate(&self, system_prompt: &str, user_prompt: &str, max_tokens: u32, temperature: f32) -> Result<String> {
        let body = GenerateRequest {
            system_instruction: Content::text(system_prompt),
            contents: vec![Content { role: Some("user"), parts: vec![Part { text: user_prompt }] }],
            generation_config: GenerationConfig { max_output_tokens: max_tokens, temperature },
        };
        let resp: GenerateResponse = self.api.call(&self.model, "generateContent", &body)?;
        resp.into_text()
    }
}
