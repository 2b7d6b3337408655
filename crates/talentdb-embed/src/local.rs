use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::xlm_roberta::{Config as XLMRobertaConfig, XLMRobertaModel};
use tokenizers::Tokenizer;

use talentdb_core::config::{expand_path, LocalSettings};
use talentdb_core::traits::EmbeddingStrategy;
use talentdb_core::types::EmbeddingStats;
use talentdb_core::{Error, Result};

use crate::device::select_device;
use crate::pool::masked_mean_l2;
use crate::provider_err;
use crate::tokenize::tokenize_on_device;

pub const BGE_M3_DIM: usize = 1024;
const MODEL_ID: &str = "bge-m3";

/// BGE-M3 (XLM-RoBERTa) run in-process with candle. Queries and documents
/// share one encoding path; output is mean-pooled and L2-normalized.
pub struct LocalModelEmbedding {
    model: XLMRobertaModel,
    tokenizer: Tokenizer,
    device: Device,
    max_len: usize,
}

impl LocalModelEmbedding {
    pub fn new(settings: &LocalSettings) -> Result<Self> {
        let model_dir = resolve_model_dir(&settings.model_dir)?;
        let device = select_device();
        tracing::info!(dir = %model_dir.display(), "loading BGE-M3");

        let unavailable = |what: &str, path: &Path, e: &dyn std::fmt::Display| {
            Error::EmbeddingUnavailable(format!("failed to load {what} from {}: {e}", path.display()))
        };

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| unavailable("tokenizer", &tokenizer_path, &e))?;

        let config_path = model_dir.join("config.json");
        let raw = std::fs::read_to_string(&config_path)
            .map_err(|e| unavailable("model config", &config_path, &e))?;
        let config: XLMRobertaConfig = serde_json::from_str(&raw)
            .map_err(|e| unavailable("model config", &config_path, &e))?;

        let weights_path = model_dir.join("pytorch_model.bin");
        let weights = candle_core::pickle::read_all(&weights_path)
            .map_err(|e| unavailable("weights", &weights_path, &e))?;
        let weights: HashMap<String, Tensor> = weights.into_iter().collect();
        let vb = VarBuilder::from_tensors(weights, DType::F32, &device);
        let model = XLMRobertaModel::new(&config, vb)
            .map_err(|e| unavailable("model", &model_dir, &e))?;

        tracing::info!("BGE-M3 loaded");
        Ok(Self { model, tokenizer, device, max_len: settings.max_len.max(1) })
    }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let start = Instant::now();
        let (input_ids, attention_mask) =
            tokenize_on_device(&self.tokenizer, text, self.max_len, &self.device)?;
        let token_type_ids =
            Tensor::zeros((1, self.max_len), DType::I64, &self.device).map_err(provider_err)?;
        let hidden = self
            .model
            .forward(&input_ids, &attention_mask, &token_type_ids, None, None, None)
            .map_err(provider_err)?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        let v: Vec<f32> = pooled
            .to_device(&Device::Cpu)
            .and_then(|t| t.squeeze(0))
            .and_then(|t| t.to_vec1())
            .map_err(provider_err)?;
        if v.len() != BGE_M3_DIM {
            return Err(Error::EmbeddingProvider(format!(
                "expected {BGE_M3_DIM}-d output, got {}",
                v.len()
            )));
        }
        let elapsed = start.elapsed();
        if elapsed.as_millis() > 100 {
            tracing::debug!(ms = elapsed.as_millis() as u64, "slow local embedding");
        }
        Ok(v)
    }
}

impl EmbeddingStrategy for LocalModelEmbedding {
    fn model_id(&self) -> &str {
        MODEL_ID
    }

    fn dim(&self) -> usize {
        BGE_M3_DIM
    }

    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed_text(t)).collect()
    }

    fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_text(text)
    }

    fn stats(&self) -> EmbeddingStats {
        EmbeddingStats {
            model: MODEL_ID.into(),
            dimension: BGE_M3_DIM,
            provider: "local".into(),
            query_mode: false,
            normalized: true,
        }
    }
}

/// `APP_MODEL_DIR`, then `MODEL_DIR`, then the configured directory.
pub fn resolve_model_dir(configured: &str) -> Result<PathBuf> {
    let candidates = ["APP_MODEL_DIR", "MODEL_DIR"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(expand_path)
        .chain(std::iter::once(expand_path(configured)));
    for dir in candidates {
        if dir.is_dir() {
            return Ok(dir);
        }
    }
    Err(Error::EmbeddingUnavailable(format!(
        "BGE-M3 model directory not found (configured: {configured})"
    )))
}
