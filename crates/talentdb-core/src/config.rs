//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (nested keys split on `__`, e.g. `APP_CACHE__BACKEND`).
//! Every key has a serde default, so a missing file is a valid configuration.
//! Provides helpers to expand `~` and `${VAR}` and to resolve relative paths
//! against a known base directory.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::Metric;

pub struct Config {
    figment: Figment,
    settings: Settings,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let settings: Settings = figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(Self { figment, settings })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{}': {}", key, e)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub embedding: EmbeddingSettings,
    pub index: IndexSettings,
    pub cache: CacheSettings,
    pub search: SearchSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.search.min_top_k == 0 {
            return Err(Error::InvalidConfig("search.min_top_k must be >= 1".into()));
        }
        if self.search.max_top_k < self.search.min_top_k {
            return Err(Error::InvalidConfig(format!(
                "search.max_top_k ({}) is below search.min_top_k ({})",
                self.search.max_top_k, self.search.min_top_k
            )));
        }
        if self.cache.capacity == 0 {
            return Err(Error::InvalidConfig("cache.capacity must be >= 1".into()));
        }
        if self.embedding.dimension == 0 {
            return Err(Error::InvalidConfig("embedding.dimension must be >= 1".into()));
        }
        if self.embedding.strategies.is_empty() {
            return Err(Error::InvalidConfig("embedding.strategies must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub dataset_path: String,
    pub cache_dir: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self { dataset_path: "dataset/employees.json".into(), cache_dir: ".cache".into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Remote,
    Local,
    Hash,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Tried in order at startup; the first that embeds `probe_text` wins.
    pub strategies: Vec<StrategyKind>,
    pub dimension: usize,
    pub batch_size: usize,
    pub probe_text: String,
    pub show_progress: bool,
    pub remote: RemoteSettings,
    pub local: LocalSettings,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            strategies: vec![StrategyKind::Remote, StrategyKind::Local, StrategyKind::Hash],
            dimension: 768,
            batch_size: 32,
            probe_text: "python developer".into(),
            show_progress: false,
            remote: RemoteSettings::default(),
            local: LocalSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    pub endpoint: String,
    pub model: String,
    pub generation_model: String,
    /// Name of the env var holding the API key (the key itself never lives in config).
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".into(),
            model: "gemini-embedding-001".into(),
            generation_model: "gemini-2.5-flash".into(),
            api_key_env: "GEMINI_API_KEY".into(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalSettings {
    pub model_dir: String,
    pub max_len: usize,
}

impl Default for LocalSettings {
    fn default() -> Self {
        Self { model_dir: "models/bge-m3".into(), max_len: 256 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    pub enabled: bool,
    pub metric: Metric,
    pub embedding_cache_enabled: bool,
    pub embedding_file: String,
    pub embedding_meta_file: String,
    pub index_file: String,
    pub index_meta_file: String,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            metric: Metric::Ip,
            embedding_cache_enabled: true,
            embedding_file: "employee_embeddings.f32".into(),
            embedding_meta_file: "employee_embeddings.json".into(),
            index_file: "employee_flat.index".into(),
            index_meta_file: "employee_flat.json".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendKind {
    Auto,
    Memory,
    External,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub backend: CacheBackendKind,
    pub redis_url: Option<String>,
    pub capacity: usize,
    pub query_ttl_secs: u64,
    pub summary_ttl_secs: u64,
    pub connect_timeout_ms: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: CacheBackendKind::Auto,
            redis_url: None,
            capacity: 1000,
            query_ttl_secs: 300,
            summary_ttl_secs: 600,
            connect_timeout_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub default_top_k: usize,
    pub min_top_k: usize,
    pub max_top_k: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { default_top_k: 5, min_top_k: 1, max_top_k: 20 }
    }
}

impl SearchSettings {
    pub fn clamp_top_k(&self, top_k: usize) -> usize {
        top_k.clamp(self.min_top_k, self.max_top_k)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
