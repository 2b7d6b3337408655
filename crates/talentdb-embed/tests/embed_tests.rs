use std::sync::Arc;

use httpmock::prelude::*;
use serde_json::json;

use talentdb_core::config::{EmbeddingSettings, LocalSettings, RemoteSettings, StrategyKind};
use talentdb_core::traits::{EmbeddingStrategy, SummaryGenerator};
use talentdb_core::types::EmbeddingStats;
use talentdb_core::{Error, Result};
use talentdb_embed::select::SharedStrategy;
use talentdb_embed::{
    first_working, select_strategy, HashEmbedding, LocalModelEmbedding, RemoteApiEmbedding,
    RemoteApiGenerator,
};

fn remote_settings(server: &MockServer) -> RemoteSettings {
    RemoteSettings {
        endpoint: server.base_url(),
        model: "emb".into(),
        generation_model: "gen".into(),
        api_key_env: "TALENTDB_TEST_KEY_THAT_IS_NEVER_SET".into(),
        timeout_secs: 5,
    }
}

fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

#[test]
fn hash_embedding_is_deterministic_and_normalized() {
    let e = HashEmbedding::new(384).expect("hash");
    let texts = vec!["python developer".to_string(), "python developer".to_string()];
    let rows = e.embed_documents(&texts).expect("embed");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].len(), 384);
    assert_eq!(rows[0], rows[1]);
    assert!((norm(&rows[0]) - 1.0).abs() < 1e-4);
    assert_eq!(e.embed_query("python developer").expect("query"), rows[0]);
}

#[test]
fn remote_query_uses_query_mode_and_normalizes() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/models/emb:embedContent")
            .header("x-goog-api-key", "test-key");
        then.status(200).json_body(json!({"embedding": {"values": [3.0, 0.0, 4.0]}}));
    });

    let e = RemoteApiEmbedding::with_api_key(&remote_settings(&server), 3, "test-key").expect("remote");
    let v = e.embed_query("python").expect("embed");
    mock.assert();
    assert!((v[0] - 0.6).abs() < 1e-6 && (v[2] - 0.8).abs() < 1e-6, "{v:?}");
    assert!(e.stats().query_mode);
}

#[test]
fn remote_documents_keep_input_order() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/models/emb:batchEmbedContents");
        then.status(200).json_body(json!({"embeddings": [
            {"values": [1.0, 0.0]},
            {"values": [0.0, 2.0]}
        ]}));
    });

    let e = RemoteApiEmbedding::with_api_key(&remote_settings(&server), 2, "k").expect("remote");
    let rows = e
        .embed_documents(&["first".to_string(), "second".to_string()])
        .expect("embed");
    mock.assert();
    assert_eq!(rows, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
}

#[test]
fn remote_http_error_is_a_provider_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/models/emb:embedContent");
        then.status(500).body("boom");
    });
    let e = RemoteApiEmbedding::with_api_key(&remote_settings(&server), 3, "k").expect("remote");
    let err = e.embed_query("python").expect_err("must fail");
    assert!(matches!(err, Error::EmbeddingProvider(_)), "{err:?}");
}

#[test]
fn remote_wrong_dimension_is_rejected() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/models/emb:embedContent");
        then.status(200).json_body(json!({"embedding": {"values": [1.0, 2.0]}}));
    });
    let e = RemoteApiEmbedding::with_api_key(&remote_settings(&server), 3, "k").expect("remote");
    assert!(matches!(e.embed_query("x"), Err(Error::EmbeddingProvider(_))));
}

#[test]
fn remote_without_key_is_unavailable() {
    let server = MockServer::start();
    let err = RemoteApiEmbedding::new(&remote_settings(&server), 3).err().expect("no key");
    assert!(matches!(err, Error::EmbeddingUnavailable(_)), "{err:?}");
}

#[test]
fn generator_parses_typed_response() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/models/gen:generateContent");
        then.status(200).json_body(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": "Alice fits best."}]}}]
        }));
    });
    let g = RemoteApiGenerator::with_api_key(&remote_settings(&server), "k").expect("generator");
    let text = g.generate("system", "user", 800, 0.7).expect("generate");
    assert_eq!(text, "Alice fits best.");
}

struct Broken;

impl EmbeddingStrategy for Broken {
    fn model_id(&self) -> &str {
        "broken"
    }
    fn dim(&self) -> usize {
        4
    }
    fn embed_documents(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(Error::EmbeddingProvider("down".into()))
    }
    fn embed_query(&self, _text: &str) -> Result<Vec<f32>> {
        Err(Error::EmbeddingProvider("down".into()))
    }
    fn stats(&self) -> EmbeddingStats {
        EmbeddingStats {
            model: "broken".into(),
            dimension: 4,
            provider: "test".into(),
            query_mode: false,
            normalized: false,
        }
    }
}

#[test]
fn selection_skips_a_strategy_whose_probe_fails() {
    let broken: SharedStrategy = Arc::new(Broken);
    let hash: SharedStrategy = Arc::new(HashEmbedding::new(16).expect("hash"));
    let chosen = first_working(
        vec![("broken".to_string(), Ok(broken)), ("hash".to_string(), Ok(hash))],
        "python developer",
    )
    .expect("hash wins");
    assert_eq!(chosen.model_id(), "hash-xxh64-16");
}

#[test]
fn selection_reports_every_failure_when_all_fail() {
    let server = MockServer::start();
    let remote = RemoteApiEmbedding::new(&remote_settings(&server), 8).map(|e| Arc::new(e) as SharedStrategy);
    let local = LocalModelEmbedding::new(&LocalSettings {
        model_dir: "/nonexistent/talentdb/models".into(),
        max_len: 16,
    })
    .map(|e| Arc::new(e) as SharedStrategy);
    let broken: SharedStrategy = Arc::new(Broken);

    let err = first_working(
        vec![
            ("remote".to_string(), remote),
            ("local".to_string(), local),
            ("broken".to_string(), Ok(broken)),
        ],
        "probe",
    )
    .err()
    .expect("all fail");
    match err {
        Error::EmbeddingUnavailable(msg) => {
            for name in ["remote:", "local:", "broken:"] {
                assert!(msg.contains(name), "{name} missing from {msg}");
            }
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn configured_hash_fallback_after_remote() {
    let server = MockServer::start();
    let settings = EmbeddingSettings {
        strategies: vec![StrategyKind::Remote, StrategyKind::Hash],
        dimension: 32,
        remote: remote_settings(&server),
        ..EmbeddingSettings::default()
    };
    let chosen = select_strategy(&settings).expect("hash fallback");
    assert_eq!(chosen.stats().provider, "hash");
    assert_eq!(chosen.dim(), 32);
}
