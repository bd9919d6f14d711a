//! Wire-level tests for the Gemini client against a local stand-in server

#[cfg(test)]
mod wire_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use axum::http::HeaderMap;
    use axum::routing::post;
    use axum::{Json, Router};
    use insta::assert_yaml_snapshot;
    use serde_json::{Value, json};

    use crate::{EmbeddingProvider, GeminiClient, GeminiConfig, GenerationConfig, LLMProvider};

    #[derive(Clone, Default)]
    struct Recorded {
        calls: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
    }

    async fn handle(
        State(recorded): State<Recorded>,
        Path(action): Path<String>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        let key = headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        recorded.calls.lock().unwrap().push((action.clone(), key, body.clone()));

        if action.ends_with(":generateContent") {
            Json(json!({
                "candidates": [{"content": {"role": "model", "parts": [{"text": "Stay indoors."}]}}],
                "usageMetadata": {"totalTokenCount": 12}
            }))
        } else if action.ends_with(":batchEmbedContents") {
            let count = body["requests"].as_array().map(|r| r.len()).unwrap_or(0);
            let embeddings: Vec<Value> = (0..count)
                .map(|i| json!({"values": [i as f32, 1.0]}))
                .collect();
            Json(json!({"embeddings": embeddings}))
        } else {
            Json(json!({"embedding": {"values": [0.25, 0.75]}}))
        }
    }

    async fn spawn_gemini() -> (String, Recorded) {
        let recorded = Recorded::default();
        let app = Router::new()
            .route("/v1beta/models/{action}", post(handle))
            .with_state(recorded.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server run");
        });
        (format!("http://{}", addr), recorded)
    }

    #[test]
    fn test_config_snapshot() {
        let config = GeminiConfig::new("secret_key_never_serialized");

        assert_yaml_snapshot!(config, @r#"
        api_base: "https://generativelanguage.googleapis.com"
        model: gemini-1.5-pro
        embedding_model: embedding-001
        "#);
    }

    #[tokio::test]
    async fn test_generate_sends_low_temperature() {
        let (base, recorded) = spawn_gemini().await;
        let client = GeminiClient::new(GeminiConfig::new("k-123").with_api_base(base)).unwrap();

        let result = client
            .generate_with_config("What should I do?", &GenerationConfig::default())
            .await
            .unwrap();

        assert_eq!(result.text, "Stay indoors.");
        assert_eq!(result.tokens_used, Some(12));

        let calls = recorded.calls.lock().unwrap();
        let (action, key, body) = &calls[0];
        assert_eq!(action, "gemini-1.5-pro:generateContent");
        assert_eq!(key.as_deref(), Some("k-123"));
        assert_eq!(body["generationConfig"]["temperature"], json!(0.3));
        assert_eq!(body["contents"][0]["parts"][0]["text"], json!("What should I do?"));
    }

    #[tokio::test]
    async fn test_embeddings_use_task_hints() {
        let (base, recorded) = spawn_gemini().await;
        let client = GeminiClient::new(GeminiConfig::new("k").with_api_base(base)).unwrap();

        let query = client.embed_query("asthma triggers").await.unwrap();
        assert_eq!(query, vec![0.25, 0.75]);

        let docs = client
            .embed_documents(&["a".to_string(), "b".to_string(), "c".to_string()])
            .await
            .unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[2], vec![2.0, 1.0]);

        let calls = recorded.calls.lock().unwrap();
        assert_eq!(calls[0].0, "embedding-001:embedContent");
        assert_eq!(calls[0].2["taskType"], json!("RETRIEVAL_QUERY"));
        assert_eq!(calls[0].2["model"], json!("models/embedding-001"));
        assert_eq!(calls[1].0, "embedding-001:batchEmbedContents");
        assert_eq!(calls[1].2["requests"][0]["taskType"], json!("RETRIEVAL_DOCUMENT"));
    }
}
