use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::provider::LlmProvider;
use super::types::ChatRequest;
use crate::core::errors::RagError;

/// Client for any endpoint speaking the OpenAI chat completions protocol
/// (OpenRouter, LM Studio, vLLM, ...).
#[derive(Clone)]
pub struct OpenAiCompatibleProvider {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl OpenAiCompatibleProvider {
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, RagError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RagError::UpstreamModel(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            client,
        })
    }

    fn build_body(&self, request: &ChatRequest) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": request.messages,
            "stream": false,
        });

        if let Some(obj) = body.as_object_mut() {
            if let Some(t) = request.temperature {
                obj.insert("temperature".to_string(), json!(t));
            }
            if let Some(t) = request.max_tokens {
                obj.insert("max_tokens".to_string(), json!(t));
            }
        }

        body
    }
}

fn parse_chat_response(payload: &Value) -> Result<String, RagError> {
    if let Some(message) = payload["error"]["message"].as_str() {
        return Err(RagError::UpstreamModel(message.to_string()));
    }

    payload["choices"][0]["message"]["content"]
        .as_str()
        .map(|content| content.trim().to_string())
        .ok_or_else(|| {
            RagError::UpstreamModel("chat response missing choices[0].message.content".to_string())
        })
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, RagError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_body(&request);

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| RagError::UpstreamModel(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(RagError::UpstreamModel(format!(
                "chat endpoint returned {}: {}",
                status, text
            )));
        }

        let payload: Value = res
            .json()
            .await
            .map_err(|e| RagError::UpstreamModel(e.to_string()))?;

        parse_chat_response(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::ChatMessage;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use tokio::net::TcpListener;

    async fn spawn_mock(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/v1", addr)
    }

    fn provider(base_url: String) -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider::new(
            base_url,
            "sk-test".to_string(),
            "test-model".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn body_includes_optional_sampling_fields() {
        let p = provider("http://localhost/v1/".to_string());
        let mut request = ChatRequest::new(vec![ChatMessage::user("hi")]);
        request.temperature = Some(0.0);

        let body = p.build_body(&request);
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["temperature"], 0.0);
        assert!(body.get("max_tokens").is_none());
        assert_eq!(body["messages"][0]["content"], "hi");
        assert_eq!(p.base_url, "http://localhost/v1");
    }

    #[test]
    fn parse_reports_upstream_error_message() {
        let payload = json!({"error": {"message": "rate limited"}});
        let err = parse_chat_response(&payload).unwrap_err();
        assert!(matches!(err, RagError::UpstreamModel(msg) if msg == "rate limited"));
    }

    #[tokio::test]
    async fn chat_sends_bearer_and_returns_content() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let question = body["messages"][0]["content"].as_str().unwrap_or_default().to_string();
                Json(json!({
                    "choices": [{"message": {"role": "assistant", "content": format!(" {} | {} ", auth, question)}}]
                }))
            }),
        );
        let base_url = spawn_mock(router).await;

        let answer = provider(base_url)
            .chat(ChatRequest::new(vec![ChatMessage::user("ping")]))
            .await
            .unwrap();
        assert_eq!(answer, "Bearer sk-test | ping");
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_error() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::UNAUTHORIZED, "invalid key") }),
        );
        let base_url = spawn_mock(router).await;

        let err = provider(base_url)
            .chat(ChatRequest::new(vec![ChatMessage::user("ping")]))
            .await
            .unwrap_err();
        match err {
            RagError::UpstreamModel(msg) => {
                assert!(msg.contains("401"));
                assert!(msg.contains("invalid key"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
