//! Google Gemini `generateContent` client.
//!
//! One HTTP POST per turn against the public REST endpoint, with the API
//! key carried as a query parameter the way the official SDKs do. The
//! client never retries; every failure is mapped onto [`ModelError`] and
//! handed back to the dispatcher.

use crate::config::Settings;
use crate::dispatch::{ChatModel, ModelError};
use crate::session::{Role, Turn};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// HTTP client for the Gemini API.
pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
    generation_config: GenerationConfig,
    timeout_secs: u64,
}

impl GeminiClient {
    /// Build a client from startup settings.
    pub fn new(settings: &Settings) -> Result<Self, ModelError> {
        let timeout_secs = settings.generation.timeout_seconds;
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ModelError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            endpoint: format!("{BASE_URL}/{}:generateContent", settings.model),
            generation_config: GenerationConfig {
                temperature: settings.generation.temperature,
                max_output_tokens: settings.generation.max_output_tokens,
            },
            timeout_secs,
        })
    }

    fn translate(&self, contents: &[Turn]) -> GenerateRequest {
        GenerateRequest {
            contents: contents
                .iter()
                .map(|turn| Content {
                    role: match turn.role {
                        Role::User => "user",
                        Role::Model => "model",
                    }
                    .to_string(),
                    parts: vec![Part {
                        text: turn.text.clone(),
                    }],
                })
                .collect(),
            generation_config: self.generation_config,
        }
    }

    /// Concatenate the first candidate's text parts. An absent candidate or
    /// all-empty parts yield an empty string, which the dispatcher treats
    /// as the soft-empty outcome rather than an error.
    fn extract_reply(response: GenerateResponse) -> String {
        response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }

    fn map_status(status: u16, body: &str) -> ModelError {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .map(|resp| resp.error.message)
            .unwrap_or_else(|_| body.trim().to_string());

        match status {
            401 | 403 => ModelError::Auth(message),
            429 => ModelError::Quota(message),
            _ => ModelError::Api { status, message },
        }
    }

    fn map_send_error(&self, error: &reqwest::Error) -> ModelError {
        if error.is_timeout() {
            ModelError::Timeout(self.timeout_secs)
        } else if error.is_connect() {
            ModelError::Connect(error.to_string())
        } else {
            ModelError::Other(error.to_string())
        }
    }
}

#[async_trait]
impl ChatModel for GeminiClient {
    async fn generate(&self, contents: &[Turn]) -> Result<String, ModelError> {
        let body = self.translate(contents);
        let url = format!("{}?key={}", self.endpoint, self.api_key);
        let start = Instant::now();

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ModelError::Connect(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Self::map_status(status.as_u16(), &text));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| ModelError::Other(format!("unparseable response: {e}")))?;
        let reply = Self::extract_reply(parsed);

        #[allow(clippy::cast_possible_truncation)]
        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            model = %self.model,
            duration_ms,
            reply_chars = reply.len(),
            "generateContent completed"
        );

        Ok(reply)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

// Wire types, camelCase per the REST API.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{PRIMER, PRIMER_ACK};

    fn test_client() -> GeminiClient {
        GeminiClient::new(&Settings::with_api_key("test-key")).unwrap()
    }

    #[test]
    fn test_request_shape() {
        let client = test_client();
        let contents = vec![
            Turn::user(PRIMER),
            Turn::model(PRIMER_ACK),
            Turn::user("Apa rumus gaya?"),
        ];

        let value = serde_json::to_value(client.translate(&contents)).unwrap();

        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][1]["role"], "model");
        assert_eq!(value["contents"][2]["parts"][0]["text"], "Apa rumus gaya?");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 500);
        let temp = value["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temp - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_extract_reply_joins_parts() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [{"text": "F = "}, {"text": "m a"}]
                    },
                    "finishReason": "STOP"
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(GeminiClient::extract_reply(response), "F = m a");
    }

    #[test]
    fn test_extract_reply_tolerates_empty_response() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(GeminiClient::extract_reply(response), "");

        let response: GenerateResponse =
            serde_json::from_str(r#"{"candidates": [{}]}"#).unwrap();
        assert_eq!(GeminiClient::extract_reply(response), "");
    }

    #[test]
    fn test_status_mapping() {
        let body = r#"{"error": {"message": "API key not valid", "code": 400}}"#;

        assert!(matches!(
            GeminiClient::map_status(403, body),
            ModelError::Auth(msg) if msg == "API key not valid"
        ));
        assert!(matches!(
            GeminiClient::map_status(429, body),
            ModelError::Quota(_)
        ));
        assert!(matches!(
            GeminiClient::map_status(500, body),
            ModelError::Api { status: 500, .. }
        ));
    }

    #[test]
    fn test_status_mapping_falls_back_to_raw_body() {
        let err = GeminiClient::map_status(502, "Bad Gateway");
        assert!(matches!(
            err,
            ModelError::Api { status: 502, ref message } if message == "Bad Gateway"
        ));
    }

    #[test]
    fn test_endpoint_names_the_model() {
        let client = test_client();
        assert!(client.endpoint.ends_with("gemini-1.5-flash:generateContent"));
    }
}
