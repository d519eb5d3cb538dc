// Gemini API client
//
// Implements the single non-streaming generateContent call used for briefs:
// - system instruction + one user turn
// - optional Google Search grounding tool
// - text of the first candidate is returned as-is

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::ServiceError;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const GEMINI_MODEL: &str = "gemini-2.5-flash";

/// One outbound content-generation call, independent of the wire format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest {
    pub model: String,
    pub system_instruction: String,
    pub user_content: String,
    pub web_search: bool,
}

/// Anything that can answer a `ContentRequest` with text.
///
/// `GeminiClient` is the real one; tests plug in mocks.
#[async_trait]
pub trait ModelTransport: Send + Sync {
    async fn generate_content(&self, request: &ContentRequest) -> Result<String, ServiceError>;
}

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

impl<'a> GenerateContentBody<'a> {
    fn from_request(request: &'a ContentRequest) -> Self {
        let tools = if request.web_search {
            vec![Tool {
                google_search: GoogleSearch {},
            }]
        } else {
            Vec::new()
        };

        GenerateContentBody {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: &request.system_instruction,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: &request.user_content,
                }],
            }],
            tools,
        }
    }
}

/// Response from generateContent (only the fields we read)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    thought: Option<bool>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, skipping thoughts.
    /// `None` when there is no candidate or no text part at all.
    fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let parts: Vec<&str> = candidate
            .content
            .as_ref()?
            .parts
            .iter()
            .filter(|part| !part.thought.unwrap_or(false))
            .filter_map(|part| part.text.as_deref())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.concat())
        }
    }
}

pub struct GeminiClient {
    api_key: Option<String>,
    api_base: String,
    client: Client,
}

impl GeminiClient {
    /// Create a client. A missing key is only reported when a call is made.
    pub fn new(
        api_key: Option<String>,
        api_base: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ServiceError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ServiceError::Client(e.to_string()))?;

        Ok(Self {
            api_key,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.api_base, model)
    }
}

#[async_trait]
impl ModelTransport for GeminiClient {
    async fn generate_content(&self, request: &ContentRequest) -> Result<String, ServiceError> {
        let api_key = self.api_key.as_deref().ok_or(ServiceError::MissingApiKey)?;
        let body = GenerateContentBody::from_request(request);
        let url = self.endpoint(&request.model);

        debug!(%url, web_search = request.web_search, "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ServiceError::Status { status, body });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))?;

        if let Some(reason) = parsed
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
        {
            debug!(finish_reason = reason, "generateContent finished");
        }

        parsed.text().ok_or(ServiceError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(web_search: bool) -> ContentRequest {
        ContentRequest {
            model: GEMINI_MODEL.to_string(),
            system_instruction: "Be a musicologist".to_string(),
            user_content: "Please research the music genre: \"House\"".to_string(),
            web_search,
        }
    }

    #[test]
    fn test_body_shape_with_search() {
        let req = request(true);
        let json = serde_json::to_value(GenerateContentBody::from_request(&req)).unwrap();

        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "Be a musicologist");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(
            json["contents"][0]["parts"][0]["text"],
            "Please research the music genre: \"House\""
        );
        assert!(json["tools"][0]["googleSearch"].is_object());
    }

    #[test]
    fn test_body_without_search_has_no_tools() {
        let req = request(false);
        let json = serde_json::to_value(GenerateContentBody::from_request(&req)).unwrap();
        assert!(json.get("tools").is_none());
    }

    #[test]
    fn test_response_text_skips_thoughts() {
        let raw = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"text": "thinking...", "thought": true},
                    {"text": "{\"a\":"},
                    {"text": " 1}"}
                ]},
                "finishReason": "STOP"
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GeminiClient::new(None, "http://localhost:9000/v1beta/", None).unwrap();
        assert_eq!(
            client.endpoint("gemini-2.5-flash"),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_key_is_service_failure() {
        let client = GeminiClient::new(None, GEMINI_API_BASE, None).unwrap();
        let err = client.generate_content(&request(true)).await.unwrap_err();
        assert!(matches!(err, ServiceError::MissingApiKey));
    }
}
