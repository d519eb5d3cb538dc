// Brief requester: genre name in, GenreBrief out
//
// Builds the fixed request, makes exactly one transport call per invocation and
// hands the trimmed text to the normalizer. Nothing is cached, so a regenerate is
// just a second call with the same name.

use std::sync::Arc;
use tracing::{debug, error, info};

use super::brief::{parse_brief, GenreBrief};
use super::gemini_client::{ContentRequest, ModelTransport};
use super::system_prompt::{user_prompt, SYSTEM_INSTRUCTION};
use crate::config::AppConfig;
use crate::error::{BriefError, Result, ServiceError};

pub struct BriefRequester {
    transport: Arc<dyn ModelTransport>,
    model: String,
    web_search: bool,
}

impl BriefRequester {
    pub fn new(transport: Arc<dyn ModelTransport>, config: &AppConfig) -> Self {
        Self {
            transport,
            model: config.model.clone(),
            web_search: config.web_search,
        }
    }

    /// The outbound request for a genre. The name is not trimmed or checked.
    pub fn build_request(&self, genre_name: &str) -> ContentRequest {
        ContentRequest {
            model: self.model.clone(),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            user_content: user_prompt(genre_name),
            web_search: self.web_search,
        }
    }

    /// Ask the model about a genre and return its trimmed text
    pub async fn request_raw(&self, genre_name: &str) -> std::result::Result<String, ServiceError> {
        let request = self.build_request(genre_name);
        debug!(genre = genre_name, model = %request.model, "Requesting genre brief");

        let text = self.transport.generate_content(&request).await.map_err(|e| {
            error!(genre = genre_name, "Model call failed: {}", e);
            e
        })?;

        Ok(text.trim().to_string())
    }

    /// Research a genre and return its normalized brief
    pub async fn generate_genre_brief(&self, genre_name: &str) -> Result<GenreBrief> {
        let text = self.request_raw(genre_name).await?;

        match parse_brief(&text) {
            Ok(brief) => {
                info!(genre = genre_name, title = %brief.title, "Genre brief generated");
                Ok(brief)
            }
            Err(kind) => {
                error!(genre = genre_name, raw = %text, "Failed to parse model response as JSON: {}", kind);
                Err(BriefError::InvalidResponseFormat { kind, raw: text })
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::FormatError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    pub(crate) const HOUSE: &str = r#"{"title":"Mureka House Brief (Male Vocal)","genre_name":"House","tagline":"Four on the floor.","bpm":"120-126 BPM","core_sound":"...","vocal_style":"...","mood":["uplifting","driving","euphoric"],"artists":["Frankie Knuckles","Daft Punk"],"overlaps_with":["Disco","Techno"],"prompt_version":"1.0"}"#;

    /// Replays queued replies (or repeats a fixed one) and records every request
    #[derive(Default)]
    pub(crate) struct MockTransport {
        replies: Mutex<VecDeque<std::result::Result<String, ServiceError>>>,
        fallback: Option<String>,
        pub calls: AtomicUsize,
        pub requests: Mutex<Vec<ContentRequest>>,
    }

    impl MockTransport {
        pub(crate) fn always(text: &str) -> Self {
            Self {
                fallback: Some(text.to_string()),
                ..Default::default()
            }
        }

        pub(crate) fn push(&self, reply: std::result::Result<String, ServiceError>) {
            self.replies.lock().unwrap().push_back(reply);
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ModelTransport for MockTransport {
        async fn generate_content(
            &self,
            request: &ContentRequest,
        ) -> std::result::Result<String, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());

            if let Some(reply) = self.replies.lock().unwrap().pop_front() {
                return reply;
            }
            self.fallback.clone().ok_or(ServiceError::EmptyResponse)
        }
    }

    pub(crate) fn requester(transport: Arc<MockTransport>) -> BriefRequester {
        BriefRequester::new(transport, &AppConfig::default())
    }

    #[tokio::test]
    async fn test_user_content_embeds_genre() {
        let transport = Arc::new(MockTransport::always(HOUSE));
        let requester = requester(transport.clone());

        for name in ["House", "Música Popular Brasileira", "  spaced  ", "\"quoted\""] {
            requester.generate_genre_brief(name).await.unwrap();
        }

        let requests = transport.requests.lock().unwrap();
        assert_eq!(
            requests[0].user_content,
            "Please research the music genre: \"House\""
        );
        assert_eq!(
            requests[2].user_content,
            "Please research the music genre: \"  spaced  \""
        );
        assert_eq!(
            requests[3].user_content,
            "Please research the music genre: \"\"quoted\"\""
        );
        assert!(requests.iter().all(|r| r.web_search));
        assert!(requests.iter().all(|r| r.system_instruction == SYSTEM_INSTRUCTION));
    }

    #[tokio::test]
    async fn test_end_to_end_house() {
        let transport = Arc::new(MockTransport::always(&format!("\n  {}  \n", HOUSE)));
        let brief = requester(transport)
            .generate_genre_brief("House")
            .await
            .unwrap();

        assert_eq!(brief.mood.len(), 3);
        assert_eq!(brief.artists.len(), 2);
        assert_eq!(brief.title, "Mureka House Brief (Male Vocal)");
    }

    #[tokio::test]
    async fn test_refusal_is_invalid_format() {
        let transport = Arc::new(MockTransport::always("Sorry, I cannot help with that."));
        let err = requester(transport)
            .generate_genre_brief("House")
            .await
            .unwrap_err();

        match err {
            BriefError::InvalidResponseFormat { kind, raw } => {
                assert!(matches!(kind, FormatError::NoObjectFound));
                assert_eq!(raw, "Sorry, I cannot help with that.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_service_failure_propagates() {
        let transport = Arc::new(MockTransport::default());
        transport.push(Err(ServiceError::Status {
            status: 429,
            body: "quota exceeded".to_string(),
        }));

        let err = requester(transport.clone())
            .generate_genre_brief("Drill")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BriefError::ServiceCallFailure(ServiceError::Status { status: 429, .. })
        ));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_regenerate_calls_service_each_time() {
        let transport = Arc::new(MockTransport::always(HOUSE));
        let requester = requester(transport.clone());

        let first = requester.generate_genre_brief("House").await.unwrap();
        let second = requester.generate_genre_brief("House").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(transport.call_count(), 2);
    }

    #[test]
    fn test_web_search_flag_follows_config() {
        let config = AppConfig {
            web_search: false,
            model: "gemini-2.5-pro".to_string(),
            ..AppConfig::default()
        };
        let requester = BriefRequester::new(Arc::new(MockTransport::default()), &config);
        let request = requester.build_request("Techno");
        assert!(!request.web_search);
        assert_eq!(request.model, "gemini-2.5-pro");
    }
}
