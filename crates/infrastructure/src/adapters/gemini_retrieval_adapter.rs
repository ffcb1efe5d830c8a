//! Grounded retrieval adapter - Implements GroundedRetrievalPort on an inference engine

use std::sync::Arc;

use ai_core::{Citation, InferenceEngine, InferenceError, InferenceRequest};
use application::{
    error::ApplicationError,
    ports::{GroundedRetrievalPort, RetrievalAnswer, RetrievalQuery},
    services::smart_network_service::UNTITLED_SOURCE,
};
use async_trait::async_trait;
use domain::GroundingSource;
use tracing::{debug, instrument};

use crate::retry::{RetryConfig, retry};

/// Map an inference failure onto the application taxonomy
pub(crate) fn map_inference_error(err: InferenceError) -> ApplicationError {
    match err {
        InferenceError::RateLimited => ApplicationError::RateLimited,
        InferenceError::InvalidResponse(msg) => ApplicationError::MalformedResponse(msg),
        InferenceError::Unauthorized(msg) => {
            ApplicationError::Configuration(format!("retrieval credentials rejected: {msg}"))
        },
        other => ApplicationError::ExternalService(format!("Retrieval: {other}")),
    }
}

fn grounding_source(citation: Citation) -> GroundingSource {
    let title = citation
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| UNTITLED_SOURCE.to_string());
    GroundingSource::new(title, citation.uri)
}

/// Retrieval through a language model with optional web grounding
pub struct GeminiRetrievalAdapter {
    engine: Arc<dyn InferenceEngine>,
    retry: RetryConfig,
}

impl std::fmt::Debug for GeminiRetrievalAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiRetrievalAdapter")
            .field("model", &self.engine.default_model())
            .field("retry", &self.retry)
            .finish()
    }
}

impl GeminiRetrievalAdapter {
    pub fn new(engine: Arc<dyn InferenceEngine>) -> Self {
        Self {
            engine,
            retry: RetryConfig::default(),
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn request(query: RetrievalQuery) -> InferenceRequest {
        let request = match query.system_instruction {
            Some(system) => InferenceRequest::with_system(system, query.prompt),
            None => InferenceRequest::simple(query.prompt),
        }
        .with_schema(query.schema);

        if query.grounded {
            request.grounded()
        } else {
            request
        }
    }
}

#[async_trait]
impl GroundedRetrievalPort for GeminiRetrievalAdapter {
    #[instrument(skip(self, query), fields(grounded = query.grounded))]
    async fn retrieve(&self, query: RetrievalQuery) -> Result<RetrievalAnswer, ApplicationError> {
        let request = Self::request(query);
        let response = retry(&self.retry, || self.engine.generate(request.clone()))
            .await
            .map_err(map_inference_error)?;

        debug!(
            model = %response.model,
            citations = response.citations.len(),
            "Retrieval answered"
        );
        Ok(RetrievalAnswer {
            text: response.content,
            citations: response.citations.into_iter().map(grounding_source).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use ai_core::InferenceResponse;
    use mockall::mock;
    use serde_json::json;

    use super::*;

    mock! {
        pub Engine {}

        #[async_trait]
        impl InferenceEngine for Engine {
            async fn generate(&self, request: InferenceRequest) -> Result<InferenceResponse, InferenceError>;
            fn default_model(&self) -> &str;
        }
    }

    fn answer(content: &str) -> InferenceResponse {
        InferenceResponse {
            content: content.to_string(),
            model: "gemini-3-flash-preview".to_string(),
            citations: vec![Citation {
                title: None,
                uri: "https://www.delijn.be/haltes".to_string(),
            }],
            finish_reason: Some("STOP".to_string()),
        }
    }

    fn query() -> RetrievalQuery {
        RetrievalQuery {
            system_instruction: None,
            prompt: "Gent".into(),
            grounded: true,
            schema: json!({"type": "ARRAY"}),
        }
    }

    #[tokio::test]
    async fn rate_limits_are_retried_then_answer_is_returned() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let mut engine = MockEngine::new();
        engine.expect_generate().times(3).returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(InferenceError::RateLimited)
            } else {
                Ok(answer(r#"["Gent Zuid"]"#))
            }
        });

        let adapter =
            GeminiRetrievalAdapter::new(Arc::new(engine)).with_retry(RetryConfig::new(1, 2));
        let result = adapter.retrieve(query()).await.unwrap();

        assert_eq!(result.text, r#"["Gent Zuid"]"#);
        assert_eq!(result.citations[0].title, UNTITLED_SOURCE);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn persistent_rate_limit_surfaces_after_retries() {
        let mut engine = MockEngine::new();
        engine
            .expect_generate()
            .times(3)
            .returning(|_| Err(InferenceError::RateLimited));

        let adapter =
            GeminiRetrievalAdapter::new(Arc::new(engine)).with_retry(RetryConfig::new(1, 2));
        let err = adapter.retrieve(query()).await.unwrap_err();
        assert!(err.is_rate_limited());
    }

    #[tokio::test]
    async fn server_errors_are_not_retried() {
        let mut engine = MockEngine::new();
        engine
            .expect_generate()
            .times(1)
            .returning(|_| Err(InferenceError::ServerError("Status 500".into())));

        let adapter =
            GeminiRetrievalAdapter::new(Arc::new(engine)).with_retry(RetryConfig::new(1, 2));
        let err = adapter.retrieve(query()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ExternalService(_)));
    }

    #[test]
    fn grounded_query_becomes_grounded_json_request() {
        let request = GeminiRetrievalAdapter::request(RetrievalQuery {
            system_instruction: Some("system".into()),
            prompt: "prompt".into(),
            grounded: true,
            schema: json!({"type": "ARRAY"}),
        });
        assert!(request.search_grounding);
        assert!(request.json_output);
        assert_eq!(request.system_instruction.as_deref(), Some("system"));
        assert_eq!(request.response_schema, Some(json!({"type": "ARRAY"})));
    }

    #[test]
    fn ungrounded_query_keeps_search_off() {
        let request = GeminiRetrievalAdapter::request(RetrievalQuery {
            system_instruction: None,
            prompt: "prompt".into(),
            grounded: false,
            schema: json!({}),
        });
        assert!(!request.search_grounding);
        assert!(request.system_instruction.is_none());
    }

    #[test]
    fn untitled_citations_get_a_default_title() {
        let source = grounding_source(Citation {
            title: None,
            uri: "https://www.stib-mivb.be/horaires".into(),
        });
        assert_eq!(source.title, UNTITLED_SOURCE);

        let source = grounding_source(Citation {
            title: Some("stib-mivb.be".into()),
            uri: "https://www.stib-mivb.be".into(),
        });
        assert_eq!(source.title, "stib-mivb.be");
    }

    #[test]
    fn errors_map_onto_application_taxonomy() {
        assert!(map_inference_error(InferenceError::RateLimited).is_rate_limited());
        assert!(map_inference_error(InferenceError::InvalidResponse("x".into())).is_malformed());
        assert!(matches!(
            map_inference_error(InferenceError::Timeout(30_000)),
            ApplicationError::ExternalService(_)
        ));
        assert!(matches!(
            map_inference_error(InferenceError::Unauthorized("bad key".into())),
            ApplicationError::Configuration(_)
        ));
    }
}
