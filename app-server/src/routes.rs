//! HTTP surface for the chat pipeline.

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::http::header;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use rmp_chat::ChatError;
use rmp_chat::ChatPipeline;
use rmp_chat::Conversation;
use tracing::error;
use tracing::info;
use tracing::warn;

const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

/// Shared handler state.
pub type AppState = Arc<ChatPipeline>;

/// Router serving `POST /api/chat` and `GET /health`.
pub fn router(pipeline: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/health", get(health))
        .with_state(pipeline)
}

/// Stream the answer to a conversation as plain text.
///
/// Failures before the first byte become an error status. A failure after
/// streaming has begun aborts the body.
pub async fn chat(
    State(pipeline): State<AppState>,
    payload: Result<Json<Conversation>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(conversation) = payload?;
    info!("Chat request with {} messages", conversation.len());
    let relay = pipeline.submit(&conversation).await?;

    Ok((
        [(header::CONTENT_TYPE, TEXT_PLAIN_UTF8)],
        Body::from_stream(relay),
    )
        .into_response())
}

pub async fn health() -> &'static str {
    "ok"
}

/// A request failure reported before streaming started.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The body is not a JSON array of `{role, content}` messages.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error(transparent)]
    Chat(#[from] ChatError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) | ApiError::Chat(ChatError::EmptyConversation) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Chat(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Chat request failed: {self}");
        } else {
            warn!("Rejected chat request: {self}");
        }
        (
            status,
            [(header::CONTENT_TYPE, TEXT_PLAIN_UTF8)],
            self.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::StreamExt;
    use futures::stream;
    use pretty_assertions::assert_eq;
    use rmp_chat::ChunkStream;
    use rmp_chat::GenerationChunk;
    use rmp_chat::GenerationError;
    use rmp_chat::Generator;
    use rmp_chat::Message;
    use rmp_embeddings::EmbeddingError;
    use rmp_embeddings::EmbeddingProvider;
    use rmp_embeddings::EmbeddingRequest;
    use rmp_embeddings::EmbeddingResponse;
    use rmp_retrieval::InMemoryIndex;
    use rmp_retrieval::VectorRetriever;
    use std::sync::Mutex;

    struct StaticEmbedder {
        fail: bool,
    }

    #[async_trait]
    impl EmbeddingProvider for StaticEmbedder {
        fn name(&self) -> &str {
            "static"
        }

        fn default_model(&self) -> &str {
            "static"
        }

        fn dimension(&self) -> usize {
            2
        }

        async fn embed(
            &self,
            _request: EmbeddingRequest,
        ) -> rmp_embeddings::Result<EmbeddingResponse> {
            if self.fail {
                return Err(EmbeddingError::ApiRequest {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            Ok(EmbeddingResponse {
                embedding: vec![1.0, 0.0],
                model: "static".to_string(),
                dimension: 2,
                tokens_used: None,
            })
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    struct ScriptedGenerator {
        script: Mutex<Option<Vec<Result<GenerationChunk, GenerationError>>>>,
    }

    #[async_trait]
    impl Generator for ScriptedGenerator {
        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, _messages: &[Message]) -> Result<ChunkStream, GenerationError> {
            let script = self.script.lock().unwrap().take().unwrap_or_default();
            Ok(stream::iter(script).boxed())
        }
    }

    fn state(
        fail_embedding: bool,
        script: Vec<Result<GenerationChunk, GenerationError>>,
    ) -> AppState {
        let mut index = InMemoryIndex::new(2);
        index
            .upsert(
                "Dr. Smith",
                vec![1.0, 0.0],
                serde_json::json!({"subject": "Data Structures", "stars": 5})
                    .as_object()
                    .cloned()
                    .unwrap(),
            )
            .unwrap();

        Arc::new(ChatPipeline::new(
            Arc::new(StaticEmbedder {
                fail: fail_embedding,
            }),
            VectorRetriever::new(Arc::new(index)),
            Arc::new(ScriptedGenerator {
                script: Mutex::new(Some(script)),
            }),
        ))
    }

    fn conversation(text: &str) -> Result<Json<Conversation>, JsonRejection> {
        Ok(Json(Conversation::from(vec![Message::user(text)])))
    }

    async fn serve(state: AppState) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn body_text(response: Response) -> Result<String, axum::Error> {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        Ok(String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_streams_plain_text() {
        let state = state(
            false,
            vec![
                Ok(GenerationChunk::text("Professor: ")),
                Ok(GenerationChunk::empty()),
                Ok(GenerationChunk::text("Dr. Smith")),
            ],
        );

        let response = chat(State(state), conversation("data structures"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(body_text(response).await.unwrap(), "Professor: Dr. Smith");
    }

    #[tokio::test]
    async fn test_empty_conversation_is_bad_request() {
        let state = state(false, Vec::new());

        let response = chat(State(state), Ok(Json(Conversation::default())))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_bad_gateway() {
        let state = state(true, Vec::new());

        let response = chat(State(state), conversation("hello"))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_text(response).await.unwrap();
        assert!(body.contains("boom"));
    }

    #[tokio::test]
    async fn test_mid_stream_failure_aborts_body() {
        let state = state(
            false,
            vec![
                Ok(GenerationChunk::text("Professor: ")),
                Err(GenerationError::Truncated),
            ],
        );

        let response = chat(State(state), conversation("hello")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.is_err());
    }

    #[tokio::test]
    async fn test_health() {
        assert_eq!(health().await, "ok");
    }

    #[tokio::test]
    async fn test_malformed_bodies_are_bad_request() {
        let base = serve(state(false, Vec::new())).await;
        let client = reqwest::Client::new();
        let url = format!("{base}/api/chat");

        let not_json = client
            .post(&url)
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(not_json.status().as_u16(), 400);

        let unknown_role = client
            .post(&url)
            .json(&serde_json::json!([{"role": "narrator", "content": "hi"}]))
            .send()
            .await
            .unwrap();
        assert_eq!(unknown_role.status().as_u16(), 400);

        let no_content_type = client.post(&url).body("[]").send().await.unwrap();
        assert_eq!(no_content_type.status().as_u16(), 400);
    }

    #[tokio::test]
    async fn test_served_over_http() {
        let base = serve(state(false, vec![Ok(GenerationChunk::text("Dr. Smith"))])).await;
        let client = reqwest::Client::new();

        let health = client.get(format!("{base}/health")).send().await.unwrap();
        assert_eq!(health.text().await.unwrap(), "ok");

        let response = client
            .post(format!("{base}/api/chat"))
            .json(&serde_json::json!([{"role": "user", "content": "data structures"}]))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(
            response.headers()["content-type"],
            "text/plain; charset=utf-8"
        );
        assert_eq!(response.text().await.unwrap(), "Dr. Smith");
    }
}
