//! OpenAI chat completions generator with server-sent-event streaming.

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use futures::stream;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::DEFAULT_CHAT_MODEL;
use crate::error::GenerationError;
use crate::generator::{ChunkStream, GenerationChunk, Generator};
use crate::message::Message;

/// Data payload OpenAI sends as the final event of a stream.
const DONE_MARKER: &str = "[DONE]";

/// Streams chat completions from the OpenAI API.
pub struct OpenAIChatGenerator {
    /// API key.
    api_key: Option<String>,

    /// API base URL.
    base_url: String,

    /// HTTP client.
    client: reqwest::Client,

    /// Model to request.
    model: String,
}

impl OpenAIChatGenerator {
    /// Create a generator reading `OPENAI_API_KEY` from the environment.
    pub fn new() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            base_url: "https://api.openai.com/v1".to_string(),
            client: reqwest::Client::new(),
            model: DEFAULT_CHAT_MODEL.to_string(),
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Share an existing HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

impl Default for OpenAIChatGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Generator for OpenAIChatGenerator {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, messages: &[Message]) -> Result<ChunkStream, GenerationError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(GenerationError::NotConfigured)?;

        debug!(
            "Requesting streamed completion from {} with {} messages",
            self.model,
            messages.len()
        );

        let body = ChatRequest {
            model: &self.model,
            messages,
            stream: true,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::ApiRequest {
                status: status.as_u16(),
                body,
            });
        }

        info!("Completion stream opened with model {}", self.model);

        let events = response.bytes_stream().eventsource().boxed();

        // State is `None` once the stream has yielded its final item.
        let chunks = stream::unfold(Some(events), |state| async move {
            let Some(mut events) = state else {
                return None;
            };
            match events.next().await {
                Some(Ok(event)) if event.data.trim() == DONE_MARKER => None,
                Some(Ok(event)) => {
                    let item = parse_chunk(&event.data);
                    let next = if item.is_ok() { Some(events) } else { None };
                    Some((item, next))
                }
                Some(Err(err)) => Some((Err(GenerationError::Stream(err.to_string())), None)),
                None => Some((Err(GenerationError::Truncated), None)),
            }
        });

        Ok(chunks.boxed())
    }
}

fn parse_chunk(data: &str) -> Result<GenerationChunk, GenerationError> {
    let chunk: CompletionChunk =
        serde_json::from_str(data).map_err(|e| GenerationError::InvalidEvent(e.to_string()))?;

    if let Some(error) = chunk.error {
        return Err(GenerationError::Provider(error.message));
    }

    let content = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content);

    Ok(GenerationChunk { content })
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    #[serde(default)]
    error: Option<ProviderError>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn generator_for(server: &MockServer) -> OpenAIChatGenerator {
        OpenAIChatGenerator::new()
            .with_api_key("test-key")
            .with_base_url(server.uri())
    }

    fn sse(events: &[&str]) -> String {
        events.iter().map(|data| format!("data: {data}\n\n")).collect()
    }

    fn delta(content: &str) -> String {
        json!({"choices": [{"index": 0, "delta": {"content": content}}]}).to_string()
    }

    async fn mount_stream(server: &MockServer, body: String) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .mount(server)
            .await;
    }

    #[test]
    fn test_parse_chunk_without_content() {
        let role_only = r#"{"choices":[{"index":0,"delta":{"role":"assistant"}}]}"#;
        assert_eq!(parse_chunk(role_only).unwrap(), GenerationChunk::empty());

        let no_choices = r#"{"choices":[]}"#;
        assert_eq!(parse_chunk(no_choices).unwrap(), GenerationChunk::empty());
    }

    #[test]
    fn test_parse_chunk_provider_error() {
        let result = parse_chunk(r#"{"error":{"message":"overloaded"}}"#);
        assert!(matches!(result, Err(GenerationError::Provider(m)) if m == "overloaded"));
    }

    #[tokio::test]
    async fn test_streams_chunks_until_done() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "gpt-4o-mini",
                "stream": true,
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "hi"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                sse(&[
                    r#"{"choices":[{"index":0,"delta":{"role":"assistant"}}]}"#,
                    &delta("Prof"),
                    &delta("essor: Dr. Smith"),
                    &delta(""),
                    DONE_MARKER,
                ]),
                "text/event-stream",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let messages = vec![Message::system("sys"), Message::user("hi")];
        let stream = generator_for(&server).generate(&messages).await.unwrap();
        let chunks: Vec<GenerationChunk> = stream.try_collect().await.unwrap();

        assert_eq!(
            chunks,
            vec![
                GenerationChunk::empty(),
                GenerationChunk::text("Prof"),
                GenerationChunk::text("essor: Dr. Smith"),
                GenerationChunk::text(""),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_done_marker_is_truncation() {
        let server = MockServer::start().await;
        mount_stream(&server, sse(&[&delta("partial")])).await;

        let stream = generator_for(&server)
            .generate(&[Message::user("hi")])
            .await
            .unwrap();
        let items: Vec<_> = stream.collect().await;

        assert_eq!(items.len(), 2);
        assert!(matches!(&items[0], Ok(chunk) if chunk.text_content() == Some("partial")));
        assert!(matches!(items[1], Err(GenerationError::Truncated)));
    }

    #[tokio::test]
    async fn test_invalid_event_ends_stream() {
        let server = MockServer::start().await;
        mount_stream(&server, sse(&[&delta("ok"), "not json", &delta("never")])).await;

        let stream = generator_for(&server)
            .generate(&[Message::user("hi")])
            .await
            .unwrap();
        let items: Vec<_> = stream.collect().await;

        assert_eq!(items.len(), 2);
        assert!(matches!(items[1], Err(GenerationError::InvalidEvent(_))));
    }

    #[tokio::test]
    async fn test_error_status_before_streaming() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let result = generator_for(&server).generate(&[Message::user("hi")]).await;
        assert!(matches!(
            result,
            Err(GenerationError::ApiRequest { status: 401, .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let generator = OpenAIChatGenerator {
            api_key: None,
            ..OpenAIChatGenerator::new()
        };
        let result = generator.generate(&[Message::user("hi")]).await;
        assert!(matches!(result, Err(GenerationError::NotConfigured)));
    }
}
