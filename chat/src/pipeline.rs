//! The request pipeline: query, embed, retrieve, assemble, stream.

use std::sync::Arc;

use rmp_embeddings::{EmbeddingProvider, EmbeddingRequest};
use rmp_retrieval::VectorRetriever;
use tracing::{debug, info};

use crate::config::ChatConfig;
use crate::context::format_context;
use crate::error::Result;
use crate::generator::Generator;
use crate::message::{Conversation, Message};
use crate::prompt::PromptAssembler;
use crate::query::extract_query;
use crate::relay::StreamingRelay;

/// Answers one conversation per call.
///
/// The pipeline holds only shared collaborator handles; every request
/// builds its own query, context, prompt and relay.
#[derive(Clone)]
pub struct ChatPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    retriever: VectorRetriever,
    generator: Arc<dyn Generator>,
    assembler: PromptAssembler,
    embedding_model: Option<String>,
}

impl ChatPipeline {
    /// Create a pipeline with the default system prompt.
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        retriever: VectorRetriever,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            embedder,
            retriever,
            generator,
            assembler: PromptAssembler::default(),
            embedding_model: None,
        }
    }

    /// Apply model and prompt settings.
    pub fn with_config(mut self, config: &ChatConfig) -> Self {
        self.assembler = PromptAssembler::new(config.system_prompt.clone());
        self.embedding_model = Some(config.embedding_model.clone());
        self
    }

    /// Replace the prompt assembler.
    pub fn with_assembler(mut self, assembler: PromptAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    /// Build the messages that would be sent to the generator.
    ///
    /// Stops at the first failing stage; later collaborators are not called.
    pub async fn prepare(&self, conversation: &Conversation) -> Result<Vec<Message>> {
        let query = extract_query(conversation)?;
        debug!("Extracted query of {} characters", query.len());

        let mut request = EmbeddingRequest::new(query);
        if let Some(model) = &self.embedding_model {
            request = request.with_model(model.clone());
        }
        let embedding = self.embedder.embed(request).await?;
        debug!(
            "Embedded query with {} ({} dimensions)",
            self.embedder.name(),
            embedding.dimension
        );

        let records = self.retriever.retrieve(&embedding.embedding).await?;
        let context = format_context(&records);

        Ok(self.assembler.assemble(conversation, query, &context))
    }

    /// Run the pipeline and return a relay streaming the answer.
    ///
    /// Failures before the generator starts streaming are returned here;
    /// later failures arrive as an error item on the relay.
    pub async fn submit(&self, conversation: &Conversation) -> Result<StreamingRelay> {
        let messages = self.prepare(conversation).await?;
        let chunks = self.generator.generate(&messages).await?;

        info!(
            "Streaming answer from {} ({})",
            self.generator.name(),
            self.generator.model()
        );

        Ok(StreamingRelay::streaming(chunks))
    }
}
