//! Top-level compression pipeline.
//!
//! conversation → prompt + token budget → one completion call → raw hybrid
//! text. Parsing the raw text is left to [`crate::crumb::CrumbResult`] so the
//! caller decides what to persist.

use tracing::info;

use crate::budget::estimate_max_output_tokens;
use crate::client::CompletionBackend;
use crate::depth::CompressionDepth;
use crate::errors::CompressError;
use crate::prompt::{build_update_prompt, compose_compression_request};
use crate::stats::word_count;

/// Largest accepted conversation, in characters.
pub const MAX_CONVERSATION_CHARS: usize = 50_000;

/// Server used when the caller does not pick one.
pub const DEFAULT_SERVER: usize = 1;

/// One user-initiated compression.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionRequest {
    pub conversation: String,
    pub depth: CompressionDepth,
    /// 1-based credential slot
    pub server: usize,
    /// Prior crumb file; when present the request is a rolling update
    pub existing_crumb: Option<String>,
}

impl CompressionRequest {
    pub fn new(conversation: impl Into<String>) -> Self {
        Self {
            conversation: conversation.into(),
            depth: CompressionDepth::default(),
            server: DEFAULT_SERVER,
            existing_crumb: None,
        }
    }

    pub fn with_depth(mut self, depth: CompressionDepth) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_server(mut self, server: usize) -> Self {
        self.server = server;
        self
    }

    /// Attach a prior crumb file. Blank text is treated as absent.
    pub fn with_existing_crumb(mut self, crumb: Option<String>) -> Self {
        self.existing_crumb = crumb.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn existing_crumb(&self) -> Option<&str> {
        self.existing_crumb
            .as_deref()
            .filter(|c| !c.trim().is_empty())
    }

    pub fn is_update(&self) -> bool {
        self.existing_crumb().is_some()
    }

    /// Boundary checks: non-blank and at most [`MAX_CONVERSATION_CHARS`].
    pub fn validate(&self) -> Result<(), CompressError> {
        if self.conversation.trim().is_empty() {
            return Err(CompressError::Validation(
                "Conversation is required".to_string(),
            ));
        }
        if self.conversation.chars().count() > MAX_CONVERSATION_CHARS {
            return Err(CompressError::Validation(
                "Conversation too long. Max 50,000 characters.".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything needed for the completion call, computed without I/O.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedPrompt {
    pub prompt: String,
    pub max_output_tokens: u32,
    pub word_count: usize,
    pub is_update: bool,
}

/// Choose the prompt shape and budget for a request.
pub fn prepare(request: &CompressionRequest) -> PreparedPrompt {
    let words = word_count(&request.conversation);
    let is_update = request.is_update();

    let prompt = match request.existing_crumb() {
        Some(existing) => build_update_prompt(existing, &request.conversation),
        None => compose_compression_request(request.depth, &request.conversation, words),
    };

    PreparedPrompt {
        prompt,
        max_output_tokens: estimate_max_output_tokens(words, request.depth, is_update),
        word_count: words,
        is_update,
    }
}

/// Runs requests against a [`CompletionBackend`].
pub struct Compressor<B> {
    backend: B,
}

impl<B: CompletionBackend> Compressor<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Produce the raw hybrid response for a request.
    ///
    /// Validation is the boundary's job; this trusts non-empty text.
    /// Backend failures are propagated unchanged.
    pub async fn compress(&self, request: &CompressionRequest) -> Result<String, CompressError> {
        let prepared = prepare(request);

        info!(
            depth = %request.depth,
            server = request.server,
            update = prepared.is_update,
            words = prepared.word_count,
            max_output_tokens = prepared.max_output_tokens,
            "Compressing conversation"
        );

        self.backend
            .complete(&prepared.prompt, prepared.max_output_tokens, request.server)
            .await
    }
}
