//! Completion client trait — the abstraction over the remote service.
//!
//! A [`CompletionClient`] knows how to turn an ordered message list plus
//! generation parameters into a single text completion. The core never
//! inspects the parameters; they pass through untouched.
//!
//! Implementations: Azure OpenAI chat completions (the `colloquy-providers`
//! crate), scripted mocks in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::message::Entry;

/// Per-call scalar configuration forwarded to the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Cap on generated length
    pub max_tokens: u32,

    /// Number of completions to request. Always 1.
    pub candidate_count: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Nucleus sampling cutoff
    pub top_p: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 150,
            candidate_count: 1,
            temperature: 0.7,
            top_p: 1.0,
        }
    }
}

/// The remote completion boundary.
///
/// The session layer calls `complete()` without knowing which backend is
/// behind it. Any transport, authentication, or malformed-response
/// condition surfaces as a [`ClientError`].
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// A human-readable name for this client (e.g. "azure-openai").
    fn name(&self) -> &str;

    /// Send the ordered message list and return the completion text.
    async fn complete(
        &self,
        messages: &[Entry],
        params: &GenerationParams,
    ) -> std::result::Result<String, ClientError>;
}
