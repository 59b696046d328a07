//! Request assembler — builds each outbound request and completes turns.
//!
//! The assembler owns the system preamble, the generation parameters, and
//! the configured history bound. It is the only component that mutates the
//! conversation store, and it does so strictly after a successful
//! completion: a failed remote call leaves the store untouched.

use colloquy_core::error::{Error, Result};
use colloquy_core::history::ConversationStore;
use colloquy_core::message::{Entry, Role};
use colloquy_core::{CompletionClient, GenerationParams};
use tracing::debug;

/// Assembles requests and orchestrates single conversation turns.
#[derive(Debug)]
pub struct RequestAssembler {
    preamble: Entry,
    params: GenerationParams,
    history_length: usize,
}

impl RequestAssembler {
    /// Create an assembler around a system preamble.
    ///
    /// Fails with [`Error::InvalidEntry`] if the preamble does not carry
    /// the system role.
    pub fn new(preamble: Entry, params: GenerationParams, history_length: usize) -> Result<Self> {
        if preamble.role != Role::System {
            return Err(Error::InvalidEntry {
                expected: Role::System,
                actual: preamble.role,
            });
        }
        Ok(Self {
            preamble,
            params,
            history_length,
        })
    }

    /// The generation parameters forwarded on every call.
    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Build the ordered message list for one request:
    /// preamble, stored history, then the new user entry.
    ///
    /// Fails with [`Error::EmptyInput`] when the text trims to nothing.
    /// The loop filters empty lines already; this guard keeps empty input
    /// from ever reaching the remote service regardless of caller.
    pub fn build_request(&self, store: &ConversationStore, new_user_text: &str) -> Result<Vec<Entry>> {
        if new_user_text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut messages = Vec::with_capacity(store.len() + 2);
        messages.push(self.preamble.clone());
        messages.extend(store.entries().cloned());
        messages.push(Entry::user(new_user_text));
        Ok(messages)
    }

    /// Run one full turn: build the request, call the client, persist the
    /// (user, assistant) pair, trim history. Returns the completion text.
    ///
    /// The append happens only after a successful completion, so any
    /// failure partway leaves `store` exactly as it was.
    pub async fn complete_turn(
        &self,
        store: &mut ConversationStore,
        new_user_text: &str,
        client: &dyn CompletionClient,
    ) -> Result<String> {
        let messages = self.build_request(store, new_user_text)?;

        debug!(
            client = client.name(),
            messages = messages.len(),
            history_entries = store.len(),
            "Completing turn"
        );

        let completion = client.complete(&messages, &self.params).await?;

        store.append(Entry::user(new_user_text), Entry::assistant(completion.clone()))?;
        store.enforce_limit(self.history_length);

        Ok(completion)
    }
}
