//! Core domain types for Colloquy.
//!
//! This crate holds the value objects and traits that every other crate
//! builds on: transcript entries, the bounded conversation store, the
//! completion-client abstraction, and the error taxonomy. It performs no
//! I/O of its own.

pub mod client;
pub mod error;
pub mod history;
pub mod message;

pub use client::{CompletionClient, GenerationParams};
pub use error::{ClientError, Error, Result};
pub use history::{ConversationStore, Turn};
pub use message::{Entry, Role};
