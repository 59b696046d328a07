//! Completion client implementations for Colloquy.
//!
//! Currently one backend: Azure OpenAI chat completions. Anything that
//! speaks the same deployment-scoped endpoint shape works unchanged.

pub mod azure;

pub use azure::AzureOpenAiClient;
