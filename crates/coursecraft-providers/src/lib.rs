//! coursecraft-providers: Generative-AI provider integrations.
//!
//! Implements the `LlmProvider` trait for Gemini, OpenAI, Anthropic and
//! Ollama, plus a scripted mock for tests, and loads the provider section of
//! the coursecraft configuration.

pub mod anthropic;
pub mod config;
pub mod error;
pub mod gemini;
mod http;
pub mod mock;
pub mod ollama;
pub mod openai;

pub use config::{
    create_provider, load_config, load_config_from, CatalogConfig, CoursecraftConfig,
    ProviderConfig,
};
pub use error::ProviderError;
