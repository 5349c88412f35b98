//! Core trait definitions for LLM providers and catalog sources.
//!
//! These async traits are implemented by the `coursecraft-providers` and
//! `coursecraft-catalog` crates respectively.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::catalog::{CourseDetails, CourseSummary, Subject};
use crate::error::CatalogError;

// ---------------------------------------------------------------------------
// LLM Provider trait
// ---------------------------------------------------------------------------

/// Trait for generative-AI backends.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Generate a completion for a prompt.
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse>;

    /// List available models for this provider.
    fn available_models(&self) -> Vec<ModelInfo>;
}

/// Request to generate text from an LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "gemini-2.5-flash").
    pub model: String,
    /// The main prompt.
    pub prompt: String,
    /// Optional system prompt override.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
    /// When set, the provider is asked for JSON matching this schema.
    #[serde(default)]
    pub json_schema: Option<serde_json::Value>,
}

/// Response from an LLM generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The raw response text.
    pub content: String,
    /// Model that actually generated the response.
    pub model: String,
    /// Token usage.
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Token accounting for a single request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Provider name.
    pub provider: String,
    /// Maximum context window size in tokens.
    pub max_context: u32,
}

// ---------------------------------------------------------------------------
// Catalog source trait
// ---------------------------------------------------------------------------

/// Trait for the university course catalog backend.
///
/// Every method is a single request; implementations do not cache.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// List all subjects with their course counts.
    async fn fetch_subjects(&self) -> Result<Vec<Subject>, CatalogError>;

    /// List the courses offered under a subject.
    async fn fetch_courses(&self, subject_id: &str) -> Result<Vec<CourseSummary>, CatalogError>;

    /// Fetch the full record for one course.
    async fn fetch_course_details(
        &self,
        subject_id: &str,
        course_id: &str,
    ) -> Result<CourseDetails, CatalogError>;
}
