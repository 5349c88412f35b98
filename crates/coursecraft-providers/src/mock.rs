//! Mock provider for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use coursecraft_core::traits::{
    GenerateRequest, GenerateResponse, LlmProvider, ModelInfo, TokenUsage,
};

use crate::error::ProviderError;

/// A course with one lesson of each exercise kind.
pub const SAMPLE_COURSE_JSON: &str = r#"{
  "title": "Photosynthesis Power-Up",
  "lessons": [
    {
      "title": "What Is Photosynthesis?",
      "content": "Plants make their own food from sunlight, water and carbon dioxide.",
      "quiz": {
        "question": "What do plants use to make food?",
        "options": ["Sunlight", "Moonlight", "Soil only"],
        "correctAnswer": "Sunlight"
      }
    },
    {
      "title": "The Green Helper",
      "content": "Chlorophyll is the green pigment that captures light energy.",
      "fillInTheBlank": {
        "sentence": "The green pigment in leaves is called ___.",
        "correctAnswer": "chlorophyll"
      }
    },
    {
      "title": "What Comes Out",
      "content": "Photosynthesis releases oxygen into the air.",
      "scrambledSentence": {
        "scrambled": ["oxygen", "Plants", "release"],
        "correctSentence": "Plants release oxygen"
      }
    }
  ]
}"#;

/// A scripted provider for exercising the tutor without real API calls.
///
/// Returns configurable responses based on prompt content matching.
pub struct MockProvider {
    /// Map of prompt substring → response text.
    responses: HashMap<String, String>,
    /// Default response if no prompt matches.
    default_response: String,
    /// When set, every call fails with this message.
    failure: Option<String>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<GenerateRequest>>,
}

impl MockProvider {
    /// Create a mock with the given prompt→response mappings, falling back
    /// to [`SAMPLE_COURSE_JSON`].
    pub fn new(responses: HashMap<String, String>) -> Self {
        Self {
            responses,
            default_response: SAMPLE_COURSE_JSON.to_string(),
            failure: None,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same response.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            default_response: response.to_string(),
            ..Self::new(HashMap::new())
        }
    }

    /// Create a mock whose every call fails with a 503.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new(HashMap::new())
        }
    }

    /// Get the number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this provider.
    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(request.clone());

        if let Some(message) = &self.failure {
            return Err(ProviderError::ApiError {
                status: 503,
                message: message.clone(),
            }
            .into());
        }

        let content = self
            .responses
            .iter()
            .find(|(key, _)| request.prompt.contains(key.as_str()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_response.clone());

        let prompt_tokens = (request.prompt.len() / 4) as u32; // Rough estimate
        let completion_tokens = (content.len() / 4) as u32;

        Ok(GenerateResponse {
            content,
            model: request.model.clone(),
            token_usage: TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            },
            latency_ms: 1,
        })
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![ModelInfo {
            id: "mock-model".into(),
            name: "Mock Model".into(),
            provider: "mock".into(),
            max_context: 100_000,
        }]
    }
}
