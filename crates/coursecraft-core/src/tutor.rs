//! AI tutor: course generation and course-detail assistance.
//!
//! Wraps an [`LlmProvider`] with the prompts and the course schema, and maps
//! every generation failure onto one user-facing message while logging the
//! underlying cause.

use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Value};
use tracing::instrument;

use crate::catalog::CourseDetails;
use crate::error::{ProviderError, SessionError, TutorError};
use crate::model::Course;
use crate::parser::parse_course_str;
use crate::session::Session;
use crate::traits::{GenerateRequest, LlmProvider};

/// Generation settings for the tutor.
#[derive(Debug, Clone)]
pub struct TutorConfig {
    /// Model identifier passed to the provider.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Max tokens per response.
    pub max_tokens: u32,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.7,
            max_tokens: 8192,
        }
    }
}

const COURSE_SYSTEM_PROMPT: &str = "You are an expert instructional designer specializing in gamification. You answer with a single JSON object and nothing else.";

const ADVISOR_SYSTEM_PROMPT: &str = "You are a friendly university academic advisor. Answer in plain text without markdown headings.";

/// JSON schema every generated course must follow.
pub fn course_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": {
                "type": "string",
                "description": "A short, engaging title for the entire course."
            },
            "lessons": {
                "type": "array",
                "description": "An array of lesson objects that make up the course.",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": {
                            "type": "string",
                            "description": "The title of this specific lesson."
                        },
                        "content": {
                            "type": "string",
                            "description": "The main educational content for the lesson, explained simply."
                        },
                        "quiz": {
                            "type": "object",
                            "description": "An optional multiple-choice quiz for this lesson.",
                            "properties": {
                                "question": {"type": "string"},
                                "options": {"type": "array", "items": {"type": "string"}},
                                "correctAnswer": {"type": "string"}
                            },
                            "required": ["question", "options", "correctAnswer"]
                        },
                        "fillInTheBlank": {
                            "type": "object",
                            "description": "An optional fill-in-the-blank exercise.",
                            "properties": {
                                "sentence": {
                                    "type": "string",
                                    "description": "The sentence with a placeholder like '___' for the blank."
                                },
                                "correctAnswer": {
                                    "type": "string",
                                    "description": "The word that fills the blank."
                                }
                            },
                            "required": ["sentence", "correctAnswer"]
                        },
                        "scrambledSentence": {
                            "type": "object",
                            "description": "An optional scrambled sentence minigame.",
                            "properties": {
                                "scrambled": {
                                    "type": "array",
                                    "items": {"type": "string"},
                                    "description": "An array of shuffled words."
                                },
                                "correctSentence": {
                                    "type": "string",
                                    "description": "The correctly ordered sentence."
                                }
                            },
                            "required": ["scrambled", "correctSentence"]
                        }
                    },
                    "required": ["title", "content"]
                }
            }
        },
        "required": ["title", "lessons"]
    })
}

/// The instruction sent with the learner's source text.
pub fn course_prompt(content: &str) -> String {
    format!(
        "Transform the following raw text content into a structured, gamified mini-course.

Follow these rules:
1. Create a concise and catchy main title for the course.
2. Break the content down into 3-5 short, easily digestible lessons.
3. Each lesson must have a clear title and its core content.
4. To make it interactive, add ONE of the following to most lessons: a multiple-choice quiz, a fill-in-the-blank exercise, or a scrambled sentence game. Vary the activities to keep it engaging.
5. The tone should be encouraging and simple, as if for a beginner.
6. The entire output must be a valid JSON object that strictly adheres to the provided schema. Do not include any text, markdown formatting, or explanations outside of the JSON object.

Raw Content to transform:
---
{content}
---
"
    )
}

fn explain_prompt(details: &CourseDetails) -> String {
    format!(
        "Explain the following university course to a prospective student in a few short paragraphs: what it covers, what they will be able to do afterwards, and who it suits.\n\n{}",
        details.describe()
    )
}

fn prerequisites_prompt(details: &CourseDetails) -> String {
    format!(
        "Advise a student on preparing for the following university course. If prerequisites are listed, explain why each matters; otherwise suggest the background knowledge they should have. End with a short list of concrete preparation steps.\n\n{}",
        details.describe()
    )
}

/// Course generation and assistance on top of one provider.
#[derive(Clone)]
pub struct Tutor {
    provider: Arc<dyn LlmProvider>,
    config: TutorConfig,
}

impl Tutor {
    pub fn new(provider: Arc<dyn LlmProvider>, config: TutorConfig) -> Self {
        Self { provider, config }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Turn source text into a course.
    #[instrument(skip(self, content), fields(provider = %self.provider.name(), model = %self.config.model))]
    pub async fn generate_course(&self, content: &str) -> Result<Course, TutorError> {
        let start = Instant::now();
        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt: course_prompt(content),
            system_prompt: Some(COURSE_SYSTEM_PROMPT.to_string()),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            json_schema: Some(course_schema()),
        };

        let response = self.provider.generate(&request).await.map_err(|e| {
            log_provider_failure(&e);
            TutorError::Generation(e)
        })?;

        let course = parse_course_str(&response.content).map_err(|e| {
            tracing::error!(error = %e, "provider returned an unusable course");
            TutorError::Generation(e.into())
        })?;

        tracing::info!(
            title = %course.title,
            lessons = course.lesson_count(),
            tokens = response.token_usage.total_tokens,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "course generated"
        );
        Ok(course)
    }

    /// Drive a session through generation: begin, call the provider, finish.
    ///
    /// Blank input never reaches the provider.
    pub async fn run_generation(&self, session: &mut Session, content: &str) -> Result<(), SessionError> {
        session.begin_generation(content)?;
        if !session.is_generating() {
            return Ok(());
        }
        let result = self
            .generate_course(content)
            .await
            .map_err(|e| e.to_string());
        session.finish_generation(result)
    }

    /// Plain-language explanation of a catalog course.
    #[instrument(skip(self, details), fields(course = %details.id))]
    pub async fn explain_course(&self, details: &CourseDetails) -> Result<String, TutorError> {
        self.assist(explain_prompt(details)).await
    }

    /// Advice on what to know before taking a catalog course.
    #[instrument(skip(self, details), fields(course = %details.id))]
    pub async fn suggest_prerequisites(&self, details: &CourseDetails) -> Result<String, TutorError> {
        self.assist(prerequisites_prompt(details)).await
    }

    async fn assist(&self, prompt: String) -> Result<String, TutorError> {
        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt,
            system_prompt: Some(ADVISOR_SYSTEM_PROMPT.to_string()),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            json_schema: None,
        };
        let response = self.provider.generate(&request).await.map_err(|e| {
            log_provider_failure(&e);
            TutorError::Assist(e)
        })?;
        let text = response.content.trim();
        if text.is_empty() {
            tracing::warn!("assist response was empty");
            return Err(TutorError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

fn log_provider_failure(error: &anyhow::Error) {
    match error.downcast_ref::<ProviderError>() {
        Some(provider_error) => tracing::error!(
            error = %provider_error,
            configuration = provider_error.is_configuration(),
            "provider request failed"
        ),
        None => tracing::error!(error = %format!("{error:#}"), "provider request failed"),
    }
}
