//! Error types shared across coursecraft.
//!
//! `ProviderError` lives here rather than in `coursecraft-providers` so the
//! tutor can downcast and log provider failures without string matching.

use thiserror::Error;

use crate::model::ExerciseKind;

/// Errors that can occur when interacting with an LLM provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Returns `true` if the error comes from credentials or model selection
    /// rather than the service being unavailable.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ProviderError::AuthenticationFailed(_) | ProviderError::ModelNotFound(_)
        )
    }
}

/// A course payload that cannot be played.
#[derive(Debug, Error)]
pub enum CourseError {
    /// Missing title, missing or non-list lessons, or no lessons at all.
    #[error("Invalid course structure received from API: {0}")]
    InvalidStructure(String),

    /// The payload was not JSON.
    #[error("course is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A course file could not be read.
    #[error("failed to read course file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failed request against the course catalog. The display text is the
/// user-facing message for the failing view.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Failed to fetch subjects.")]
    Subjects,

    #[error("Failed to fetch courses for subject: {subject_id}")]
    Courses { subject_id: String },

    #[error("Failed to fetch course details for course {course_id}.")]
    CourseDetails { course_id: String },
}

/// An exercise interaction that was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExerciseError {
    #[error("the answer has already been checked")]
    AlreadyChecked,

    #[error("this lesson has no {expected} exercise")]
    WrongKind { expected: ExerciseKind },

    #[error("no word at position {index} (only {len} left)")]
    NoSuchWord { index: usize, len: usize },

    #[error("\"{0}\" is not one of the options")]
    UnknownOption(String),

    #[error("there is no exercise to answer in this lesson")]
    NoExercise,

    #[error("give an answer before checking")]
    Incomplete,
}

/// A session action attempted from a state that does not allow it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {action} while {from}")]
    InvalidTransition { from: String, action: &'static str },

    #[error("check the answer before moving on")]
    Unanswered,

    #[error(transparent)]
    Exercise(#[from] ExerciseError),
}

/// A catalog navigation step that does not fit the current view.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("cannot {action} from the {view} view")]
    WrongView {
        view: &'static str,
        action: &'static str,
    },

    #[error("still loading, wait for the current request to finish")]
    Busy,

    #[error("no {0} with that id is listed here")]
    UnknownEntry(&'static str),

    #[error("course details are not loaded")]
    DetailsMissing,
}

/// Failures of AI tutor requests.
#[derive(Debug, Error)]
pub enum TutorError {
    /// Course generation failed for any reason; the cause is logged.
    #[error("Failed to generate the learning course. The content might be too complex or the AI service is currently unavailable. Please try again with different content.")]
    Generation(#[source] anyhow::Error),

    /// The provider returned no text for an assist request.
    #[error("the AI service returned an empty response")]
    EmptyResponse,

    /// An assist request failed.
    #[error("the AI service request failed: {0:#}")]
    Assist(#[source] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_messages_name_the_failing_resource() {
        assert_eq!(CatalogError::Subjects.to_string(), "Failed to fetch subjects.");
        assert_eq!(
            CatalogError::Courses {
                subject_id: "CS".into()
            }
            .to_string(),
            "Failed to fetch courses for subject: CS"
        );
        assert_eq!(
            CatalogError::CourseDetails {
                course_id: "CS101".into()
            }
            .to_string(),
            "Failed to fetch course details for course CS101."
        );
    }

    #[test]
    fn provider_configuration_errors() {
        assert!(ProviderError::AuthenticationFailed("bad key".into()).is_configuration());
        assert!(ProviderError::ModelNotFound("m".into()).is_configuration());
        assert!(!ProviderError::Timeout(120).is_configuration());
    }

    #[test]
    fn generation_error_hides_cause_in_message() {
        let err = TutorError::Generation(anyhow::anyhow!("HTTP 500"));
        assert!(err.to_string().starts_with("Failed to generate the learning course."));
        assert!(!err.to_string().contains("500"));
    }
}
