//! Core data model types for coursecraft.
//!
//! A generated course is an ordered list of lessons, each optionally paired
//! with one interactive exercise. The JSON shape exchanged with AI providers
//! (and written to saved course files) carries the exercise as three
//! optional camelCase fields; in memory it is a single [`Exercise`] variant.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder token marking the blank in a fill-in-the-blank sentence.
pub const BLANK_PLACEHOLDER: &str = "___";

/// A generated course: a title and its ordered lessons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Short, engaging course title.
    pub title: String,
    /// Lessons in presentation order.
    pub lessons: Vec<Lesson>,
}

impl Course {
    /// Number of lessons in the course.
    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }

    /// Number of lessons that carry an exercise.
    pub fn exercise_count(&self) -> usize {
        self.lessons.iter().filter(|l| l.exercise.is_some()).count()
    }
}

/// One unit of course content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireLesson", into = "WireLesson")]
pub struct Lesson {
    /// Lesson title.
    pub title: String,
    /// Main educational content, explained simply.
    pub content: String,
    /// Optional interactive exercise.
    pub exercise: Option<Exercise>,
}

/// The interactive exercise attached to a lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exercise {
    Quiz(Quiz),
    FillInTheBlank(FillInTheBlank),
    ScrambledSentence(ScrambledSentence),
}

impl Exercise {
    /// The kind of this exercise.
    pub fn kind(&self) -> ExerciseKind {
        match self {
            Exercise::Quiz(_) => ExerciseKind::Quiz,
            Exercise::FillInTheBlank(_) => ExerciseKind::FillInTheBlank,
            Exercise::ScrambledSentence(_) => ExerciseKind::ScrambledSentence,
        }
    }
}

/// Discriminant of [`Exercise`], used for logging and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExerciseKind {
    Quiz,
    FillInTheBlank,
    ScrambledSentence,
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseKind::Quiz => write!(f, "quiz"),
            ExerciseKind::FillInTheBlank => write!(f, "fill-in-the-blank"),
            ExerciseKind::ScrambledSentence => write!(f, "scrambled-sentence"),
        }
    }
}

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub question: String,
    pub options: Vec<String>,
    /// Expected to equal one of `options`; not enforced.
    pub correct_answer: String,
}

/// A sentence with a single `___` blank to fill in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillInTheBlank {
    pub sentence: String,
    pub correct_answer: String,
}

impl FillInTheBlank {
    /// Text before and after the blank. Without a placeholder the whole
    /// sentence is returned as the first part.
    pub fn parts(&self) -> (&str, &str) {
        self.sentence
            .split_once(BLANK_PLACEHOLDER)
            .unwrap_or((self.sentence.as_str(), ""))
    }
}

/// Shuffled words that must be put back in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrambledSentence {
    pub scrambled: Vec<String>,
    pub correct_sentence: String,
}

/// Wire representation of a lesson, as produced by the course schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireLesson {
    title: String,
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quiz: Option<Quiz>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fill_in_the_blank: Option<FillInTheBlank>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scrambled_sentence: Option<ScrambledSentence>,
}

impl From<WireLesson> for Lesson {
    fn from(wire: WireLesson) -> Self {
        let provided = [
            wire.quiz.is_some(),
            wire.fill_in_the_blank.is_some(),
            wire.scrambled_sentence.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count();
        if provided > 1 {
            tracing::warn!(
                lesson = %wire.title,
                provided,
                "lesson carries more than one exercise, keeping the first"
            );
        }

        // First match wins: quiz, then fill-in-the-blank, then scramble.
        let exercise = wire
            .quiz
            .map(Exercise::Quiz)
            .or_else(|| wire.fill_in_the_blank.map(Exercise::FillInTheBlank))
            .or_else(|| wire.scrambled_sentence.map(Exercise::ScrambledSentence));

        Lesson {
            title: wire.title,
            content: wire.content,
            exercise,
        }
    }
}

impl From<Lesson> for WireLesson {
    fn from(lesson: Lesson) -> Self {
        let mut wire = WireLesson {
            title: lesson.title,
            content: lesson.content,
            ..Default::default()
        };
        match lesson.exercise {
            Some(Exercise::Quiz(quiz)) => wire.quiz = Some(quiz),
            Some(Exercise::FillInTheBlank(game)) => wire.fill_in_the_blank = Some(game),
            Some(Exercise::ScrambledSentence(game)) => wire.scrambled_sentence = Some(game),
            None => {}
        }
        wire
    }
}

/// A course saved to disk together with where it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseDocument {
    pub course: Course,
    /// When the course was generated.
    pub generated_at: DateTime<Utc>,
    /// Provider that generated the course.
    #[serde(default)]
    pub provider: String,
    /// Model that generated the course.
    #[serde(default)]
    pub model: String,
}

impl CourseDocument {
    pub fn new(course: Course, provider: &str, model: &str) -> Self {
        Self {
            course,
            generated_at: Utc::now(),
            provider: provider.to_string(),
            model: model.to_string(),
        }
    }
}
