//! The lesson session state machine.
//!
//! A [`Session`] owns one generate-and-play cycle:
//!
//! ```text
//! Idle --begin_generation--> Generating --finish_generation(Ok)--> InProgress(0)
//!   |                             |
//!   | (blank text)                +--finish_generation(Err)--> Error
//!   v
//! Error
//!
//! InProgress(i) --advance--> InProgress(i + 1) | Completed (after the last lesson)
//! any state --restart--> Idle
//! ```
//!
//! Entering a lesson always starts a fresh [`ExerciseAttempt`], so nothing
//! the learner typed or selected carries over to the next lesson.

use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

use crate::error::SessionError;
use crate::evaluator::{Feedback, Verdict};
use crate::exercise::ExerciseAttempt;
use crate::model::{Course, Lesson};

/// Message shown when generation is requested with no source text.
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some content to create a course.";

/// Where a session currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Generating,
    InProgress { index: usize },
    Completed,
    Error { message: String },
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Idle => write!(f, "idle"),
            SessionPhase::Generating => write!(f, "generating"),
            SessionPhase::InProgress { index } => write!(f, "on lesson {}", index + 1),
            SessionPhase::Completed => write!(f, "completed"),
            SessionPhase::Error { .. } => write!(f, "showing an error"),
        }
    }
}

/// Position within the course, for the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// 1-based lesson number.
    pub current: usize,
    pub total: usize,
}

impl Progress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f64 / self.total as f64 * 100.0
        }
    }
}

/// State of one course-generation-and-playthrough cycle.
pub struct Session {
    id: Uuid,
    phase: SessionPhase,
    source_text: String,
    course: Option<Course>,
    attempt: ExerciseAttempt,
    rng: StdRng,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_rng(&mut rand::rng()))
    }

    /// A session whose scramble shuffles are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: SessionPhase::Idle,
            source_text: String::new(),
            course: None,
            attempt: ExerciseAttempt::default(),
            rng,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn is_generating(&self) -> bool {
        self.phase == SessionPhase::Generating
    }

    pub fn is_completed(&self) -> bool {
        self.phase == SessionPhase::Completed
    }

    /// The message of the error view, if the session is in it.
    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            SessionPhase::Error { message } => Some(message),
            _ => None,
        }
    }

    /// The text the current course was generated from.
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn course(&self) -> Option<&Course> {
        self.course.as_ref()
    }

    pub fn lesson_index(&self) -> Option<usize> {
        match self.phase {
            SessionPhase::InProgress { index } => Some(index),
            _ => None,
        }
    }

    pub fn current_lesson(&self) -> Option<&Lesson> {
        let index = self.lesson_index()?;
        self.course.as_ref()?.lessons.get(index)
    }

    /// Answer state for the current lesson's exercise.
    pub fn attempt(&self) -> &ExerciseAttempt {
        &self.attempt
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.attempt.feedback()
    }

    pub fn progress(&self) -> Option<Progress> {
        let index = self.lesson_index()?;
        let total = self.course.as_ref()?.lesson_count();
        Some(Progress {
            current: index + 1,
            total,
        })
    }

    /// Whether this is the last lesson (the "next" action finishes the course).
    pub fn on_last_lesson(&self) -> bool {
        matches!(self.progress(), Some(p) if p.current == p.total)
    }

    /// Start generating a course from `text`.
    ///
    /// Blank text moves the session straight to the error view with
    /// [`EMPTY_INPUT_MESSAGE`]; check [`Session::is_generating`] before
    /// calling the provider.
    pub fn begin_generation(&mut self, text: &str) -> Result<(), SessionError> {
        self.require_idle("generate a course")?;
        self.source_text = text.to_string();
        if text.trim().is_empty() {
            tracing::info!(session = %self.id, "generation rejected: empty input");
            self.phase = SessionPhase::Error {
                message: EMPTY_INPUT_MESSAGE.to_string(),
            };
            return Ok(());
        }
        tracing::info!(session = %self.id, chars = text.len(), "generating course");
        self.phase = SessionPhase::Generating;
        Ok(())
    }

    /// Record the outcome of a generation request.
    pub fn finish_generation(&mut self, result: Result<Course, String>) -> Result<(), SessionError> {
        if !self.is_generating() {
            return Err(self.invalid("finish generating"));
        }
        match result {
            Ok(course) => self.accept_course(course),
            Err(message) => {
                tracing::info!(session = %self.id, "generation failed");
                self.phase = SessionPhase::Error { message };
            }
        }
        Ok(())
    }

    /// Start playing a course that was generated earlier, skipping generation.
    pub fn load_course(&mut self, course: Course) -> Result<(), SessionError> {
        self.require_idle("load a course")?;
        self.accept_course(course);
        Ok(())
    }

    fn accept_course(&mut self, course: Course) {
        if course.lessons.is_empty() {
            tracing::warn!(session = %self.id, "course has no lessons");
            self.phase = SessionPhase::Error {
                message: "Invalid course structure received from API.".to_string(),
            };
            return;
        }
        tracing::info!(
            session = %self.id,
            title = %course.title,
            lessons = course.lesson_count(),
            "course ready"
        );
        self.course = Some(course);
        self.enter_lesson(0);
    }

    /// Move to the next lesson, or complete the course after the last one.
    ///
    /// A lesson with an exercise must be checked first.
    pub fn advance(&mut self) -> Result<(), SessionError> {
        let Some(index) = self.lesson_index() else {
            return Err(self.invalid("move to the next lesson"));
        };
        if self.attempt.exercise().is_some() && !self.attempt.is_checked() {
            return Err(SessionError::Unanswered);
        }
        let total = self.course.as_ref().map_or(0, Course::lesson_count);
        if index + 1 < total {
            self.enter_lesson(index + 1);
        } else {
            tracing::info!(session = %self.id, "course completed");
            self.attempt = ExerciseAttempt::default();
            self.phase = SessionPhase::Completed;
        }
        Ok(())
    }

    /// Discard the course and all progress.
    pub fn restart(&mut self) {
        tracing::info!(session = %self.id, from = %self.phase, "restarting session");
        self.phase = SessionPhase::Idle;
        self.source_text.clear();
        self.course = None;
        self.attempt = ExerciseAttempt::default();
    }

    /// Check the current answer. Repeated checks return the first verdict.
    pub fn check_answer(&mut self) -> Result<Verdict, SessionError> {
        self.require_lesson("check an answer")?;
        Ok(self.attempt.check()?.clone())
    }

    pub fn select_option(&mut self, option: &str) -> Result<(), SessionError> {
        self.require_lesson("select an option")?;
        Ok(self.attempt.select_option(option)?)
    }

    pub fn set_text(&mut self, text: &str) -> Result<(), SessionError> {
        self.require_lesson("type an answer")?;
        Ok(self.attempt.set_text(text)?)
    }

    pub fn choose_word(&mut self, bank_index: usize) -> Result<(), SessionError> {
        self.require_lesson("choose a word")?;
        Ok(self.attempt.choose_word(bank_index)?)
    }

    pub fn return_word(&mut self, chosen_index: usize) -> Result<(), SessionError> {
        self.require_lesson("return a word")?;
        Ok(self.attempt.return_word(chosen_index)?)
    }

    fn enter_lesson(&mut self, index: usize) {
        let exercise = self
            .course
            .as_ref()
            .and_then(|c| c.lessons.get(index))
            .and_then(|l| l.exercise.as_ref());
        self.attempt = ExerciseAttempt::with_rng(exercise, &mut self.rng);
        self.phase = SessionPhase::InProgress { index };
        tracing::debug!(session = %self.id, lesson = index + 1, "entered lesson");
    }

    fn require_idle(&self, action: &'static str) -> Result<(), SessionError> {
        if self.phase == SessionPhase::Idle {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn require_lesson(&self, action: &'static str) -> Result<(), SessionError> {
        if self.lesson_index().is_some() {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            from: self.phase.to_string(),
            action,
        }
    }
}
