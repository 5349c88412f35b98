//! Answer evaluation for the three exercise kinds.
//!
//! Every function here is pure: it looks at the exercise and the learner's
//! answer and returns a [`Verdict`]. Feedback styling keys off the message
//! text, so positive messages always start with one of
//! [`POSITIVE_PREFIXES`] and negative ones never do.

use std::fmt;

use crate::error::ExerciseError;
use crate::model::{Exercise, ExerciseKind, FillInTheBlank, Quiz, ScrambledSentence};

/// Prefixes that mark a feedback message as positive.
pub const POSITIVE_PREFIXES: [&str; 3] = ["Correct", "That's", "Perfect"];

/// Whether feedback reads as praise or as a correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
}

/// A feedback message shown after checking an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback(String);

impl Feedback {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }

    /// Positive iff the message starts with a recognized positive prefix.
    pub fn is_positive(&self) -> bool {
        POSITIVE_PREFIXES.iter().any(|p| self.0.starts_with(p))
    }

    pub fn tone(&self) -> Tone {
        if self.is_positive() {
            Tone::Positive
        } else {
            Tone::Negative
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of checking one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub correct: bool,
    pub feedback: Feedback,
}

/// A learner's answer, borrowed from the exercise state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer<'a> {
    /// The selected quiz option.
    Choice(&'a str),
    /// Typed text for a fill-in-the-blank.
    Text(&'a str),
    /// Words chosen so far, in order, for a scramble.
    Words(&'a [String]),
}

impl Answer<'_> {
    fn kind(&self) -> ExerciseKind {
        match self {
            Answer::Choice(_) => ExerciseKind::Quiz,
            Answer::Text(_) => ExerciseKind::FillInTheBlank,
            Answer::Words(_) => ExerciseKind::ScrambledSentence,
        }
    }
}

/// Quiz answers must match the correct option exactly, including case.
pub fn evaluate_quiz(quiz: &Quiz, selected: &str) -> Verdict {
    let correct = selected == quiz.correct_answer;
    let feedback = if correct {
        Feedback::new("Correct! Well done!")
    } else {
        Feedback::new(format!(
            "Not quite! The correct answer was: {}",
            quiz.correct_answer
        ))
    };
    Verdict { correct, feedback }
}

/// Fill-in answers are trimmed and compared case-insensitively.
pub fn evaluate_fill_in_the_blank(game: &FillInTheBlank, answer: &str) -> Verdict {
    let correct = answer.trim().to_lowercase() == game.correct_answer.to_lowercase();
    let feedback = if correct {
        Feedback::new("That's right! Excellent!")
    } else {
        Feedback::new(format!(
            "Good try! The correct answer is: {}",
            game.correct_answer
        ))
    };
    Verdict { correct, feedback }
}

/// Chosen words joined by single spaces must equal the sentence exactly.
pub fn evaluate_scramble(game: &ScrambledSentence, chosen: &[String]) -> Verdict {
    let correct = chosen.join(" ") == game.correct_sentence;
    let feedback = if correct {
        Feedback::new("Perfect! You unscrambled it!")
    } else {
        Feedback::new(format!(
            "Almost! The correct sentence is: \"{}\"",
            game.correct_sentence
        ))
    };
    Verdict { correct, feedback }
}

/// Evaluate an answer against whichever exercise the lesson carries.
pub fn evaluate(exercise: &Exercise, answer: Answer<'_>) -> Result<Verdict, ExerciseError> {
    match (exercise, answer) {
        (Exercise::Quiz(quiz), Answer::Choice(selected)) => Ok(evaluate_quiz(quiz, selected)),
        (Exercise::FillInTheBlank(game), Answer::Text(text)) => {
            Ok(evaluate_fill_in_the_blank(game, text))
        }
        (Exercise::ScrambledSentence(game), Answer::Words(words)) => {
            Ok(evaluate_scramble(game, words))
        }
        (exercise, answer) => {
            tracing::debug!(
                exercise = %exercise.kind(),
                answer = %answer.kind(),
                "answer does not fit exercise"
            );
            Err(ExerciseError::WrongKind {
                expected: answer.kind(),
            })
        }
    }
}
