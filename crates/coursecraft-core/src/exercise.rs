//! Transient answer state for the exercise on the current lesson.
//!
//! An [`ExerciseAttempt`] is created fresh every time a lesson is entered and
//! thrown away when the learner moves on. Once the answer has been checked,
//! every further interaction is rejected.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::ExerciseError;
use crate::evaluator::{evaluate, Answer, Feedback, Verdict};
use crate::model::{Exercise, ExerciseKind};

/// What the learner has entered so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnswerState {
    /// The lesson has no exercise.
    #[default]
    None,
    /// Quiz: the selected option, if any.
    Choice(Option<String>),
    /// Fill-in-the-blank: the typed text.
    Text(String),
    /// Scramble: words still in the bank and words chosen so far.
    Words { bank: Vec<String>, chosen: Vec<String> },
}

impl AnswerState {
    pub fn selected_option(&self) -> Option<&str> {
        match self {
            AnswerState::Choice(selected) => selected.as_deref(),
            _ => None,
        }
    }

    pub fn typed_text(&self) -> &str {
        match self {
            AnswerState::Text(text) => text,
            _ => "",
        }
    }

    pub fn bank(&self) -> &[String] {
        match self {
            AnswerState::Words { bank, .. } => bank,
            _ => &[],
        }
    }

    pub fn chosen(&self) -> &[String] {
        match self {
            AnswerState::Words { chosen, .. } => chosen,
            _ => &[],
        }
    }
}

/// The learner's attempt at one lesson's exercise.
#[derive(Debug, Clone, Default)]
pub struct ExerciseAttempt {
    exercise: Option<Exercise>,
    answer: AnswerState,
    verdict: Option<Verdict>,
}

impl ExerciseAttempt {
    /// Start an attempt, shuffling scramble words with the thread RNG.
    pub fn new(exercise: Option<&Exercise>) -> Self {
        Self::with_rng(exercise, &mut rand::rng())
    }

    /// Start an attempt with an explicit RNG.
    pub fn with_rng<R: Rng + ?Sized>(exercise: Option<&Exercise>, rng: &mut R) -> Self {
        let answer = match exercise {
            None => AnswerState::None,
            Some(Exercise::Quiz(_)) => AnswerState::Choice(None),
            Some(Exercise::FillInTheBlank(_)) => AnswerState::Text(String::new()),
            Some(Exercise::ScrambledSentence(game)) => {
                let mut bank = game.scrambled.clone();
                bank.shuffle(rng);
                AnswerState::Words {
                    bank,
                    chosen: Vec::new(),
                }
            }
        };
        Self {
            exercise: exercise.cloned(),
            answer,
            verdict: None,
        }
    }

    pub fn exercise(&self) -> Option<&Exercise> {
        self.exercise.as_ref()
    }

    pub fn answer(&self) -> &AnswerState {
        &self.answer
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    /// Feedback is present iff the answer has been checked.
    pub fn feedback(&self) -> Option<&Feedback> {
        self.verdict.as_ref().map(|v| &v.feedback)
    }

    pub fn is_checked(&self) -> bool {
        self.verdict.is_some()
    }

    /// Select a quiz option. Re-selecting replaces the previous choice.
    pub fn select_option(&mut self, option: &str) -> Result<(), ExerciseError> {
        self.ensure_open()?;
        let Some(Exercise::Quiz(quiz)) = &self.exercise else {
            return Err(self.wrong_kind(ExerciseKind::Quiz));
        };
        if !quiz.options.iter().any(|o| o == option) {
            return Err(ExerciseError::UnknownOption(option.to_string()));
        }
        self.answer = AnswerState::Choice(Some(option.to_string()));
        Ok(())
    }

    /// Replace the typed fill-in-the-blank answer.
    pub fn set_text(&mut self, text: &str) -> Result<(), ExerciseError> {
        self.ensure_open()?;
        if let AnswerState::Text(current) = &mut self.answer {
            *current = text.to_string();
            return Ok(());
        }
        Err(self.wrong_kind(ExerciseKind::FillInTheBlank))
    }

    /// Move the word at `bank_index` to the end of the chosen words.
    pub fn choose_word(&mut self, bank_index: usize) -> Result<(), ExerciseError> {
        self.ensure_open()?;
        if let AnswerState::Words { bank, chosen } = &mut self.answer {
            return move_word(bank, chosen, bank_index);
        }
        Err(self.wrong_kind(ExerciseKind::ScrambledSentence))
    }

    /// Move the word at `chosen_index` back to the end of the bank.
    pub fn return_word(&mut self, chosen_index: usize) -> Result<(), ExerciseError> {
        self.ensure_open()?;
        if let AnswerState::Words { bank, chosen } = &mut self.answer {
            return move_word(chosen, bank, chosen_index);
        }
        Err(self.wrong_kind(ExerciseKind::ScrambledSentence))
    }

    /// Whether there is enough of an answer to check.
    pub fn can_check(&self) -> bool {
        if self.is_checked() {
            return false;
        }
        match &self.answer {
            AnswerState::None => false,
            AnswerState::Choice(selected) => selected.is_some(),
            AnswerState::Text(text) => !text.trim().is_empty(),
            AnswerState::Words { chosen, .. } => !chosen.is_empty(),
        }
    }

    /// Evaluate the answer. Checking twice returns the stored verdict
    /// without evaluating again.
    pub fn check(&mut self) -> Result<&Verdict, ExerciseError> {
        if self.verdict.is_none() {
            let exercise = self.exercise.as_ref().ok_or(ExerciseError::NoExercise)?;
            if !self.can_check() {
                return Err(ExerciseError::Incomplete);
            }
            let answer = match &self.answer {
                AnswerState::Choice(Some(selected)) => Answer::Choice(selected),
                AnswerState::Text(text) => Answer::Text(text),
                AnswerState::Words { chosen, .. } => Answer::Words(chosen),
                AnswerState::Choice(None) | AnswerState::None => {
                    return Err(ExerciseError::Incomplete)
                }
            };
            let verdict = evaluate(exercise, answer)?;
            tracing::debug!(
                exercise = %exercise.kind(),
                correct = verdict.correct,
                "answer checked"
            );
            self.verdict = Some(verdict);
        }
        self.verdict.as_ref().ok_or(ExerciseError::Incomplete)
    }

    fn ensure_open(&self) -> Result<(), ExerciseError> {
        if self.is_checked() {
            Err(ExerciseError::AlreadyChecked)
        } else {
            Ok(())
        }
    }

    fn wrong_kind(&self, expected: ExerciseKind) -> ExerciseError {
        if self.exercise.is_none() {
            ExerciseError::NoExercise
        } else {
            ExerciseError::WrongKind { expected }
        }
    }
}

fn move_word(
    from: &mut Vec<String>,
    to: &mut Vec<String>,
    index: usize,
) -> Result<(), ExerciseError> {
    if index >= from.len() {
        return Err(ExerciseError::NoSuchWord {
            index,
            len: from.len(),
        });
    }
    let word = from.remove(index);
    to.push(word);
    Ok(())
}
