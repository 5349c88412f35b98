//! Plain-text screens for the interactive commands.

use std::io::{self, Write};

use comfy_table::{Cell, Table};

use coursecraft_core::catalog::{CourseSummary, Subject};
use coursecraft_core::evaluator::{Feedback, Tone};
use coursecraft_core::exercise::ExerciseAttempt;
use coursecraft_core::model::{Exercise, Lesson};
use coursecraft_core::navigator::AssistSlot;
use coursecraft_core::session::{Progress, Session, SessionPhase};
use coursecraft_core::traits::ModelInfo;

const BAR_WIDTH: usize = 20;

pub fn progress_bar(progress: Progress) -> String {
    let filled = (progress.current * BAR_WIDTH) / progress.total.max(1);
    format!(
        "[{}{}] Lesson {} of {}",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)),
        progress.current,
        progress.total
    )
}

pub fn feedback_line(feedback: &Feedback) -> String {
    let mark = match feedback.tone() {
        Tone::Positive => "✔",
        Tone::Negative => "✘",
    };
    format!("{mark} {feedback}")
}

/// Draw whatever screen the session is on.
pub fn session<W: Write>(session: &Session, out: &mut W) -> io::Result<()> {
    match session.phase() {
        SessionPhase::Idle => writeln!(out, "Paste some content to turn it into a course."),
        SessionPhase::Generating => writeln!(out, "Generating your course..."),
        SessionPhase::Error { message } => {
            writeln!(out, "✘ {message}")?;
            writeln!(out, "Type 'restart' to try again or 'quit' to leave.")
        }
        SessionPhase::Completed => {
            writeln!(out)?;
            writeln!(out, "Course Complete!")?;
            if let Some(course) = session.course() {
                writeln!(out, "You finished \"{}\".", course.title)?;
            }
            writeln!(out, "Type 'restart' to start over or 'quit' to leave.")
        }
        SessionPhase::InProgress { .. } => {
            let (Some(course), Some(lesson), Some(progress)) =
                (session.course(), session.current_lesson(), session.progress())
            else {
                return Ok(());
            };
            writeln!(out)?;
            writeln!(out, "== {} ==", course.title)?;
            writeln!(out, "{}", progress_bar(progress))?;
            writeln!(out)?;
            lesson_body(lesson, out)?;
            exercise(session.attempt(), out)?;
            hint(session, out)
        }
    }
}

fn lesson_body<W: Write>(lesson: &Lesson, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", lesson.title)?;
    writeln!(out, "{}", lesson.content)?;
    writeln!(out)
}

/// The exercise prompt and the learner's current answer.
pub fn exercise<W: Write>(attempt: &ExerciseAttempt, out: &mut W) -> io::Result<()> {
    match attempt.exercise() {
        None => Ok(()),
        Some(Exercise::Quiz(quiz)) => {
            writeln!(out, "Quiz: {}", quiz.question)?;
            let selected = attempt.answer().selected_option();
            for (i, option) in quiz.options.iter().enumerate() {
                let marker = if selected == Some(option.as_str()) { "*" } else { " " };
                writeln!(out, " {marker}{}) {option}", i + 1)?;
            }
            Ok(())
        }
        Some(Exercise::FillInTheBlank(game)) => {
            let (before, after) = game.parts();
            let typed = attempt.answer().typed_text();
            let blank = if typed.is_empty() { "_____" } else { typed };
            writeln!(out, "Fill in the blank: {before}[{blank}]{after}")
        }
        Some(Exercise::ScrambledSentence(_)) => scramble(attempt, out),
    }
}

pub fn scramble<W: Write>(attempt: &ExerciseAttempt, out: &mut W) -> io::Result<()> {
    writeln!(out, "Unscramble the sentence:")?;
    writeln!(out, "  Your sentence: {}", numbered(attempt.answer().chosen()))?;
    writeln!(out, "  Word bank:     {}", numbered(attempt.answer().bank()))
}

fn numbered(words: &[String]) -> String {
    if words.is_empty() {
        return "(empty)".to_string();
    }
    words
        .iter()
        .enumerate()
        .map(|(i, w)| format!("{}:{w}", i + 1))
        .collect::<Vec<_>>()
        .join("  ")
}

/// What the learner can type next.
pub fn hint<W: Write>(session: &Session, out: &mut W) -> io::Result<()> {
    let attempt = session.attempt();
    if let Some(feedback) = attempt.feedback() {
        writeln!(out, "{}", feedback_line(feedback))?;
    }
    let next = if session.on_last_lesson() {
        "'next' to finish"
    } else {
        "'next' to continue"
    };
    let prompt = match attempt.exercise() {
        Some(_) if attempt.is_checked() => next.to_string(),
        Some(Exercise::Quiz(_)) => "an option number, then 'check'".to_string(),
        Some(Exercise::FillInTheBlank(_)) => "your answer, then 'check'".to_string(),
        Some(Exercise::ScrambledSentence(_)) => {
            "a bank number to add a word, -N to put one back, then 'check'".to_string()
        }
        None => next.to_string(),
    };
    writeln!(out, "Type {prompt}.")
}

pub fn subjects_table(subjects: &[&Subject]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Subject", "Name", "Courses"]);
    for (i, subject) in subjects.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&subject.id),
            Cell::new(&subject.name),
            Cell::new(subject.course_count),
        ]);
    }
    table
}

pub fn courses_table(courses: &[CourseSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Code", "Course"]);
    for (i, course) in courses.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&course.course_code),
            Cell::new(&course.name),
        ]);
    }
    table
}

pub fn models_table(provider: &str, models: &[ModelInfo]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Provider", "Model", "Name", "Context"]);
    for model in models {
        let context = if model.max_context == 0 {
            "-".to_string()
        } else {
            format!("{}K", model.max_context / 1000)
        };
        table.add_row(vec![
            Cell::new(provider),
            Cell::new(&model.id),
            Cell::new(&model.name),
            Cell::new(context),
        ]);
    }
    table
}

pub fn assist<W: Write>(heading: &str, slot: &AssistSlot, out: &mut W) -> io::Result<()> {
    if slot.loading {
        return writeln!(out, "{heading}: thinking...");
    }
    if let Some(error) = &slot.error {
        writeln!(out, "✘ {error}")?;
    }
    if let Some(text) = &slot.text {
        writeln!(out, "{heading}:")?;
        writeln!(out, "{text}")?;
    }
    Ok(())
}
