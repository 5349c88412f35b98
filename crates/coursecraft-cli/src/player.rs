//! Line-driven lesson player.
//!
//! Reads one command per line and applies it to a [`Session`]. Generic over
//! the reader and writer so tests can script a whole playthrough.

use std::io::{BufRead, Write};

use anyhow::Result;

use coursecraft_core::model::Exercise;
use coursecraft_core::session::{Session, SessionPhase};

use crate::render;

/// Why the player loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerExit {
    /// The learner quit or input ended.
    Quit,
    /// The learner asked to start over; the session is back to idle.
    Restart,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Check,
    Next,
    Restart,
    Quit,
    Help,
    Option(usize),
    Choose(usize),
    Return(usize),
    Text(String),
    Unknown,
}

fn parse_command(line: &str, exercise: Option<&Exercise>) -> Command {
    match line.to_lowercase().as_str() {
        "check" => return Command::Check,
        "next" => return Command::Next,
        "restart" => return Command::Restart,
        "quit" | "q" | "exit" => return Command::Quit,
        "help" | "?" => return Command::Help,
        _ => {}
    }
    match exercise {
        Some(Exercise::Quiz(_)) => match line.parse::<usize>() {
            Ok(n) if n > 0 => Command::Option(n),
            _ => Command::Unknown,
        },
        Some(Exercise::ScrambledSentence(_)) => {
            if let Some(rest) = line.strip_prefix('-') {
                match rest.trim().parse::<usize>() {
                    Ok(n) if n > 0 => Command::Return(n),
                    _ => Command::Unknown,
                }
            } else {
                match line.parse::<usize>() {
                    Ok(n) if n > 0 => Command::Choose(n),
                    _ => Command::Unknown,
                }
            }
        }
        Some(Exercise::FillInTheBlank(_)) => Command::Text(line.to_string()),
        None => Command::Unknown,
    }
}

/// Play the session until the learner quits or restarts.
pub fn run<R: BufRead, W: Write>(session: &mut Session, input: &mut R, out: &mut W) -> Result<PlayerExit> {
    render::session(session, out)?;
    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(PlayerExit::Quit);
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let command = parse_command(trimmed, session.attempt().exercise());
        tracing::debug!(?command, phase = %session.phase(), "player command");
        match command {
            Command::Quit => return Ok(PlayerExit::Quit),
            Command::Restart => {
                session.restart();
                return Ok(PlayerExit::Restart);
            }
            Command::Help => {
                render::hint(session, out)?;
                writeln!(out, "Commands: check, next, restart, quit.")?;
            }
            _ if !matches!(session.phase(), SessionPhase::InProgress { .. }) => {
                render::session(session, out)?;
            }
            Command::Option(n) => {
                let option = match session.attempt().exercise() {
                    Some(Exercise::Quiz(quiz)) => quiz.options.get(n - 1).cloned(),
                    _ => None,
                };
                match option {
                    Some(option) => match session.select_option(&option) {
                        Ok(()) => writeln!(out, "Selected: {option}")?,
                        Err(e) => writeln!(out, "{e}")?,
                    },
                    None => writeln!(out, "There is no option {n}.")?,
                }
            }
            Command::Choose(n) => match session.choose_word(n - 1) {
                Ok(()) => render::scramble(session.attempt(), out)?,
                Err(e) => writeln!(out, "{e}")?,
            },
            Command::Return(n) => match session.return_word(n - 1) {
                Ok(()) => render::scramble(session.attempt(), out)?,
                Err(e) => writeln!(out, "{e}")?,
            },
            Command::Text(text) => match session.set_text(&text) {
                Ok(()) => writeln!(out, "Answer: {text}")?,
                Err(e) => writeln!(out, "{e}")?,
            },
            Command::Check => match session.check_answer() {
                Ok(_) => render::hint(session, out)?,
                Err(e) => writeln!(out, "{e}")?,
            },
            Command::Next => match session.advance() {
                Ok(()) => render::session(session, out)?,
                Err(e) => writeln!(out, "{e}")?,
            },
            Command::Unknown => {
                writeln!(out, "Unrecognized input. Type 'help' for the commands.")?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use coursecraft_core::model::{Course, FillInTheBlank, Lesson, Quiz, ScrambledSentence};

    fn course() -> Course {
        Course {
            title: "Tiny Course".into(),
            lessons: vec![
                Lesson {
                    title: "One".into(),
                    content: "First.".into(),
                    exercise: Some(Exercise::Quiz(Quiz {
                        question: "Pick B".into(),
                        options: vec!["A".into(), "B".into()],
                        correct_answer: "B".into(),
                    })),
                },
                Lesson {
                    title: "Two".into(),
                    content: "Second.".into(),
                    exercise: Some(Exercise::FillInTheBlank(FillInTheBlank {
                        sentence: "Sky is ___.".into(),
                        correct_answer: "blue".into(),
                    })),
                },
                Lesson {
                    title: "Three".into(),
                    content: "Third.".into(),
                    exercise: Some(Exercise::ScrambledSentence(ScrambledSentence {
                        scrambled: vec!["one".into()],
                        correct_sentence: "one".into(),
                    })),
                },
            ],
        }
    }

    fn play(script: &str) -> (PlayerExit, String, Session) {
        let mut session = Session::with_seed(11);
        session.load_course(course()).unwrap();
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        let exit = run(&mut session, &mut input, &mut out).unwrap();
        (exit, String::from_utf8(out).unwrap(), session)
    }

    #[test]
    fn full_playthrough() {
        let (exit, out, session) = play("2\ncheck\nnext\n BLUE \ncheck\nnext\n1\ncheck\nnext\nquit\n");
        assert_eq!(exit, PlayerExit::Quit);
        assert!(session.is_completed());
        assert!(out.contains("Lesson 1 of 3"));
        assert!(out.contains("✔ Correct! Well done!"));
        assert!(out.contains("✔ That's right! Excellent!"));
        assert!(out.contains("✔ Perfect! You unscrambled it!"));
        assert!(out.contains("Course Complete!"));
    }

    #[test]
    fn wrong_answer_is_marked_and_next_needs_check() {
        let (_, out, session) = play("next\n1\ncheck\n2\n");
        assert!(out.contains("check the answer before moving on"));
        assert!(out.contains("✘ Not quite! The correct answer was: B"));
        assert!(out.contains("the answer has already been checked"));
        assert_eq!(session.lesson_index(), Some(0));
    }

    #[test]
    fn restart_returns_to_caller() {
        let (exit, _, session) = play("restart\n");
        assert_eq!(exit, PlayerExit::Restart);
        assert_eq!(session.phase(), &SessionPhase::Idle);
    }

    #[test]
    fn end_of_input_quits() {
        let (exit, _, _) = play("");
        assert_eq!(exit, PlayerExit::Quit);
    }

    #[test]
    fn command_parsing_depends_on_exercise() {
        let quiz = Exercise::Quiz(Quiz {
            question: "q".into(),
            options: vec![],
            correct_answer: "a".into(),
        });
        let scramble = Exercise::ScrambledSentence(ScrambledSentence {
            scrambled: vec![],
            correct_sentence: String::new(),
        });
        let fill = Exercise::FillInTheBlank(FillInTheBlank {
            sentence: "___".into(),
            correct_answer: "x".into(),
        });

        assert_eq!(parse_command("2", Some(&quiz)), Command::Option(2));
        assert_eq!(parse_command("0", Some(&quiz)), Command::Unknown);
        assert_eq!(parse_command("3", Some(&scramble)), Command::Choose(3));
        assert_eq!(parse_command("-1", Some(&scramble)), Command::Return(1));
        assert_eq!(parse_command("2", Some(&fill)), Command::Text("2".into()));
        assert_eq!(parse_command("CHECK", Some(&fill)), Command::Check);
        assert_eq!(parse_command("hello", None), Command::Unknown);
    }
}
