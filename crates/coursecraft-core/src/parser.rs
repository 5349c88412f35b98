//! Course JSON parser.
//!
//! Decodes the course payload returned by an AI provider (or a saved course
//! file), rejects payloads that cannot be played, and reports softer issues
//! the player never enforces.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::error::CourseError;
use crate::model::{Course, CourseDocument, Exercise, BLANK_PLACEHOLDER};

/// Strip a markdown code fence around a JSON payload.
///
/// Providers without a native JSON mode sometimes wrap the object in
/// ```` ```json ```` fences. Prefers a `json`-tagged block, then an untagged
/// one; otherwise the trimmed input is returned as-is.
pub fn extract_json_from_markdown(response: &str) -> String {
    let mut json_block: Option<String> = None;
    let mut generic_block: Option<String> = None;
    let mut in_block = false;
    let mut is_json_block = false;
    let mut is_generic_block = false;
    let mut current_block = String::new();

    for line in response.lines() {
        let trimmed = line.trim();

        if !in_block && trimmed.starts_with("```") {
            in_block = true;
            let lang = trimmed.trim_start_matches('`').trim().to_lowercase();
            is_json_block = lang == "json";
            is_generic_block = lang.is_empty();
            current_block.clear();
            continue;
        }

        if in_block && trimmed == "```" {
            in_block = false;
            if is_json_block && json_block.is_none() {
                json_block = Some(current_block.clone());
            } else if is_generic_block && generic_block.is_none() {
                generic_block = Some(current_block.clone());
            }
            current_block.clear();
            continue;
        }

        if in_block {
            if !current_block.is_empty() {
                current_block.push('\n');
            }
            current_block.push_str(line);
        }
    }

    // Truncated (unclosed) fence: keep what was accumulated
    if in_block && !current_block.is_empty() {
        if is_json_block && json_block.is_none() {
            json_block = Some(current_block);
        } else if is_generic_block && generic_block.is_none() {
            generic_block = Some(current_block);
        }
    }

    json_block
        .or(generic_block)
        .unwrap_or_else(|| response.to_string())
        .trim()
        .to_string()
}

/// Parse a course payload.
///
/// Fails with [`CourseError::InvalidStructure`] when `title` is missing or
/// blank, when `lessons` is missing, not a list, or empty, or when a lesson
/// does not match the lesson schema.
pub fn parse_course_str(content: &str) -> Result<Course, CourseError> {
    let json = extract_json_from_markdown(content);
    let value: Value = serde_json::from_str(&json)?;
    course_from_value(value)
}

fn course_from_value(value: Value) -> Result<Course, CourseError> {
    let Some(object) = value.as_object() else {
        return Err(CourseError::InvalidStructure(
            "expected a JSON object".into(),
        ));
    };

    match object.get("title") {
        Some(Value::String(title)) if !title.trim().is_empty() => {}
        _ => {
            return Err(CourseError::InvalidStructure(
                "missing course title".into(),
            ))
        }
    }

    match object.get("lessons") {
        Some(Value::Array(lessons)) if !lessons.is_empty() => {}
        Some(Value::Array(_)) => {
            return Err(CourseError::InvalidStructure(
                "course has no lessons".into(),
            ))
        }
        _ => {
            return Err(CourseError::InvalidStructure(
                "lessons is not a list".into(),
            ))
        }
    }

    serde_json::from_value(value).map_err(|e| CourseError::InvalidStructure(e.to_string()))
}

/// Read a course file: either a saved [`CourseDocument`] or a bare course.
pub fn parse_course_file(path: &Path) -> Result<CourseDocument, CourseError> {
    let content = std::fs::read_to_string(path).map_err(|source| CourseError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_course_document_str(&content)
}

/// Parse the contents of a course file (useful for testing).
pub fn parse_course_document_str(content: &str) -> Result<CourseDocument, CourseError> {
    let value: Value = serde_json::from_str(content.trim())?;

    if value.get("course").is_some() {
        let course = value
            .get("course")
            .cloned()
            .map(course_from_value)
            .transpose()?
            .ok_or_else(|| CourseError::InvalidStructure("missing course".into()))?;
        let mut doc: CourseDocument =
            serde_json::from_value(value).map_err(|e| CourseError::InvalidStructure(e.to_string()))?;
        doc.course = course;
        return Ok(doc);
    }

    let course = course_from_value(value)?;
    Ok(CourseDocument::new(course, "", ""))
}

/// A warning from course validation.
#[derive(Debug, Clone)]
pub struct CourseWarning {
    /// Zero-based lesson index (if applicable).
    pub lesson: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Validate a course for issues the player tolerates but a learner would
/// trip over.
pub fn validate_course(course: &Course) -> Vec<CourseWarning> {
    let mut warnings = Vec::new();

    for (index, lesson) in course.lessons.iter().enumerate() {
        let mut warn = |message: String| {
            warnings.push(CourseWarning {
                lesson: Some(index),
                message,
            })
        };

        if lesson.content.trim().is_empty() {
            warn("lesson content is empty".into());
        }

        match &lesson.exercise {
            Some(Exercise::Quiz(quiz)) => {
                if quiz.options.len() < 2 {
                    warn(format!("quiz has only {} option(s)", quiz.options.len()));
                }
                if !quiz.options.contains(&quiz.correct_answer) {
                    warn(format!(
                        "quiz correct answer \"{}\" is not one of the options",
                        quiz.correct_answer
                    ));
                }
            }
            Some(Exercise::FillInTheBlank(game)) => {
                let blanks = game.sentence.matches(BLANK_PLACEHOLDER).count();
                if blanks != 1 {
                    warn(format!(
                        "fill-in-the-blank sentence has {blanks} placeholder(s), expected 1"
                    ));
                }
                if game.correct_answer.trim().is_empty() {
                    warn("fill-in-the-blank answer is empty".into());
                }
            }
            Some(Exercise::ScrambledSentence(game)) => {
                if word_counts(game.scrambled.iter().map(String::as_str))
                    != word_counts(game.correct_sentence.split(' '))
                {
                    warn("scrambled words cannot form the correct sentence".into());
                }
            }
            None => {}
        }
    }

    warnings
}

fn word_counts<'a>(words: impl Iterator<Item = &'a str>) -> HashMap<&'a str, usize> {
    let mut counts = HashMap::new();
    for word in words {
        *counts.entry(word).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExerciseKind;

    const VALID_COURSE: &str = r#"{
        "title": "Photosynthesis",
        "lessons": [
            {
                "title": "L1",
                "content": "Plants turn light into chemical energy.",
                "quiz": {"question": "Q", "options": ["A", "B"], "correctAnswer": "A"}
            },
            {
                "title": "L2",
                "content": "Chlorophyll absorbs light.",
                "fillInTheBlank": {"sentence": "Plants absorb ___.", "correctAnswer": "light"}
            },
            {
                "title": "L3",
                "content": "Putting it together.",
                "scrambledSentence": {"scrambled": ["is", "Photosynthesis", "important"], "correctSentence": "Photosynthesis is important"}
            },
            {"title": "Wrap-up", "content": "Well done."}
        ]
    }"#;

    #[test]
    fn parse_valid_course() {
        let course = parse_course_str(VALID_COURSE).unwrap();
        assert_eq!(course.title, "Photosynthesis");
        assert_eq!(course.lesson_count(), 4);
        assert_eq!(course.exercise_count(), 3);
        let kinds: Vec<_> = course
            .lessons
            .iter()
            .map(|l| l.exercise.as_ref().map(Exercise::kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                Some(ExerciseKind::Quiz),
                Some(ExerciseKind::FillInTheBlank),
                Some(ExerciseKind::ScrambledSentence),
                None
            ]
        );
        assert!(validate_course(&course).is_empty());
    }

    #[test]
    fn parse_fenced_course() {
        let fenced = format!("Here you go:\n```json\n{VALID_COURSE}\n```\n");
        let course = parse_course_str(&fenced).unwrap();
        assert_eq!(course.title, "Photosynthesis");
    }

    #[test]
    fn missing_title_is_invalid() {
        let err = parse_course_str(r#"{"lessons": [{"title": "a", "content": "b"}]}"#).unwrap_err();
        assert!(matches!(err, CourseError::InvalidStructure(_)));
    }

    #[test]
    fn blank_title_is_invalid() {
        let err =
            parse_course_str(r#"{"title": "  ", "lessons": [{"title": "a", "content": "b"}]}"#)
                .unwrap_err();
        assert!(matches!(err, CourseError::InvalidStructure(_)));
    }

    #[test]
    fn non_list_lessons_is_invalid() {
        let err = parse_course_str(r#"{"title": "T", "lessons": {"title": "a"}}"#).unwrap_err();
        assert!(err.to_string().contains("not a list"));
    }

    #[test]
    fn empty_lessons_is_invalid() {
        let err = parse_course_str(r#"{"title": "T", "lessons": []}"#).unwrap_err();
        assert!(err.to_string().contains("no lessons"));
    }

    #[test]
    fn lesson_missing_content_is_invalid() {
        let err = parse_course_str(r#"{"title": "T", "lessons": [{"title": "a"}]}"#).unwrap_err();
        assert!(matches!(err, CourseError::InvalidStructure(_)));
    }

    #[test]
    fn malformed_json() {
        let err = parse_course_str("this is not {json").unwrap_err();
        assert!(matches!(err, CourseError::Json(_)));
    }

    #[test]
    fn extract_prefers_json_block() {
        let input = "```\n{\"a\": 1}\n```\n\n```json\n{\"b\": 2}\n```";
        assert_eq!(extract_json_from_markdown(input), "{\"b\": 2}");
    }

    #[test]
    fn extract_unclosed_block() {
        let input = "```json\n{\"title\": \"x\"}";
        assert_eq!(extract_json_from_markdown(input), "{\"title\": \"x\"}");
    }

    #[test]
    fn extract_raw_passthrough() {
        assert_eq!(extract_json_from_markdown("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn document_and_bare_course_files() {
        let dir = tempfile::tempdir().unwrap();

        let bare = dir.path().join("bare.json");
        std::fs::write(&bare, VALID_COURSE).unwrap();
        let doc = parse_course_file(&bare).unwrap();
        assert_eq!(doc.course.lesson_count(), 4);
        assert!(doc.provider.is_empty());

        let saved = CourseDocument::new(doc.course.clone(), "gemini", "gemini-2.5-flash");
        let wrapped = dir.path().join("doc.json");
        std::fs::write(&wrapped, serde_json::to_string_pretty(&saved).unwrap()).unwrap();
        let reloaded = parse_course_file(&wrapped).unwrap();
        assert_eq!(reloaded.provider, "gemini");
        assert_eq!(reloaded.course, saved.course);
    }

    #[test]
    fn document_with_empty_course_is_invalid() {
        let json = r#"{"course": {"title": "T", "lessons": []}, "generated_at": "2025-01-01T00:00:00Z"}"#;
        assert!(parse_course_document_str(json).is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = parse_course_file(Path::new("does-not-exist.json")).unwrap_err();
        assert!(matches!(err, CourseError::Io { .. }));
    }

    #[test]
    fn validate_flags_inconsistent_exercises() {
        let json = r#"{
            "title": "T",
            "lessons": [
                {"title": "a", "content": "x", "quiz": {"question": "Q", "options": ["A"], "correctAnswer": "C"}},
                {"title": "b", "content": "x", "fillInTheBlank": {"sentence": "no blank", "correctAnswer": "y"}},
                {"title": "c", "content": " ", "scrambledSentence": {"scrambled": ["a", "b"], "correctSentence": "a b c"}}
            ]
        }"#;
        let course = parse_course_str(json).unwrap();
        let warnings = validate_course(&course);

        assert!(warnings
            .iter()
            .any(|w| w.lesson == Some(0) && w.message.contains("only 1 option")));
        assert!(warnings
            .iter()
            .any(|w| w.lesson == Some(0) && w.message.contains("not one of the options")));
        assert!(warnings
            .iter()
            .any(|w| w.lesson == Some(1) && w.message.contains("0 placeholder")));
        assert!(warnings
            .iter()
            .any(|w| w.lesson == Some(2) && w.message.contains("cannot form")));
        assert!(warnings
            .iter()
            .any(|w| w.lesson == Some(2) && w.message.contains("content is empty")));
    }
}
