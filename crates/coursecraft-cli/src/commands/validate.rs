//! The `coursecraft validate` command.

use std::path::PathBuf;

use anyhow::Result;

use coursecraft_core::parser::{parse_course_file, validate_course};

pub fn execute(course_path: PathBuf) -> Result<()> {
    let document = parse_course_file(&course_path)?;
    let course = &document.course;
    println!(
        "Course: {} ({} lessons, {} exercises)",
        course.title,
        course.lesson_count(),
        course.exercise_count()
    );

    let warnings = validate_course(course);
    for w in &warnings {
        let prefix = w
            .lesson
            .map(|i| format!("  [lesson {}]", i + 1))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Course is valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
