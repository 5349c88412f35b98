//! The `coursecraft generate` command.

use std::path::PathBuf;

use anyhow::Result;

use coursecraft_core::model::CourseDocument;
use coursecraft_core::parser::validate_course;
use coursecraft_core::session::EMPTY_INPUT_MESSAGE;
use coursecraft_providers::load_config_from;

pub async fn execute(
    input: Option<PathBuf>,
    text: Option<String>,
    output: PathBuf,
    provider: Option<String>,
    model: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let content = super::read_source(input.as_deref(), text)?.unwrap_or_default();
    if content.trim().is_empty() {
        anyhow::bail!(EMPTY_INPUT_MESSAGE);
    }

    let config = load_config_from(config_path.as_deref())?;
    let tutor = super::build_tutor(&config, provider.as_deref(), model.as_deref())?;

    eprintln!("Generating with {}/{}...", tutor.provider_name(), tutor.model());
    let course = tutor.generate_course(&content).await?;

    for warning in validate_course(&course) {
        match warning.lesson {
            Some(i) => eprintln!("  [lesson {}] WARNING: {}", i + 1, warning.message),
            None => eprintln!("  WARNING: {}", warning.message),
        }
    }

    println!(
        "Course: {} ({} lessons, {} exercises)",
        course.title,
        course.lesson_count(),
        course.exercise_count()
    );
    let document = CourseDocument::new(course, tutor.provider_name(), tutor.model());
    super::write_json(&output, &document)?;
    println!("Saved to {}", output.display());

    Ok(())
}
