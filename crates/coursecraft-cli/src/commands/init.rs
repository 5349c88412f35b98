//! The `coursecraft init` command.

use std::path::Path;

use anyhow::Result;

use coursecraft_core::model::CourseDocument;
use coursecraft_core::parser::parse_course_str;
use coursecraft_providers::mock::SAMPLE_COURSE_JSON;

pub fn execute() -> Result<()> {
    if Path::new("coursecraft.toml").exists() {
        println!("coursecraft.toml already exists, skipping.");
    } else {
        std::fs::write("coursecraft.toml", SAMPLE_CONFIG)?;
        println!("Created coursecraft.toml");
    }

    std::fs::create_dir_all("courses")?;
    let example_path = Path::new("courses/example.json");
    if example_path.exists() {
        println!("courses/example.json already exists, skipping.");
    } else {
        let course = parse_course_str(SAMPLE_COURSE_JSON)?;
        let document = CourseDocument::new(course, "mock", "mock-model");
        super::write_json(example_path, &document)?;
        println!("Created courses/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Export GEMINI_API_KEY or edit coursecraft.toml");
    println!("  2. Run: coursecraft play --course courses/example.json");
    println!("  3. Run: coursecraft learn --input notes.txt");
    println!("  4. Run: coursecraft catalog");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# coursecraft configuration

default_provider = "gemini"
default_model = "gemini-2.5-flash"
default_temperature = 0.7
max_tokens = 8192

[providers.gemini]
type = "gemini"
api_key = "${GEMINI_API_KEY}"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

[providers.anthropic]
type = "anthropic"
api_key = "${ANTHROPIC_API_KEY}"

[providers.ollama]
type = "ollama"
base_url = "http://localhost:11434"

[catalog]
base_url = "https://cora-backend-l4df.onrender.com"
timeout_secs = 30
"#;
