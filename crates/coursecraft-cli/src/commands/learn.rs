//! The `coursecraft learn` command.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;

use coursecraft_core::model::CourseDocument;
use coursecraft_core::session::Session;
use coursecraft_providers::load_config_from;

use crate::player::{self, PlayerExit};

pub async fn execute(
    input: Option<PathBuf>,
    text: Option<String>,
    provider: Option<String>,
    model: Option<String>,
    save: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let tutor = super::build_tutor(&config, provider.as_deref(), model.as_deref())?;

    let stdin = io::stdin();
    let mut lines = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut pending = super::read_source(input.as_deref(), text)?;
    loop {
        let content = match pending.take() {
            Some(content) => content,
            None => match prompt_for_content(&mut lines, &mut out)? {
                Some(content) => content,
                None => return Ok(()),
            },
        };

        let mut session = Session::new();
        writeln!(out, "Generating your course...")?;
        out.flush()?;
        tutor.run_generation(&mut session, &content).await?;

        if let (Some(path), Some(course)) = (&save, session.course()) {
            let document = CourseDocument::new(course.clone(), tutor.provider_name(), tutor.model());
            super::write_json(path, &document)?;
            writeln!(out, "Saved course to {}", path.display())?;
        }

        match player::run(&mut session, &mut lines, &mut out)? {
            PlayerExit::Quit => return Ok(()),
            PlayerExit::Restart => continue,
        }
    }
}

/// Read content up to the first blank line. `None` when input has ended.
fn prompt_for_content<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Option<String>> {
    writeln!(out, "Paste the content to learn, then an empty line:")?;
    out.flush()?;
    let mut content = String::new();
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            if content.is_empty() {
                continue;
            }
            break;
        }
        content.push_str(&line);
    }
    if content.is_empty() {
        Ok(None)
    } else {
        Ok(Some(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn content_ends_at_blank_line() {
        let mut input = Cursor::new(b"\nLine one\nLine two\n\nnext\n".to_vec());
        let mut out = Vec::new();
        let content = prompt_for_content(&mut input, &mut out).unwrap();
        assert_eq!(content.as_deref(), Some("Line one\nLine two\n"));

        let mut rest = String::new();
        input.read_line(&mut rest).unwrap();
        assert_eq!(rest, "next\n");
    }

    #[test]
    fn end_of_input_means_no_content() {
        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        assert_eq!(prompt_for_content(&mut input, &mut out).unwrap(), None);
    }
}
