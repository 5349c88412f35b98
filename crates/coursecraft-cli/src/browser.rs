//! Interactive catalog browser on top of [`CatalogNavigator`].

use std::io::{BufRead, Write};

use anyhow::Result;

use coursecraft_core::navigator::{CatalogNavigator, CurrentView};
use coursecraft_core::traits::CatalogSource;
use coursecraft_core::tutor::Tutor;

use crate::render;

/// Assist availability: a tutor, or the reason there is none.
pub type Assistant = std::result::Result<Tutor, String>;

fn draw<W: Write>(nav: &CatalogNavigator, out: &mut W) -> Result<()> {
    writeln!(out)?;
    match nav.current() {
        CurrentView::Subjects(frame) => {
            if frame.loading {
                writeln!(out, "Loading subjects...")?;
            } else if let Some(error) = &frame.error {
                writeln!(out, "✘ {error}")?;
                writeln!(out, "Type 'reload' to try again or 'quit' to leave.")?;
            } else {
                let visible = nav.visible_subjects();
                writeln!(out, "Subjects")?;
                if !frame.filter().is_empty() {
                    writeln!(
                        out,
                        "Filter: \"{}\" ({} of {})",
                        frame.filter(),
                        visible.len(),
                        frame.subjects.len()
                    )?;
                }
                if visible.is_empty() {
                    writeln!(out, "No subjects match.")?;
                } else {
                    writeln!(out, "{}", render::subjects_table(&visible))?;
                }
                writeln!(out, "Type a number to open a subject, /text to filter, 'quit' to leave.")?;
            }
        }
        CurrentView::Courses(frame) => {
            writeln!(out, "{} ({})", frame.subject.name, frame.subject.id)?;
            if frame.loading {
                writeln!(out, "Loading courses...")?;
            } else if let Some(error) = &frame.error {
                writeln!(out, "✘ {error}")?;
            } else if frame.courses.is_empty() {
                writeln!(out, "No courses listed.")?;
            } else {
                writeln!(out, "{}", render::courses_table(&frame.courses))?;
            }
            writeln!(out, "Type a number to open a course, 'back' to return, 'quit' to leave.")?;
        }
        CurrentView::Details(frame) => {
            if frame.loading {
                writeln!(out, "Loading course details...")?;
            } else if let Some(error) = &frame.error {
                writeln!(out, "✘ {error}")?;
            } else if let Some(details) = &frame.details {
                writeln!(out, "{}", details.describe())?;
                render::assist("Explanation", &frame.explanation, out)?;
                render::assist("Preparation", &frame.prerequisites, out)?;
            }
            writeln!(out, "Type 'explain', 'prereqs', 'back' or 'quit'.")?;
        }
    }
    Ok(())
}

/// Browse until the user quits or input ends.
pub async fn run<R: BufRead, W: Write>(
    nav: &mut CatalogNavigator,
    source: &dyn CatalogSource,
    assistant: &Assistant,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "Loading subjects...")?;
    nav.load_subjects(source).await?;
    draw(nav, out)?;

    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(());
        }
        let command = line.trim();
        if command.is_empty() {
            continue;
        }

        match command {
            "quit" | "q" | "exit" => return Ok(()),
            "back" => {
                if !nav.back() {
                    writeln!(out, "Already at the subject list.")?;
                    continue;
                }
            }
            "reload" => {
                if let Err(e) = nav.load_subjects(source).await {
                    writeln!(out, "{e}")?;
                    continue;
                }
            }
            "explain" | "prereqs" => {
                let tutor = match assistant {
                    Ok(tutor) => tutor,
                    Err(reason) => {
                        writeln!(out, "AI assist is not available: {reason}")?;
                        continue;
                    }
                };
                writeln!(out, "Asking the tutor...")?;
                let result = if command == "explain" {
                    nav.explain(tutor).await
                } else {
                    nav.suggest_prerequisites(tutor).await
                };
                if let Err(e) = result {
                    writeln!(out, "{e}")?;
                    continue;
                }
            }
            filter if filter.starts_with('/') => {
                nav.set_filter(filter[1..].trim());
            }
            number => {
                let Ok(n) = number.parse::<usize>() else {
                    writeln!(out, "Unrecognized input.")?;
                    continue;
                };
                if let Err(e) = open_entry(nav, source, n).await {
                    writeln!(out, "{e}")?;
                    continue;
                }
            }
        }
        draw(nav, out)?;
    }
}

/// Open the `n`th (1-based) entry listed on the current view.
async fn open_entry(nav: &mut CatalogNavigator, source: &dyn CatalogSource, n: usize) -> Result<()> {
    enum Target {
        Subject(String),
        Course(String),
    }

    let target = match nav.current() {
        CurrentView::Subjects(_) => nav
            .visible_subjects()
            .get(n.wrapping_sub(1))
            .map(|s| Target::Subject(s.id.clone())),
        CurrentView::Courses(frame) => frame
            .courses
            .get(n.wrapping_sub(1))
            .map(|c| Target::Course(c.id.clone())),
        CurrentView::Details(_) => anyhow::bail!("Nothing to open here."),
    };

    match target {
        Some(Target::Subject(id)) => nav.enter_subject(source, &id).await?,
        Some(Target::Course(id)) => nav.enter_course(source, &id).await?,
        None => anyhow::bail!("There is no entry {n}."),
    }
    Ok(())
}
