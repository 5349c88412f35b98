//! The `coursecraft play` command.

use std::io;
use std::path::PathBuf;

use anyhow::Result;

use coursecraft_core::parser::parse_course_file;
use coursecraft_core::session::Session;

use crate::player::{self, PlayerExit};

pub fn execute(course_path: PathBuf) -> Result<()> {
    let document = parse_course_file(&course_path)?;
    tracing::info!(title = %document.course.title, "playing saved course");

    let stdin = io::stdin();
    let mut lines = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    // Restart replays the same course from the first lesson.
    loop {
        let mut session = Session::new();
        session.load_course(document.course.clone())?;
        match player::run(&mut session, &mut lines, &mut out)? {
            PlayerExit::Quit => return Ok(()),
            PlayerExit::Restart => continue,
        }
    }
}
