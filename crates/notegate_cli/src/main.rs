//! Command-line smoke checks for notegate core.
//!
//! # Usage
//! - `notegate_cli` prints ping and version.
//! - `notegate_cli check <file>` runs the body gate on a file.
//! - `notegate_cli list <db>` prints stored notes, newest first.

use notegate_core::db::open_db;
use notegate_core::{format_epoch_millis, validate, NoteService, SqliteNoteRepository};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let outcome = match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] => {
            println!("notegate_core ping={}", notegate_core::ping());
            println!("notegate_core version={}", notegate_core::core_version());
            Ok(true)
        }
        ["check", path] => check(path),
        ["list", path] => list(path),
        _ => Err("usage: notegate_cli [check <file> | list <db>]".to_string()),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::from(2)
        }
    }
}

fn check(path: &str) -> Result<bool, String> {
    let body =
        std::fs::read_to_string(path).map_err(|err| format!("failed to read `{path}`: {err}"))?;
    let result = validate(&body);
    match result.error {
        None => println!("ok"),
        Some(reason) => println!("rejected: {reason}"),
    }
    Ok(result.is_valid)
}

fn list(path: &str) -> Result<bool, String> {
    let conn = open_db(path).map_err(|err| format!("failed to open `{path}`: {err}"))?;
    let repo = SqliteNoteRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let notes = NoteService::new(repo)
        .list_notes()
        .map_err(|err| err.to_string())?;
    for note in notes {
        let date = format_epoch_millis(note.created_at)
            .unwrap_or_else(|| note.created_at.to_string());
        println!("{}\t{}\t{}", note.id, date, note.title);
    }
    Ok(true)
}
