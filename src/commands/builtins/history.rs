use crate::commands::cli::HistoryArgs;
use crate::commands::registry::BuiltinCommand;
use crate::errors::{ShellError, ShellResult};
use crate::history::{self, History};
use crate::parser::normalize_fragments;
use std::io::{Read, Write};
use std::sync::Mutex;

pub struct HistoryCommand;

impl BuiltinCommand for HistoryCommand {
    fn name(&self) -> &'static str {
        "history"
    }

    fn description(&self) -> &'static str {
        "Display or persist command history"
    }

    fn execute(
        &self,
        _input: &mut dyn Read,
        out: &mut dyn Write,
        args: &[String],
        history: &Mutex<History>,
    ) -> ShellResult<()> {
        let args = normalize_fragments(args);
        let parsed = HistoryArgs::parse_args(&args)
            .map_err(|e| ShellError::InvalidArgument(format!("history: {}", e)))?;

        let mut store = history.lock().expect("history lock poisoned");

        if let Some(path) = parsed.read {
            let lines = history::read_lines(&path)?;
            store.extend(lines);
            return Ok(());
        }

        if let Some(path) = parsed.write {
            history::write_lines(&path, store.entries())?;
            return Ok(());
        }

        if let Some(path) = parsed.append {
            let start = store.append_start_index();
            history::append_lines(&path, &store.entries()[start..])?;
            return Ok(());
        }

        print_entries(out, &store, parsed.limit)?;
        Ok(())
    }
}

/// Entries keep their original 1-based indices even when a limit shows only
/// the tail.
fn print_entries(
    out: &mut dyn Write,
    store: &History,
    limit: Option<usize>,
) -> ShellResult<()> {
    let entries = store.entries();
    let skip = match limit {
        Some(n) if n < entries.len() => entries.len() - n,
        _ => 0,
    };
    for (i, entry) in entries.iter().enumerate().skip(skip) {
        writeln!(out, "\t{} {}", i + 1, entry)?;
    }
    Ok(())
}
