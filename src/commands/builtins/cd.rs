use crate::commands::registry::BuiltinCommand;
use crate::errors::{ShellError, ShellResult};
use crate::history::History;
use std::env;
use std::fs;
use std::io::{Read, Write};
use std::sync::Mutex;

pub struct CdCommand;

impl BuiltinCommand for CdCommand {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn description(&self) -> &'static str {
        "Change the current working directory"
    }

    fn execute(
        &self,
        _input: &mut dyn Read,
        out: &mut dyn Write,
        args: &[String],
        _history: &Mutex<History>,
    ) -> ShellResult<()> {
        let path = args.concat();
        let path = path.trim_matches(' ');

        if path == "~" {
            let home = env::var("HOME")
                .map_err(|_| ShellError::Execution("HOME is not set".to_string()))?;
            env::set_current_dir(&home)
                .map_err(|e| ShellError::Execution(format!("cannot enter {}: {}", home, e)))?;
            return Ok(());
        }

        // A missing target is conversational, not fatal.
        if fs::metadata(path).is_err() {
            writeln!(out, "cd: {}: No such file or directory", path)?;
            return Ok(());
        }

        env::set_current_dir(path)
            .map_err(|e| ShellError::Execution(format!("cannot enter {}: {}", path, e)))?;
        Ok(())
    }
}
