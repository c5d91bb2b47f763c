use crate::commands::registry::BuiltinCommand;
use crate::errors::ShellResult;
use crate::history::History;
use std::env;
use std::io::{Read, Write};
use std::sync::Mutex;

pub struct PwdCommand;

impl BuiltinCommand for PwdCommand {
    fn name(&self) -> &'static str {
        "pwd"
    }

    fn description(&self) -> &'static str {
        "Print the current working directory"
    }

    fn execute(
        &self,
        _input: &mut dyn Read,
        out: &mut dyn Write,
        _args: &[String],
        _history: &Mutex<History>,
    ) -> ShellResult<()> {
        let current_dir = env::current_dir()?;
        writeln!(out, "{}", current_dir.display())?;
        Ok(())
    }
}
