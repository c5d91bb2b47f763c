use crate::commands::registry::BuiltinCommand;
use crate::errors::ShellResult;
use crate::history::History;
use std::io::{Read, Write};
use std::sync::Mutex;

pub struct ExitCommand;

impl BuiltinCommand for ExitCommand {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn description(&self) -> &'static str {
        "Exit the shell"
    }

    fn execute(
        &self,
        _input: &mut dyn Read,
        _out: &mut dyn Write,
        _args: &[String],
        _history: &Mutex<History>,
    ) -> ShellResult<()> {
        // Termination goes through exit_code() so the editor restores the
        // terminal first. Inside a pipeline the handler is inert.
        Ok(())
    }

    fn exit_code(&self, args: &[String]) -> Option<i32> {
        let code = args.concat();
        let code = code.trim_matches(' ');
        if code.is_empty() || code == "0" {
            Some(0)
        } else {
            Some(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_is_zero() {
        assert_eq!(ExitCommand.exit_code(&[]), Some(0));
        assert_eq!(ExitCommand.exit_code(&args(&["0"])), Some(0));
    }

    #[test]
    fn anything_else_is_one() {
        assert_eq!(ExitCommand.exit_code(&args(&["1"])), Some(1));
        assert_eq!(ExitCommand.exit_code(&args(&["banana"])), Some(1));
    }
}
