use crate::commands::registry::{BuiltinCommand, BUILTINS};
use crate::errors::ShellResult;
use crate::history::History;
use crate::resolver;
use std::io::{Read, Write};
use std::sync::Mutex;

pub struct TypeCommand;

impl BuiltinCommand for TypeCommand {
    fn name(&self) -> &'static str {
        "type"
    }

    fn description(&self) -> &'static str {
        "Report how a command name would be resolved"
    }

    fn execute(
        &self,
        _input: &mut dyn Read,
        out: &mut dyn Write,
        args: &[String],
        _history: &Mutex<History>,
    ) -> ShellResult<()> {
        let name = args.concat();
        let name = name.trim_matches(' ');

        if BUILTINS.is_builtin(name) {
            writeln!(out, "{} is a shell builtin", name)?;
            return Ok(());
        }

        match resolver::find_in_path(name) {
            Some(path) => writeln!(out, "{} is {}", name, path.display())?,
            None => writeln!(out, "{}: not found", name)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn run(name: &str) -> String {
        let history = Mutex::new(History::new());
        let mut out = Vec::new();
        TypeCommand
            .execute(
                &mut io::empty(),
                &mut out,
                &[name.to_string()],
                &history,
            )
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn builtins_report_as_builtins() {
        assert_eq!(run("echo"), "echo is a shell builtin\n");
        assert_eq!(run("type"), "type is a shell builtin\n");
    }

    #[test]
    fn unknown_names_report_not_found() {
        assert_eq!(
            run("surely-not-a-command-anywhere"),
            "surely-not-a-command-anywhere: not found\n"
        );
    }
}
