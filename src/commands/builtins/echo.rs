use crate::commands::registry::BuiltinCommand;
use crate::errors::ShellResult;
use crate::history::History;
use std::io::{Read, Write};
use std::sync::Mutex;

pub struct EchoCommand;

impl BuiltinCommand for EchoCommand {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn description(&self) -> &'static str {
        "Echo arguments to the output sink"
    }

    fn execute(
        &self,
        _input: &mut dyn Read,
        out: &mut dyn Write,
        args: &[String],
        _history: &Mutex<History>,
    ) -> ShellResult<()> {
        // Fragments join verbatim; only outer whitespace is trimmed, so
        // quoted interior spacing survives.
        writeln!(out, "{}", args.concat().trim_matches(' '))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn run(args: &[&str]) -> String {
        let history = Mutex::new(History::new());
        let mut out = Vec::new();
        EchoCommand
            .execute(
                &mut io::empty(),
                &mut out,
                &args.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
                &history,
            )
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn joins_fragments_and_appends_newline() {
        assert_eq!(run(&["hello", " ", "world"]), "hello world\n");
    }

    #[test]
    fn trims_outer_whitespace_only() {
        assert_eq!(run(&[" ", "a  b", " "]), "a  b\n");
    }

    #[test]
    fn no_args_prints_bare_newline() {
        assert_eq!(run(&[]), "\n");
    }
}
