use crate::errors::ShellResult;
use crate::history::History;
use once_cell::sync::Lazy;
use std::io::{Read, Write};
use std::sync::Mutex;

/// Contract every builtin implements.
///
/// Handlers read from `input` and write to `out`, never the controlling
/// terminal, so the same handler works against a capture buffer in a
/// single-stage command and against a pipe endpoint inside a pipeline.
/// `args` is the stage's fragment list with redirections already split off;
/// `history` is the shared store, mutable through the lock.
pub trait BuiltinCommand: Send + Sync {
    /// The command name (e.g. "echo", "cd", "pwd").
    fn name(&self) -> &'static str;

    /// One-line description, surfaced by future `help`-style tooling.
    fn description(&self) -> &'static str;

    fn execute(
        &self,
        input: &mut dyn Read,
        out: &mut dyn Write,
        args: &[String],
        history: &Mutex<History>,
    ) -> ShellResult<()>;

    /// Whether this command should terminate the shell.
    /// Returns Some(exit_code) if so; the editor performs the exit after
    /// restoring the terminal.
    fn exit_code(&self, _args: &[String]) -> Option<i32> {
        None
    }
}

/// Central registry for all builtin commands.
pub struct BuiltinRegistry {
    commands: Vec<Box<dyn BuiltinCommand>>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn register<C: BuiltinCommand + 'static>(&mut self, cmd: C) {
        self.commands.push(Box::new(cmd));
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.commands.iter().any(|c| c.name() == name)
    }

    /// All builtin names, for the completion trie and the `type` builtin.
    pub fn builtin_names(&self) -> Vec<&'static str> {
        self.commands.iter().map(|c| c.name()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&dyn BuiltinCommand> {
        self.commands
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.as_ref())
    }

    /// Exit code if `name` asks the shell to terminate.
    pub fn check_exit(&self, name: &str, args: &[String]) -> Option<i32> {
        self.get(name).and_then(|c| c.exit_code(args))
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Global registry instance. Read-only after construction; handler
/// references borrowed from it are 'static, which is what lets builtin
/// pipeline stages run on their own threads.
pub static BUILTINS: Lazy<BuiltinRegistry> = Lazy::new(|| {
    let mut registry = BuiltinRegistry::new();

    // Single point of registration.
    registry.register(super::builtins::EchoCommand);
    registry.register(super::builtins::ExitCommand);
    registry.register(super::builtins::TypeCommand);
    registry.register(super::builtins::PwdCommand);
    registry.register(super::builtins::CdCommand);
    registry.register(super::builtins::HistoryCommand);

    registry
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_knows_the_six_builtins() {
        for name in ["echo", "exit", "type", "pwd", "cd", "history"] {
            assert!(BUILTINS.is_builtin(name), "missing {name}");
        }
        assert!(!BUILTINS.is_builtin("ls"));
        assert!(!BUILTINS.is_builtin(""));
    }

    #[test]
    fn lookup_returns_the_named_handler() {
        assert_eq!(BUILTINS.get("pwd").unwrap().name(), "pwd");
        assert!(BUILTINS.get("nope").is_none());
    }

    #[test]
    fn only_exit_requests_termination() {
        assert_eq!(BUILTINS.check_exit("exit", &[]), Some(0));
        assert_eq!(BUILTINS.check_exit("echo", &["hi".into()]), None);
    }
}
