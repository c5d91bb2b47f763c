pub mod commands;
pub mod editor;
pub mod errors;
pub mod history;
pub mod lexer;
pub mod parser;
pub mod pipeline;
pub mod redirection;
pub mod resolver;
pub mod state;
pub mod terminal;
pub mod trie;

use errors::ShellResult;
use state::ShellState;
use terminal::RawModeGuard;

/// Build the shell state, take the terminal into raw mode and drive the
/// prompt loop until the user exits. The returned value is the process
/// exit code; the raw-mode guard restores cooked mode on every path out,
/// including the error one.
pub fn run_shell() -> ShellResult<i32> {
    let state = ShellState::new();
    let term = RawModeGuard::new()?;
    editor::run(&state, &term)
}
