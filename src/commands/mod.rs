pub mod builtins;
pub mod cli;
pub mod external;
pub mod registry;

use crate::errors::{ShellError, ShellResult};
use crate::parser::{normalize_fragments, parse_line, ParsedCommand};
use crate::pipeline::run_pipeline;
use crate::redirection::{self, Redirection, RedirChannel};
use crate::resolver;
use crate::state::ShellState;
use crate::terminal::{self, RawModeGuard};
use external::CapturedOutput;
use registry::BUILTINS;
use std::io;

/// What the editor should do after a committed line ran.
#[derive(Debug, PartialEq, Eq)]
pub enum ExecOutcome {
    Continue,
    Exit(i32),
}

/// Parse and execute one committed line.
///
/// Pipelines take the terminal in cooked mode for their whole run; single
/// stages execute with output captured while the editor keeps raw mode.
pub fn execute_line(
    state: &ShellState,
    term: &RawModeGuard,
    line: &str,
) -> ShellResult<ExecOutcome> {
    let pipeline = parse_line(line);

    if pipeline.stages.is_empty() {
        return Ok(ExecOutcome::Continue);
    }

    if pipeline.has_pipeline() {
        term.suspend()?;
        let result = run_pipeline(&pipeline.stages, state);
        term.resume()?;
        result?;
        return Ok(ExecOutcome::Continue);
    }

    dispatch_single(state, &pipeline.stages[0])
}

fn dispatch_single(state: &ShellState, stage: &ParsedCommand) -> ShellResult<ExecOutcome> {
    let (fragments, redir) = redirection::split_redirection(&stage.fragments)?;

    if BUILTINS.is_builtin(&stage.name) {
        if let Some(code) = BUILTINS.check_exit(&stage.name, &fragments) {
            return Ok(ExecOutcome::Exit(code));
        }

        let buffer = run_builtin_captured(state, &stage.name, &fragments)?;
        let to_print = apply_builtin_redirection(redir.as_ref(), buffer)?;
        terminal::print_block(&to_print)?;
        return Ok(ExecOutcome::Continue);
    }

    let path = resolver::find_in_path(&stage.name)
        .ok_or_else(|| ShellError::CommandNotFound(stage.name.clone()))?;
    let args = normalize_fragments(&fragments);
    let captured = external::run_captured(&path, &args)?;

    let (out_block, err_block) = apply_external_redirection(redir.as_ref(), captured)?;
    terminal::print_block(&out_block)?;
    terminal::print_block(&err_block)?;
    Ok(ExecOutcome::Continue)
}

/// Run a builtin with its output captured into a buffer.
pub fn run_builtin_captured(
    state: &ShellState,
    name: &str,
    fragments: &[String],
) -> ShellResult<Vec<u8>> {
    let handler = BUILTINS
        .get(name)
        .ok_or_else(|| ShellError::CommandNotFound(name.to_string()))?;
    let mut buffer = Vec::new();
    handler.execute(&mut io::empty(), &mut buffer, fragments, &state.history)?;
    Ok(buffer)
}

/// Route a builtin's captured buffer through its redirection, returning
/// whatever should still reach the terminal.
///
/// Builtins never write to stderr, so a stderr redirection only creates or
/// truncates the destination while the buffer prints as usual.
fn apply_builtin_redirection(
    redir: Option<&Redirection>,
    buffer: Vec<u8>,
) -> ShellResult<Vec<u8>> {
    match redir {
        None => Ok(buffer),
        Some(r) if r.channel == RedirChannel::Stdout => {
            redirection::apply(r, &buffer)?;
            Ok(Vec::new())
        }
        Some(r) => {
            redirection::apply(r, b"")?;
            Ok(buffer)
        }
    }
}

/// Route an external command's captured channels: the redirected one goes
/// to the destination file, the other prints.
fn apply_external_redirection(
    redir: Option<&Redirection>,
    captured: CapturedOutput,
) -> ShellResult<(Vec<u8>, Vec<u8>)> {
    match redir {
        None => Ok((captured.stdout, captured.stderr)),
        Some(r) if r.channel == RedirChannel::Stdout => {
            redirection::apply(r, &captured.stdout)?;
            Ok((Vec::new(), captured.stderr))
        }
        Some(r) => {
            redirection::apply(r, &captured.stderr)?;
            Ok((captured.stdout, Vec::new()))
        }
    }
}
