use crate::errors::{ShellError, ShellResult};
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

/// Both output channels of a finished child, captured whole.
#[derive(Debug, Default)]
pub struct CapturedOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Spawn an external command and capture stdout and stderr in full.
///
/// Two sibling threads drain the child's pipes; the scope join is the
/// barrier that guarantees both buffers are complete before the caller
/// applies redirections. Stdin is inherited from the shell.
pub fn run_captured(path: &Path, args: &[String]) -> ShellResult<CapturedOutput> {
    let mut child = Command::new(path)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            ShellError::Execution(format!("failed to spawn {}: {}", path.display(), e))
        })?;

    let mut child_stdout = child.stdout.take().expect("stdout was piped");
    let mut child_stderr = child.stderr.take().expect("stderr was piped");

    let mut captured = CapturedOutput::default();
    thread::scope(|scope| {
        let stdout_reader = scope.spawn(move || {
            let mut buf = Vec::new();
            let _ = child_stdout.read_to_end(&mut buf);
            buf
        });
        let stderr_reader = scope.spawn(move || {
            let mut buf = Vec::new();
            let _ = child_stderr.read_to_end(&mut buf);
            buf
        });
        captured.stdout = stdout_reader.join().expect("stdout reader panicked");
        captured.stderr = stderr_reader.join().expect("stderr reader panicked");
    });

    child
        .wait()
        .map_err(|e| ShellError::Execution(format!("wait failed: {}", e)))?;

    Ok(captured)
}
