use crate::commands::registry::{BuiltinCommand, BUILTINS};
use crate::errors::{ShellError, ShellResult};
use crate::history::History;
use crate::parser::{normalize_fragments, ParsedCommand};
use crate::resolver;
use crate::state::ShellState;
use std::fs::File;
use std::io::{self, Read, Write};
use std::os::unix::io::FromRawFd;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;

/// Anonymous OS pipe as a pair of owned files: (read end, write end).
/// Ownership is the close discipline: whoever holds an end drops it, and
/// EOF propagates once every write end is gone.
///
/// Both fds carry O_CLOEXEC so an earlier stage's fork never duplicates a
/// later stage's still-unwired ends into its child; spawn's dup2 onto fd
/// 0/1 clears the flag on exactly the two ends a stage hands its child.
fn os_pipe() -> io::Result<(File, File)> {
    let mut fds = [0; 2];
    if unsafe { libc::pipe2(fds.as_mut_ptr(), libc::O_CLOEXEC) } != 0 {
        return Err(io::Error::last_os_error());
    }
    unsafe { Ok((File::from_raw_fd(fds[0]), File::from_raw_fd(fds[1]))) }
}

/// One pipeline stage. Both variants expose the same wiring surface:
/// assign endpoints, start, wait.
enum Stage {
    External(ExternalStage),
    Builtin(BuiltinStage),
}

impl Stage {
    fn set_stdin(&mut self, file: File) {
        match self {
            Stage::External(s) => s.stdin = Some(file),
            Stage::Builtin(s) => s.stdin = Some(file),
        }
    }

    fn set_stdout(&mut self, file: File) {
        match self {
            Stage::External(s) => s.stdout = Some(file),
            Stage::Builtin(s) => s.stdout = Some(file),
        }
    }

    fn start(&mut self) -> ShellResult<()> {
        match self {
            Stage::External(s) => s.start(),
            Stage::Builtin(s) => s.start(),
        }
    }

    fn wait(&mut self) -> ShellResult<()> {
        match self {
            Stage::External(s) => s.wait(),
            Stage::Builtin(s) => s.wait(),
        }
    }
}

/// External command: a spawned child process. Unassigned endpoints inherit
/// the shell's own stdio.
struct ExternalStage {
    path: PathBuf,
    args: Vec<String>,
    stdin: Option<File>,
    stdout: Option<File>,
    child: Option<Child>,
}

impl ExternalStage {
    fn new(path: PathBuf, args: Vec<String>) -> Self {
        Self {
            path,
            args,
            stdin: None,
            stdout: None,
            child: None,
        }
    }

    fn start(&mut self) -> ShellResult<()> {
        let mut command = Command::new(&self.path);
        command.args(&self.args);
        match self.stdin.take() {
            Some(file) => command.stdin(Stdio::from(file)),
            None => command.stdin(Stdio::inherit()),
        };
        match self.stdout.take() {
            Some(file) => command.stdout(Stdio::from(file)),
            None => command.stdout(Stdio::inherit()),
        };
        command.stderr(Stdio::inherit());

        let child = command.spawn().map_err(|e| {
            ShellError::Execution(format!("failed to spawn {}: {}", self.path.display(), e))
        })?;
        self.child = Some(child);
        // Dropping `command` here releases the parent's copies of the pipe
        // ends the child inherited.
        Ok(())
    }

    fn wait(&mut self) -> ShellResult<()> {
        if let Some(mut child) = self.child.take() {
            child
                .wait()
                .map_err(|e| ShellError::Execution(format!("wait failed: {}", e)))?;
        }
        Ok(())
    }
}

/// Builtin command run cooperatively on its own thread so its writes flow
/// through the pipe like any other stage. Completion comes back through a
/// one-shot channel; `wait` takes that value.
struct BuiltinStage {
    handler: &'static dyn BuiltinCommand,
    args: Vec<String>,
    stdin: Option<File>,
    stdout: Option<File>,
    history: Arc<Mutex<History>>,
    done: Option<Receiver<ShellResult<()>>>,
}

impl BuiltinStage {
    fn new(
        handler: &'static dyn BuiltinCommand,
        args: Vec<String>,
        history: Arc<Mutex<History>>,
    ) -> Self {
        Self {
            handler,
            args,
            stdin: None,
            stdout: None,
            history,
            done: None,
        }
    }

    fn start(&mut self) -> ShellResult<()> {
        let (tx, rx) = mpsc::sync_channel(1);
        self.done = Some(rx);

        let handler = self.handler;
        let args = std::mem::take(&mut self.args);
        let stdin = self.stdin.take();
        let stdout = self.stdout.take();
        let history = Arc::clone(&self.history);

        thread::spawn(move || {
            let mut input: Box<dyn Read> = match stdin {
                Some(file) => Box::new(file),
                None => Box::new(io::stdin()),
            };
            let mut out: Box<dyn Write> = match stdout {
                Some(file) => Box::new(file),
                None => Box::new(io::stdout()),
            };

            let mut result = handler.execute(&mut *input, &mut *out, &args, &history);
            if result.is_ok() {
                result = out.flush().map_err(ShellError::Io);
            }
            let _ = tx.send(result);
            // `out` drops here; a pipe endpoint closing is what lets the
            // downstream stage see EOF.
        });
        Ok(())
    }

    fn wait(&mut self) -> ShellResult<()> {
        match self.done.take() {
            Some(rx) => rx
                .recv()
                .unwrap_or_else(|_| Err(ShellError::Execution("builtin stage died".into()))),
            None => Ok(()),
        }
    }
}

/// Wire N parsed stages with N-1 pipes and run them to completion.
///
/// Stage 0 reads the shell's stdin, the last stage writes the shell's
/// stdout, and every interior boundary is an OS pipe. The caller has
/// already put the terminal back into cooked mode.
pub fn run_pipeline(stages: &[ParsedCommand], state: &ShellState) -> ShellResult<()> {
    let mut wired: Vec<Stage> = Vec::with_capacity(stages.len());
    for parsed in stages {
        wired.push(build_stage(parsed, state)?);
    }
    run_stages(wired)
}

fn run_stages(mut wired: Vec<Stage>) -> ShellResult<()> {
    for i in 0..wired.len().saturating_sub(1) {
        let (read_end, write_end) = os_pipe()?;
        wired[i].set_stdout(write_end);
        wired[i + 1].set_stdin(read_end);
    }

    // Starting a stage moves its pipe ends to the child (external) or its
    // thread (builtin); nothing lingers in the parent to hold off EOF.
    for stage in &mut wired {
        stage.start()?;
    }

    // Exit statuses are collected but carry no meaning here; the pipeline
    // is done when every stage has been waited on.
    for stage in &mut wired {
        let _ = stage.wait();
    }
    Ok(())
}

fn build_stage(parsed: &ParsedCommand, state: &ShellState) -> ShellResult<Stage> {
    if let Some(handler) = BUILTINS.get(&parsed.name) {
        return Ok(Stage::Builtin(BuiltinStage::new(
            handler,
            parsed.fragments.clone(),
            Arc::clone(&state.history),
        )));
    }

    let path = resolver::find_in_path(&parsed.name)
        .ok_or_else(|| ShellError::CommandNotFound(parsed.name.clone()))?;
    Ok(Stage::External(ExternalStage::new(
        path,
        normalize_fragments(&parsed.fragments),
    )))
}
