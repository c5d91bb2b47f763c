use crate::commands::{execute_line, ExecOutcome};
use crate::errors::ShellResult;
use crate::state::ShellState;
use crate::terminal::{self, RawModeGuard, PROMPT};
use crate::trie::{longest_common_prefix, Trie};
use std::io::{self, Read};

const CTRL_C: u8 = 3;
const TAB: u8 = b'\t';
const BACKSPACE: u8 = 127;
const ESC: u8 = 27;

/// Completion only engages once the buffer has this many bytes.
const COMPLETION_THRESHOLD: usize = 3;

/// What a Tab press should do, decided separately from the terminal so the
/// protocol is testable without one.
#[derive(Debug, PartialEq, Eq)]
enum TabOutcome {
    TooShort,
    NoMatch,
    Single(String),
    Extend(String),
    Ambiguous(Vec<String>),
}

fn completion_outcome(trie: &Trie, buffer: &str) -> TabOutcome {
    if buffer.len() < COMPLETION_THRESHOLD {
        return TabOutcome::TooShort;
    }

    let mut matches = trie.prefix_search(buffer);
    match matches.len() {
        0 => TabOutcome::NoMatch,
        1 => TabOutcome::Single(matches.remove(0)),
        _ => {
            let lcp = longest_common_prefix(&matches);
            if lcp.len() > buffer.len() {
                TabOutcome::Extend(lcp)
            } else {
                matches.sort();
                TabOutcome::Ambiguous(matches)
            }
        }
    }
}

/// Raw-mode prompt loop. Reads up to three bytes per wakeup so arrow-key
/// escape sequences arrive whole; everything else is handled byte by byte.
/// Returns the shell's exit code once the user leaves.
pub fn run(state: &ShellState, term: &RawModeGuard) -> ShellResult<i32> {
    let mut stdin = io::stdin().lock();
    let mut buffer = String::new();
    let mut tab_pending = false;

    terminal::write_raw(PROMPT)?;

    loop {
        let mut bytes = [0u8; 3];
        let n = stdin.read(&mut bytes)?;
        if n == 0 {
            // Stdin closed under us; leave like Ctrl+C does.
            terminal::write_raw("\r\nexit\r\n")?;
            return Ok(0);
        }

        if bytes[0] == ESC {
            if n == 3 && bytes[1] == b'[' {
                match bytes[2] {
                    b'A' => recall_previous(state, &mut buffer)?,
                    b'B' => recall_next(state, &mut buffer)?,
                    _ => {}
                }
            }
            tab_pending = false;
            continue;
        }

        for &byte in &bytes[..n] {
            match byte {
                CTRL_C => {
                    terminal::write_raw("\r\nexit\r\n")?;
                    return Ok(0);
                }
                b'\r' | b'\n' => {
                    if let Some(code) = commit(state, term, &mut buffer)? {
                        return Ok(code);
                    }
                    tab_pending = false;
                }
                TAB => {
                    tab_pending = handle_tab(state, &mut buffer, tab_pending)?;
                }
                BACKSPACE => {
                    if buffer.pop().is_some() {
                        terminal::redraw_line(&buffer)?;
                    }
                    tab_pending = false;
                }
                32..=126 => {
                    buffer.push(byte as char);
                    terminal::write_raw(&(byte as char).to_string())?;
                    tab_pending = false;
                }
                // Ignored bytes still count as "not Tab" for the latch.
                _ => tab_pending = false,
            }
        }
    }
}

/// Commit the buffer: record it, run it, repaint the prompt. A Some return
/// carries the shell's exit code.
fn commit(
    state: &ShellState,
    term: &RawModeGuard,
    buffer: &mut String,
) -> ShellResult<Option<i32>> {
    terminal::write_raw("\r\n")?;
    let line = std::mem::take(buffer);
    if line.is_empty() {
        terminal::write_raw(PROMPT)?;
        return Ok(None);
    }

    // The line enters history before anything executes.
    state.history.lock().expect("history lock poisoned").push(&line);

    match execute_line(state, term, &line) {
        Ok(ExecOutcome::Exit(code)) => return Ok(Some(code)),
        Ok(ExecOutcome::Continue) => {}
        Err(e) if e.is_fatal() => return Err(e),
        Err(e) => terminal::print_block(e.to_string().as_bytes())?,
    }

    terminal::write_raw(PROMPT)?;
    Ok(None)
}

fn handle_tab(
    state: &ShellState,
    buffer: &mut String,
    tab_pending: bool,
) -> ShellResult<bool> {
    match completion_outcome(&state.trie, buffer) {
        TabOutcome::TooShort => Ok(false),
        TabOutcome::NoMatch => {
            terminal::bell()?;
            Ok(false)
        }
        TabOutcome::Single(word) => {
            *buffer = format!("{} ", word);
            terminal::redraw_line(buffer)?;
            Ok(false)
        }
        TabOutcome::Extend(lcp) => {
            *buffer = lcp;
            terminal::redraw_line(buffer)?;
            Ok(false)
        }
        TabOutcome::Ambiguous(matches) => {
            if tab_pending {
                terminal::write_raw(&format!(
                    "\r\n{}\r\n{}{}",
                    matches.join("  "),
                    PROMPT,
                    buffer
                ))?;
                Ok(false)
            } else {
                terminal::bell()?;
                Ok(true)
            }
        }
    }
}

fn recall_previous(state: &ShellState, buffer: &mut String) -> ShellResult<()> {
    let entry = {
        let mut history = state.history.lock().expect("history lock poisoned");
        history.previous().map(str::to_string)
    };
    if let Some(entry) = entry {
        *buffer = entry;
        terminal::redraw_line(buffer)?;
    }
    Ok(())
}

fn recall_next(state: &ShellState, buffer: &mut String) -> ShellResult<()> {
    let entry = {
        let mut history = state.history.lock().expect("history lock poisoned");
        history.next_entry().map(str::to_string)
    };
    if let Some(entry) = entry {
        *buffer = entry;
        terminal::redraw_line(buffer)?;
    }
    Ok(())
}
