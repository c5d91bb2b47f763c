use std::io::{self, Write};
use std::mem::MaybeUninit;

pub const PROMPT: &str = "$ ";
pub const ERASE_LINE: &str = "\x1b[2K";
pub const BELL: u8 = 0x07;

/// Scoped raw-mode acquisition on stdin. Construction saves the cooked-mode
/// termios and switches to raw; `Drop` restores the saved state, so every
/// exit path through the editor hands the terminal back.
///
/// `suspend`/`resume` bracket pipeline execution, which owns the terminal in
/// cooked mode while the stages run.
pub struct RawModeGuard {
    saved: libc::termios,
}

impl RawModeGuard {
    pub fn new() -> io::Result<Self> {
        let saved = unsafe {
            let mut termios = MaybeUninit::<libc::termios>::uninit();
            if libc::tcgetattr(libc::STDIN_FILENO, termios.as_mut_ptr()) != 0 {
                return Err(io::Error::last_os_error());
            }
            termios.assume_init()
        };

        let guard = Self { saved };
        guard.resume()?;
        Ok(guard)
    }

    /// Re-enter raw mode (initially, and after a pipeline gives the
    /// terminal back).
    pub fn resume(&self) -> io::Result<()> {
        let mut raw = self.saved;
        unsafe {
            libc::cfmakeraw(&mut raw);
            if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw) != 0 {
                return Err(io::Error::last_os_error());
            }
        }
        Ok(())
    }

    /// Restore cooked mode without giving the guard up.
    pub fn suspend(&self) -> io::Result<()> {
        unsafe {
            if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &self.saved) != 0 {
                return Err(io::Error::last_os_error());
            }
        }
        Ok(())
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = self.suspend();
    }
}

/// Write raw bytes to the terminal and flush.
pub fn write_raw(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()
}

/// Erase the current line and repaint prompt + buffer.
pub fn redraw_line(buffer: &str) -> io::Result<()> {
    write_raw(&format!("{}\r{}{}", ERASE_LINE, PROMPT, buffer))
}

pub fn bell() -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(&[BELL])?;
    stdout.flush()
}

/// Print a block of captured output while the terminal is in raw mode:
/// every `\n` becomes `\r\n` and the block always ends on a fresh line.
pub fn print_block(content: &[u8]) -> io::Result<()> {
    if content.is_empty() {
        return Ok(());
    }
    let text = String::from_utf8_lossy(content);
    let mut converted = convert_newlines(&text);
    if !converted.ends_with("\r\n") {
        converted.push_str("\r\n");
    }
    write_raw(&converted)
}

/// Raw-mode newline discipline: the kernel no longer translates `\n`, so
/// captured output needs explicit carriage returns.
pub fn convert_newlines(text: &str) -> String {
    let mut converted = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '\n' {
            converted.push('\r');
        }
        converted.push(ch);
    }
    converted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newline_conversion() {
        assert_eq!(convert_newlines("a\nb\n"), "a\r\nb\r\n");
        assert_eq!(convert_newlines("no newline"), "no newline");
        assert_eq!(convert_newlines(""), "");
    }

    #[test]
    fn conversion_leaves_existing_carriage_returns_alone() {
        // Only bare newlines gain a carriage return; the caller never
        // feeds pre-converted text back through.
        assert_eq!(convert_newlines("\n"), "\r\n");
    }
}
