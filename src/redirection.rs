use crate::errors::{ShellError, ShellResult};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Replace truncates, append extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirAction {
    Replace,
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirChannel {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub action: RedirAction,
    pub channel: RedirChannel,
    pub destination: String,
}

/// Scan a stage's fragment list for the first redirection operator.
///
/// Fragments before it stay the command's arguments; everything after joins
/// into the destination path. Operators only match as whole fragments, which
/// is why the scan runs before whitespace markers are collapsed.
pub fn split_redirection(
    fragments: &[String],
) -> ShellResult<(Vec<String>, Option<Redirection>)> {
    for (i, fragment) in fragments.iter().enumerate() {
        let (action, channel) = match fragment.as_str() {
            ">" | "1>" => (RedirAction::Replace, RedirChannel::Stdout),
            "2>" => (RedirAction::Replace, RedirChannel::Stderr),
            ">>" | "1>>" => (RedirAction::Append, RedirChannel::Stdout),
            "2>>" => (RedirAction::Append, RedirChannel::Stderr),
            _ => continue,
        };

        if i + 1 >= fragments.len() {
            return Err(ShellError::InvalidDestination);
        }
        let destination = fragments[i + 1..].concat().trim_matches(' ').to_string();
        if destination.is_empty() {
            return Err(ShellError::InvalidDestination);
        }

        return Ok((
            fragments[..i].to_vec(),
            Some(Redirection {
                action,
                channel,
                destination,
            }),
        ));
    }
    Ok((fragments.to_vec(), None))
}

/// Create or truncate the destination and write the content verbatim.
pub fn write_replace(destination: &str, content: &[u8]) -> ShellResult<()> {
    let mut file = open_destination(destination, RedirAction::Replace)?;
    file.write_all(content)?;
    Ok(())
}

/// Append to the destination. Trailing newlines on the new content are
/// stripped first; a non-empty destination gets one separator newline before
/// the new content. Appending nothing only ensures the file exists.
pub fn write_append(destination: &str, content: &[u8]) -> ShellResult<()> {
    let stripped = strip_trailing_newlines(content);
    let existing_len = Path::new(destination)
        .metadata()
        .map(|m| m.len())
        .unwrap_or(0);

    let mut file = open_destination(destination, RedirAction::Append)?;
    if stripped.is_empty() {
        return Ok(());
    }
    if existing_len > 0 {
        file.write_all(b"\n")?;
    }
    file.write_all(stripped)?;
    Ok(())
}

/// Dispatch on the redirection's action.
pub fn apply(redirection: &Redirection, content: &[u8]) -> ShellResult<()> {
    match redirection.action {
        RedirAction::Replace => write_replace(&redirection.destination, content),
        RedirAction::Append => write_append(&redirection.destination, content),
    }
}

fn open_destination(destination: &str, action: RedirAction) -> ShellResult<std::fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(action == RedirAction::Replace)
        .append(action == RedirAction::Append)
        .mode(0o644)
        .open(destination)
        .map_err(ShellError::Io)
}

fn strip_trailing_newlines(content: &[u8]) -> &[u8] {
    let mut end = content.len();
    while end > 0 && (content[end - 1] == b'\n' || content[end - 1] == b'\r') {
        end -= 1;
    }
    &content[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn frags(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_operator_means_no_redirection() {
        let (args, redir) = split_redirection(&frags(&["hello", " ", "world"])).unwrap();
        assert_eq!(args, vec!["hello", " ", "world"]);
        assert!(redir.is_none());
    }

    #[test]
    fn replace_stdout_variants() {
        for op in [">", "1>"] {
            let (args, redir) =
                split_redirection(&frags(&["a", " ", op, " ", "out"])).unwrap();
            let redir = redir.unwrap();
            assert_eq!(args, vec!["a", " "]);
            assert_eq!(redir.action, RedirAction::Replace);
            assert_eq!(redir.channel, RedirChannel::Stdout);
            assert_eq!(redir.destination, "out");
        }
    }

    #[test]
    fn append_and_stderr_variants() {
        let (_, redir) = split_redirection(&frags(&["2>", " ", "err"])).unwrap();
        let redir = redir.unwrap();
        assert_eq!(redir.action, RedirAction::Replace);
        assert_eq!(redir.channel, RedirChannel::Stderr);

        let (_, redir) = split_redirection(&frags(&["2>>", " ", "err"])).unwrap();
        let redir = redir.unwrap();
        assert_eq!(redir.action, RedirAction::Append);
        assert_eq!(redir.channel, RedirChannel::Stderr);

        let (_, redir) = split_redirection(&frags(&[">>", " ", "log"])).unwrap();
        assert_eq!(redir.unwrap().action, RedirAction::Append);
    }

    #[test]
    fn destination_joins_and_trims_fragments() {
        let (_, redir) =
            split_redirection(&frags(&[">", " ", "/", "tmp", "/", "out", ".", "txt"]))
                .unwrap();
        assert_eq!(redir.unwrap().destination, "/tmp/out.txt");
    }

    #[test]
    fn missing_destination_is_a_parse_error() {
        let err = split_redirection(&frags(&["a", " ", ">"])).unwrap_err();
        assert!(matches!(err, ShellError::InvalidDestination));

        let err = split_redirection(&frags(&[">", " "])).unwrap_err();
        assert!(matches!(err, ShellError::InvalidDestination));
    }

    #[test]
    fn only_the_first_operator_counts() {
        let (args, redir) =
            split_redirection(&frags(&[">", " ", "a", " ", ">", " ", "b"])).unwrap();
        assert!(args.is_empty());
        // Everything after the first operator is destination text.
        assert_eq!(redir.unwrap().destination, "a > b");
    }

    #[test]
    fn replace_truncates_existing_content() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();
        fs::write(path, "old content").unwrap();

        write_replace(path, b"hi\n").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"hi\n");
    }

    #[test]
    fn append_inserts_separator_for_non_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();

        write_append(path, b"first\n").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"first");

        write_append(path, b"second\n").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"first\nsecond");
    }

    #[test]
    fn appending_nothing_creates_but_does_not_modify() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log");
        let path = path.to_str().unwrap();

        write_append(path, b"").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"");

        fs::write(path, "kept").unwrap();
        write_append(path, b"\n\n").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"kept");
    }
}
