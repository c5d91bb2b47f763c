use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

/// Directories named by the PATH environment variable, in order.
pub fn path_directories() -> Vec<PathBuf> {
    let path = env::var("PATH").unwrap_or_default();
    path.split(':')
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn is_executable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.is_file() && metadata.permissions().mode() & 0o111 != 0
}

/// Look `name` up across every PATH directory at once and take whichever
/// stat answers first. Each directory gets its own thread; the channel is
/// the one-shot winner slot, and dropping the last sender unblocks the
/// receiver when every probe misses.
pub fn find_in_path(name: &str) -> Option<PathBuf> {
    let (tx, rx) = mpsc::channel();

    for dir in path_directories() {
        let tx = tx.clone();
        let candidate = dir.join(name);
        thread::spawn(move || {
            if let Ok(metadata) = fs::metadata(&candidate) {
                if is_executable(&metadata) {
                    // A send after the winner is taken just lands in the
                    // channel buffer and is dropped with it.
                    let _ = tx.send(candidate);
                }
            }
        });
    }
    drop(tx);

    rx.recv().ok()
}

/// Basename of every non-directory entry under every readable PATH
/// directory. Feeds the completion trie at startup.
pub fn command_basenames() -> Vec<String> {
    let mut names = Vec::new();
    for dir in path_directories() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(true);
            if is_dir {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    // PATH is process-global, so the env-mutating tests serialize on a lock.
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    fn make_executable(dir: &std::path::Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[test]
    fn finds_an_executable_on_path() {
        let _guard = ENV_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let expected = make_executable(dir.path(), "mytool");
        env::set_var("PATH", dir.path());

        assert_eq!(find_in_path("mytool"), Some(expected));
    }

    #[test]
    fn misses_resolve_to_none_once_all_probes_finish() {
        let _guard = ENV_LOCK.lock().unwrap();
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        env::set_var(
            "PATH",
            format!("{}:{}", a.path().display(), b.path().display()),
        );

        assert_eq!(find_in_path("no-such-command"), None);
    }

    #[test]
    fn non_executable_files_are_skipped() {
        let _guard = ENV_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data");
        fs::write(&path, "not a program").unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o644);
        fs::set_permissions(&path, perms).unwrap();
        env::set_var("PATH", dir.path());

        assert_eq!(find_in_path("data"), None);
    }

    #[test]
    fn basenames_cover_regular_files_but_not_subdirs() {
        let _guard = ENV_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        make_executable(dir.path(), "prog");
        fs::write(dir.path().join("plain"), "x").unwrap();
        fs::create_dir(dir.path().join("subdir")).unwrap();
        env::set_var("PATH", dir.path());

        let mut names = command_basenames();
        names.sort();
        assert_eq!(names, vec!["plain", "prog"]);
    }

    #[test]
    fn unreadable_path_entries_are_ignored() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("PATH", "/definitely/not/a/dir");
        assert!(command_basenames().is_empty());
        assert_eq!(find_in_path("ls"), None);
    }
}
