use crate::commands::registry::BUILTINS;
use crate::history::History;
use crate::resolver;
use crate::trie::Trie;
use std::sync::{Arc, Mutex};

/// Process-scoped shell state: the completion trie (read-only once built)
/// and the shared history store. Passed explicitly through the editor loop;
/// builtin pipeline stages clone the history handle onto their threads.
pub struct ShellState {
    pub trie: Trie,
    pub history: Arc<Mutex<History>>,
}

impl ShellState {
    /// Build the state, seeding the trie from the builtin names and every
    /// executable name discovered on PATH. Runs before the first prompt.
    pub fn new() -> Self {
        let mut trie = Trie::new();
        for name in BUILTINS.builtin_names() {
            trie.insert(name);
        }
        for name in resolver::command_basenames() {
            trie.insert(&name);
        }

        Self {
            trie,
            history: Arc::new(Mutex::new(History::new())),
        }
    }
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trie_knows_every_builtin() {
        let state = ShellState::new();
        for name in ["echo", "exit", "type", "pwd", "cd", "history"] {
            assert!(state.trie.search(name), "missing builtin {name}");
        }
    }

    #[test]
    fn history_starts_empty() {
        let state = ShellState::new();
        assert!(state.history.lock().unwrap().is_empty());
    }
}
