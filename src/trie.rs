use std::collections::HashMap;

/// One node of the completion trie. A set terminal marker means an inserted
/// word ends exactly here.
#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<char, TrieNode>,
    terminal: bool,
}

/// Prefix tree over command names. Built once at startup from the builtin
/// names and the executables discovered on PATH, read-only afterwards.
#[derive(Debug, Default)]
pub struct Trie {
    root: TrieNode,
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, word: &str) {
        let mut current = &mut self.root;
        for ch in word.chars() {
            current = current.children.entry(ch).or_default();
        }
        current.terminal = true;
    }

    pub fn search(&self, word: &str) -> bool {
        match self.walk(word) {
            Some(node) => node.terminal,
            None => false,
        }
    }

    /// Every inserted word starting with `prefix`, in no particular order.
    /// Callers that display the result sort it first.
    pub fn prefix_search(&self, prefix: &str) -> Vec<String> {
        let Some(start) = self.walk(prefix) else {
            return Vec::new();
        };

        // Iterative DFS keeps the walk bounded regardless of word length.
        let mut found = Vec::new();
        let mut stack = vec![(start, prefix.to_string())];
        while let Some((node, word)) = stack.pop() {
            if node.terminal {
                found.push(word.clone());
            }
            for (ch, child) in &node.children {
                let mut next = word.clone();
                next.push(*ch);
                stack.push((child, next));
            }
        }
        found
    }

    fn walk(&self, word: &str) -> Option<&TrieNode> {
        let mut current = &self.root;
        for ch in word.chars() {
            current = current.children.get(&ch)?;
        }
        Some(current)
    }
}

/// Longest string that is a prefix of every candidate, computed character by
/// character over the shortest one.
pub fn longest_common_prefix(words: &[String]) -> String {
    let Some(shortest) = words.iter().min_by_key(|w| w.chars().count()) else {
        return String::new();
    };

    let mut lcp = String::new();
    for (i, ch) in shortest.chars().enumerate() {
        if words.iter().all(|w| w.chars().nth(i) == Some(ch)) {
            lcp.push(ch);
        } else {
            break;
        }
    }
    lcp
}
