//! Grouped rune trie: same structure as [`super::char_trie::CharTrie`], but
//! each terminal carries an integer `group` tag (shell completion columns
//! are populated per slot-group; group `0` means "ungrouped").

use std::collections::HashMap;

#[derive(Debug, Default)]
struct Node {
    children: HashMap<char, Node>,
    is_end_of_word: bool,
    group: u32,
}

#[derive(Debug, Default)]
pub struct GroupedRuneTrie {
    root: Node,
}

impl GroupedRuneTrie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn populate(&mut self, words: &[(&str, u32)]) {
        for (word, group) in words {
            self.insert(word, *group);
        }
    }

    pub fn insert(&mut self, word: &str, group: u32) {
        if word.is_empty() {
            return;
        }
        let mut node = &mut self.root;
        for ch in word.chars() {
            node = node.children.entry(ch).or_default();
        }
        node.is_end_of_word = true;
        node.group = group;
    }

    pub fn delete(&mut self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        let chars: Vec<char> = word.chars().collect();
        Self::delete_helper(&mut self.root, &chars, 0).0
    }

    fn delete_helper(node: &mut Node, word: &[char], index: usize) -> (bool, bool) {
        if index == word.len() {
            if !node.is_end_of_word {
                return (false, false);
            }
            node.is_end_of_word = false;
            return (true, node.children.is_empty());
        }
        let ch = word[index];
        let Some(child) = node.children.get_mut(&ch) else {
            return (false, false);
        };
        let (deleted, should_delete_child) = Self::delete_helper(child, word, index + 1);
        if should_delete_child {
            node.children.remove(&ch);
            return (deleted, node.children.is_empty());
        }
        (deleted, false)
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        if prefix.is_empty() {
            return true;
        }
        self.descend(prefix).is_some()
    }

    fn descend(&self, prefix: &str) -> Option<&Node> {
        let mut node = &self.root;
        for ch in prefix.chars() {
            node = node.children.get(&ch)?;
        }
        Some(node)
    }

    /// Matching words whose terminal carries `group`. `include_prefix`
    /// controls whether the returned words are prefixed with `prefix` or
    /// only the suffix past it.
    pub fn search_prefix(&self, prefix: &str, include_prefix: bool, group: u32) -> Vec<String> {
        if prefix.is_empty() {
            return Vec::new();
        }
        let Some(node) = self.descend(prefix) else {
            return Vec::new();
        };
        let mut words = Vec::new();
        let start = if include_prefix {
            prefix.to_string()
        } else {
            String::new()
        };
        Self::dfs_collect(node, start, group, &mut words);
        words
    }

    pub fn get_all_words(&self, group: u32) -> Vec<String> {
        if self.root.children.is_empty() {
            return Vec::new();
        }
        let mut words = Vec::new();
        Self::dfs_collect(&self.root, String::new(), group, &mut words);
        words
    }

    fn dfs_collect(node: &Node, path: String, group: u32, words: &mut Vec<String>) {
        if node.is_end_of_word && node.group == group {
            words.push(path.clone());
        }
        for (ch, child) in &node.children {
            let mut next = path.clone();
            next.push(*ch);
            Self::dfs_collect(child, next, group, words);
        }
    }

    pub fn fuzzy_search(&self, pattern: &str, group: u32) -> Vec<String> {
        if pattern.is_empty() {
            return Vec::new();
        }
        let pattern: Vec<char> = pattern.chars().collect();
        let mut words = Vec::new();
        Self::fuzzy_dfs(&self.root, &pattern, String::new(), 0, group, &mut words);
        words
    }

    #[allow(clippy::too_many_arguments)]
    fn fuzzy_dfs(
        node: &Node,
        pattern: &[char],
        path: String,
        index: usize,
        group: u32,
        words: &mut Vec<String>,
    ) {
        if index == pattern.len() {
            if node.is_end_of_word && node.group == group {
                words.push(path);
            }
            return;
        }
        match pattern[index] {
            '?' => {
                for (ch, child) in &node.children {
                    let mut next = path.clone();
                    next.push(*ch);
                    Self::fuzzy_dfs(child, pattern, next, index + 1, group, words);
                }
            }
            '*' => {
                Self::fuzzy_dfs(node, pattern, path.clone(), index + 1, group, words);
                for (ch, child) in &node.children {
                    let mut next = path.clone();
                    next.push(*ch);
                    Self::fuzzy_dfs(child, pattern, next, index, group, words);
                }
            }
            ch => {
                if let Some(child) = node.children.get(&ch) {
                    let mut next = path;
                    next.push(ch);
                    Self::fuzzy_dfs(child, pattern, next, index + 1, group, words);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut v: Vec<String>) -> Vec<String> {
        v.sort();
        v
    }

    #[test]
    fn group_zero_is_ungrouped_by_default() {
        let mut trie = GroupedRuneTrie::new();
        trie.insert("local", 0);
        trie.insert("redis", 1);
        assert_eq!(trie.get_all_words(0), vec!["local"]);
        assert_eq!(trie.get_all_words(1), vec!["redis"]);
    }

    #[test]
    fn fuzzy_search_respects_group() {
        let mut trie = GroupedRuneTrie::new();
        trie.insert("cat", 1);
        trie.insert("cot", 2);
        assert_eq!(trie.fuzzy_search("c?t", 1), vec!["cat"]);
        assert_eq!(trie.fuzzy_search("c?t", 2), vec!["cot"]);
    }

    #[test]
    fn search_prefix_include_prefix_toggle() {
        let mut trie = GroupedRuneTrie::new();
        trie.insert("card", 0);
        trie.insert("cart", 0);
        assert_eq!(sorted(trie.search_prefix("car", true, 0)), vec!["card", "cart"]);
        assert_eq!(sorted(trie.search_prefix("car", false, 0)), vec!["d", "t"]);
    }

    #[test]
    fn delete_removes_only_that_word() {
        let mut trie = GroupedRuneTrie::new();
        trie.insert("card", 0);
        trie.insert("cart", 0);
        assert!(trie.delete("card"));
        assert_eq!(trie.get_all_words(0), vec!["cart"]);
    }
}
