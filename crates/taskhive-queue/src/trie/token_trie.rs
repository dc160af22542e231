//! Token trie: edges are whole tokens (words) rather than characters, used
//! for positional command-grammar completion (e.g. `add --type <?> ...`).

use std::collections::HashMap;

#[derive(Debug, Default)]
struct Node {
    children: HashMap<String, Node>,
    is_end_of_word: bool,
}

#[derive(Debug, Default)]
pub struct TokenTrie {
    root: Node,
}

impl TokenTrie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn populate(&mut self, token_groups: &[Vec<String>]) {
        for tokens in token_groups {
            self.insert(tokens);
        }
    }

    pub fn insert(&mut self, tokens: &[String]) {
        if tokens.is_empty() {
            return;
        }
        let mut node = &mut self.root;
        for tok in tokens {
            node = node.children.entry(tok.clone()).or_default();
        }
        node.is_end_of_word = true;
    }

    pub fn delete(&mut self, tokens: &[String]) -> bool {
        if tokens.is_empty() {
            return false;
        }
        Self::delete_helper(&mut self.root, tokens, 0).0
    }

    fn delete_helper(node: &mut Node, tokens: &[String], index: usize) -> (bool, bool) {
        if index == tokens.len() {
            if !node.is_end_of_word {
                return (false, false);
            }
            node.is_end_of_word = false;
            return (true, node.children.is_empty());
        }
        let tok = &tokens[index];
        let Some(child) = node.children.get_mut(tok) else {
            return (false, false);
        };
        let (deleted, should_delete_child) = Self::delete_helper(child, tokens, index + 1);
        if should_delete_child {
            node.children.remove(tok);
            return (deleted, node.children.is_empty());
        }
        (deleted, false)
    }

    pub fn starts_with(&self, tokens: &[String]) -> bool {
        if tokens.is_empty() {
            return true;
        }
        self.descend(tokens).is_some()
    }

    fn descend(&self, tokens: &[String]) -> Option<&Node> {
        let mut node = &self.root;
        for tok in tokens {
            node = node.children.get(tok)?;
        }
        Some(node)
    }

    pub fn search_prefix(&self, tokens: &[String], include_prefix: bool) -> Vec<String> {
        if tokens.is_empty() {
            return Vec::new();
        }
        let Some(node) = self.descend(tokens) else {
            return Vec::new();
        };
        let mut words = Vec::new();
        let start: Vec<String> = if include_prefix {
            tokens.to_vec()
        } else {
            Vec::new()
        };
        Self::dfs_collect(node, start, &mut words);
        words
    }

    pub fn get_all_words(&self) -> Vec<String> {
        if self.root.children.is_empty() {
            return Vec::new();
        }
        let mut words = Vec::new();
        Self::dfs_collect(&self.root, Vec::new(), &mut words);
        words
    }

    /// The set of tokens that can legally follow the given token prefix —
    /// the next-token suggestions a shell completion needs, without
    /// descending all the way to full leaf words.
    pub fn next_tokens(&self, tokens: &[String]) -> Vec<String> {
        match self.descend(tokens) {
            Some(node) => node.children.keys().cloned().collect(),
            None => Vec::new(),
        }
    }

    fn dfs_collect(node: &Node, path: Vec<String>, words: &mut Vec<String>) {
        if node.is_end_of_word {
            words.push(path.join(" "));
        }
        for (tok, child) in &node.children {
            let mut next = path.clone();
            next.push(tok.clone());
            Self::dfs_collect(child, next, words);
        }
    }

    pub fn fuzzy_search(&self, pattern: &[String]) -> Vec<String> {
        if pattern.is_empty() {
            return Vec::new();
        }
        let mut words = Vec::new();
        Self::fuzzy_dfs(&self.root, pattern, Vec::new(), 0, &mut words);
        words
    }

    fn fuzzy_dfs(node: &Node, pattern: &[String], path: Vec<String>, index: usize, words: &mut Vec<String>) {
        if index == pattern.len() {
            if node.is_end_of_word {
                words.push(path.join(" "));
            }
            return;
        }
        match pattern[index].as_str() {
            "?" => {
                for (tok, child) in &node.children {
                    let mut next = path.clone();
                    next.push(tok.clone());
                    Self::fuzzy_dfs(child, pattern, next, index + 1, words);
                }
            }
            "*" => {
                Self::fuzzy_dfs(node, pattern, path.clone(), index + 1, words);
                for (tok, child) in &node.children {
                    let mut next = path.clone();
                    next.push(tok.clone());
                    Self::fuzzy_dfs(child, pattern, next, index, words);
                }
            }
            tok_str => {
                if let Some(child) = node.children.get(tok_str) {
                    let mut next = path;
                    next.push(tok_str.to_string());
                    Self::fuzzy_dfs(child, pattern, next, index + 1, words);
                }
            }
        }
    }
}
