//! Default command-grammar token groups used to seed the shell's completion
//! tries, ported from the original's `tokens.go`.

pub fn default_token_groups() -> Vec<Vec<String>> {
    [
        ["send", "email"].as_slice(),
        ["send", "file"].as_slice(),
        ["set", "name"].as_slice(),
        ["set", "password"].as_slice(),
        ["run", "script"].as_slice(),
        ["run", "executable"].as_slice(),
        ["start", "command", "workers"].as_slice(),
        ["start", "command", "redis"].as_slice(),
    ]
    .iter()
    .map(|row| row.iter().map(|s| s.to_string()).collect())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_groups_match_expected_shape() {
        let groups = default_token_groups();
        assert_eq!(groups.len(), 8);
        assert_eq!(groups[0], vec!["send", "email"]);
        assert_eq!(groups[6], vec!["start", "command", "workers"]);
    }
}
