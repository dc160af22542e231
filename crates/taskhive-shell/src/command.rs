//! Command-line tokenizing, `--flag value` parsing, and binding the parsed
//! flags onto a [`taskhive_shared::task::Task`].
//!
//! The original builds the task by reflecting over the `json` struct tags
//! of its `Task` type field-by-field. Rust has no such reflection, so the
//! binding is a small explicit table instead (the REDESIGN FLAG resolution
//! noted in the design ledger).

use std::collections::HashMap;

use taskhive_shared::task::Task;

/// Splits a raw input line into whitespace-separated tokens, honoring
/// single/double quoting and backslash escapes.
pub fn split_command_line(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut buf = String::new();
    let mut in_quote: Option<char> = None;
    let mut escaped = false;

    for c in input.chars() {
        if escaped {
            buf.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if let Some(q) = in_quote {
            if c == q {
                in_quote = None;
            } else {
                buf.push(c);
            }
        } else if c == '"' || c == '\'' {
            in_quote = Some(c);
        } else if c == ' ' || c == '\t' {
            if !buf.is_empty() {
                args.push(std::mem::take(&mut buf));
            }
        } else {
            buf.push(c);
        }
    }

    if !buf.is_empty() {
        args.push(buf);
    }
    args
}

/// Parses `--key value` pairs out of a line. A `--flag` with no following
/// value (or followed by another `--flag`) maps to an empty string.
pub fn parse_args(line: &str) -> HashMap<String, String> {
    let tokens = split_command_line(line);
    let mut args = HashMap::new();

    let mut i = 0;
    while i < tokens.len() {
        if let Some(key) = tokens[i].strip_prefix("--") {
            let key = key.to_string();
            if i + 1 < tokens.len() && !tokens[i + 1].starts_with("--") {
                args.insert(key, tokens[i + 1].clone());
                i += 1;
            } else {
                args.insert(key, String::new());
            }
        }
        i += 1;
    }
    args
}

#[derive(Debug, thiserror::Error)]
pub enum ParseTaskError {
    #[error("priority parse error: {0}")]
    Priority(#[from] std::num::ParseIntError),
    #[error("payload parse error: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("deadline parse error: {0}")]
    Deadline(#[from] chrono::ParseError),
}

/// Binds parsed `--flag value` pairs onto a [`Task`]. Unknown flags are
/// ignored; missing flags leave the corresponding field at its default.
pub fn parse_task_from_cmd(line: &str) -> Result<Task, ParseTaskError> {
    let args = parse_args(line);

    let task_type = args.get("type").cloned().unwrap_or_default();
    let priority = match args.get("priority") {
        Some(raw) if !raw.is_empty() => raw.parse()?,
        _ => 0,
    };
    let payload = match args.get("payload") {
        Some(raw) if !raw.is_empty() => serde_json::from_str(raw)?,
        _ => serde_json::Value::Null,
    };
    let deadline = match args.get("deadline") {
        Some(raw) if !raw.is_empty() => Some(raw.parse::<chrono::DateTime<chrono::Utc>>()?),
        _ => None,
    };
    let recurring = args
        .get("recurring")
        .map(|raw| raw.is_empty() || raw == "true");

    Ok(Task {
        task_type,
        payload,
        priority,
        deadline,
        recurring,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_respects_quotes_and_escapes() {
        let got = split_command_line(r#"add --payload "{\"a\": 1}" --priority 5"#);
        assert_eq!(
            got,
            vec!["add", "--payload", "{\"a\": 1}", "--priority", "5"]
        );
    }

    #[test]
    fn parse_args_handles_valueless_flags() {
        let args = parse_args("add --recurring --priority 5");
        assert_eq!(args.get("recurring").unwrap(), "");
        assert_eq!(args.get("priority").unwrap(), "5");
    }

    #[test]
    fn parse_task_binds_known_flags() {
        let task = parse_task_from_cmd(
            r#"add --type send_email --priority 3 --payload {"to":"a@b.com"}"#,
        )
        .unwrap();
        assert_eq!(task.task_type, "send_email");
        assert_eq!(task.priority, 3);
        assert_eq!(task.payload["to"], "a@b.com");
        assert_eq!(task.recurring, None);
    }

    #[test]
    fn parse_task_rejects_bad_priority() {
        let err = parse_task_from_cmd("add --type send_email --priority notanumber");
        assert!(err.is_err());
    }
}
