//! The interactive shell: raw-mode key handling, cursor-aware line editing,
//! dual-trie tab completion, and command history, ported from the
//! original's `Shell`.

use std::io::{self, Read, Write};
use std::sync::Arc;

use taskhive_ingress::Backend;
use taskhive_queue::trie::{GroupedRuneTrie, TokenTrie};
use taskhive_shared::task::InternalTask;
use tracing::info;

use crate::ansi::*;
use crate::command::parse_task_from_cmd;
use crate::history::{RingBuffer, HISTORY_CAPACITY};

const PROMPT: &str = "taskhive> ";
const CONTINUATION_PROMPT: &str = "...> ";

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("failed to enter raw mode: {0}")]
    RawModeEnable(#[source] io::Error),
    #[error("failed to restore terminal mode: {0}")]
    RawModeDisable(#[source] io::Error),
    #[error("stdin read error: {0}")]
    Read(#[source] io::Error),
}

pub struct Shell {
    input: Vec<u8>,
    cursor_pos: usize,
    is_changed_input: bool,
    last_suggestions_printed: usize,

    // Rendering state from the previous `redraw`, so the next one knows how
    // much to erase and where the hardware cursor currently sits relative
    // to the start of the rendered block.
    last_cursor_row: usize,

    token_trie: TokenTrie,
    rune_trie: GroupedRuneTrie,
    history: RingBuffer,

    backend: Arc<dyn Backend>,
    runtime: tokio::runtime::Handle,
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("input", &self.input)
            .field("cursor_pos", &self.cursor_pos)
            .finish_non_exhaustive()
    }
}

impl Shell {
    pub fn new(backend: Arc<dyn Backend>, runtime: tokio::runtime::Handle) -> Self {
        Self {
            input: Vec::with_capacity(256),
            cursor_pos: 0,
            is_changed_input: true,
            last_suggestions_printed: 0,
            last_cursor_row: 0,
            token_trie: TokenTrie::new(),
            rune_trie: GroupedRuneTrie::new(),
            history: RingBuffer::new(HISTORY_CAPACITY),
            backend,
            runtime,
        }
    }

    /// Removes the byte immediately before the cursor. Returns `false` if
    /// the cursor is already at the start of the buffer.
    fn erase_character(&mut self) -> bool {
        if self.cursor_pos == 0 {
            return false;
        }
        self.input.remove(self.cursor_pos - 1);
        self.cursor_pos -= 1;
        true
    }

    fn print_suggestions(&mut self, suggestions: &[String]) {
        if suggestions.is_empty() {
            return;
        }
        let mut out = io::stdout();
        let _ = out.write_all(SAVE_CURSOR_POS);
        let _ = out.write_all(MOVE_CURSOR_DOWN_LEFT);
        let _ = out.write_all(DIM_TEXT);
        for s in suggestions {
            let _ = writeln!(out, "{s}");
        }
        let _ = out.write_all(RESET_ALL_MODES);
        let _ = out.write_all(RESTORE_CURSOR_POS);
        let _ = out.flush();
    }

    fn erase_suggestions(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        let mut out = io::stdout();
        let _ = out.write_all(SAVE_CURSOR_POS);
        let _ = out.write_all(MOVE_CURSOR_DOWN_LEFT);
        for i in 0..n {
            let _ = out.write_all(ERASE_ENTIRE_LINE);
            if i != n - 1 {
                let _ = out.write_all(MOVE_CURSOR_DOWN_LEFT);
            }
        }
        let _ = out.write_all(move_cursor_prev_n_beg(n).as_bytes());
        let _ = out.write_all(RESTORE_CURSOR_POS);
        let _ = out.flush();
    }

    fn get_input_tokens(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.input)
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    fn get_next_tokens_from_token_trie(&self, tokens: &[String]) -> Vec<String> {
        self.token_trie.next_tokens(tokens)
    }

    /// The start of the word the cursor currently sits in: one past the
    /// last space before `cursor_pos`, or 0 if there is none.
    fn current_word_start(&self) -> usize {
        self.input[..self.cursor_pos]
            .iter()
            .rposition(|&b| b == SPACE)
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    fn current_word(&self) -> Vec<u8> {
        self.input[self.current_word_start()..self.cursor_pos].to_vec()
    }

    /// The suggestion-trie group the cursor is currently completing:
    /// `tokens.len()`, decremented by one when the cursor sits inside a word
    /// rather than at its end (i.e. it is still editing that word, not
    /// about to start the next one).
    fn group_index(&self) -> usize {
        let mut group = self.get_input_tokens().len();
        let at_word_end = self.cursor_pos == self.input.len()
            || self.input.get(self.cursor_pos) == Some(&SPACE);
        if !at_word_end && group > 0 {
            group -= 1;
        }
        group
    }

    pub fn populate_rune_trie(&mut self, token_groups: &[Vec<String>]) {
        let max_cols = token_groups.iter().map(|row| row.len()).max().unwrap_or(0);
        let mut columns: Vec<Vec<String>> = vec![Vec::new(); max_cols];
        for row in token_groups {
            for (col_idx, val) in row.iter().enumerate() {
                columns[col_idx].push(val.clone());
            }
        }
        for (idx, column) in columns.iter().enumerate() {
            let pairs: Vec<(&str, u32)> = column
                .iter()
                .map(|w| (w.as_str(), (idx + 1) as u32))
                .collect();
            self.rune_trie.populate(&pairs);
        }
    }

    pub fn populate(&mut self, token_groups: &[Vec<String>]) {
        self.token_trie.populate(token_groups);
        self.populate_rune_trie(token_groups);
    }

    fn handle_backspace(&mut self) {
        if self.erase_character() {
            self.is_changed_input = true;
        }
        self.redraw();
    }

    fn handle_erase_word(&mut self) {
        while self.cursor_pos > 0 && self.input[self.cursor_pos - 1] != SPACE {
            self.erase_character();
        }
        while self.cursor_pos > 0 && self.input[self.cursor_pos - 1] == SPACE {
            self.erase_character();
        }
        self.last_suggestions_printed = 0;
        self.is_changed_input = true;
        self.redraw();
    }

    fn handle_erase_all(&mut self) {
        self.input.clear();
        self.cursor_pos = 0;
        self.last_suggestions_printed = 0;
        self.is_changed_input = true;
        self.redraw();
    }

    fn handle_append_char(&mut self, b: u8) {
        self.input.insert(self.cursor_pos, b);
        self.cursor_pos += 1;
        self.is_changed_input = true;
        self.redraw();
    }

    fn handle_show_suggestions(&mut self) {
        if !self.is_changed_input {
            return;
        }
        let tokens = self.get_input_tokens();
        let group = self.group_index();
        let word = self.current_word();

        let suggestions = if tokens.is_empty() {
            self.rune_trie.get_all_words(1)
        } else if !word.is_empty() {
            let word = String::from_utf8_lossy(&word).to_string();
            if word.contains('*') || word.contains('?') {
                self.rune_trie.fuzzy_search(&word, group as u32)
            } else {
                self.rune_trie.search_prefix(&word, true, group as u32)
            }
        } else {
            self.get_next_tokens_from_token_trie(&tokens)
        };

        let mut unique = suggestions;
        unique.sort();
        unique.dedup();

        self.erase_suggestions(self.last_suggestions_printed);
        self.print_suggestions(&unique);
        self.last_suggestions_printed = unique.len();

        self.is_changed_input = false;
    }

    fn move_cursor(&mut self, left: bool) {
        if left {
            if self.cursor_pos == 0 {
                return;
            }
            self.cursor_pos -= 1;
        } else {
            if self.cursor_pos == self.input.len() {
                return;
            }
            self.cursor_pos += 1;
        }
        self.redraw();
    }

    fn terminal_width() -> usize {
        std::env::var("COLUMNS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|w| *w > 0)
            .unwrap_or(80)
    }

    /// Wraps `input` into display lines the way a long command line wraps:
    /// the first line carries [`PROMPT`], continuation lines carry
    /// [`CONTINUATION_PROMPT`], each line capped at `width` columns. Also
    /// returns the (row, column) the cursor should land at for `cursor_pos`.
    fn layout(input: &[u8], cursor_pos: usize, width: usize) -> (Vec<String>, usize, usize) {
        let mut lines = Vec::new();
        let mut start = 0usize;
        let mut prompt = PROMPT;
        let mut row = 0usize;
        let mut cursor_row = 0usize;
        let mut cursor_col = prompt.len();
        let mut assigned = false;

        loop {
            let budget = width.saturating_sub(prompt.len()).max(1);
            let end = (start + budget).min(input.len());
            let chunk = &input[start..end];
            lines.push(format!("{prompt}{}", String::from_utf8_lossy(chunk)));

            if !assigned && (cursor_pos < end || end == input.len()) {
                cursor_row = row;
                cursor_col = prompt.len() + (cursor_pos - start);
                assigned = true;
            }

            if end == input.len() {
                break;
            }
            start = end;
            prompt = CONTINUATION_PROMPT;
            row += 1;
        }

        (lines, cursor_row, cursor_col)
    }

    /// Re-renders the prompt and buffer from scratch: erases whatever was
    /// drawn last, writes the (possibly wrapped) current line, and leaves
    /// the hardware cursor positioned at `cursor_pos`.
    fn redraw(&mut self) {
        let width = Self::terminal_width();
        let (lines, cursor_row, cursor_col) = Self::layout(&self.input, self.cursor_pos, width);

        let mut out = io::stdout();
        if self.last_cursor_row > 0 {
            let _ = out.write_all(move_cursor_prev_n_beg(self.last_cursor_row).as_bytes());
        } else {
            let _ = out.write_all(b"\r");
        }
        let _ = out.write_all(ERASE_DOWN);

        let last_idx = lines.len() - 1;
        for (i, line) in lines.iter().enumerate() {
            let _ = out.write_all(line.as_bytes());
            if i != last_idx {
                let _ = out.write_all(b"\r\n");
            }
        }

        if last_idx > cursor_row {
            let _ = out.write_all(move_cursor_prev_n_beg(last_idx - cursor_row).as_bytes());
        }
        let _ = out.write_all(move_cursor_to_col(cursor_col + 1).as_bytes());

        self.last_cursor_row = cursor_row;
        let _ = out.flush();
    }

    fn clear_screen_and_redraw(&mut self) {
        let _ = io::stdout().write_all(CLEAR_SCREEN);
        self.last_cursor_row = 0;
        self.redraw();
    }

    /// Parses, validates, and enqueues `line` the same way the HTTP ingress
    /// does, printing a confirmation or `"Invalid command: ..."` on failure.
    fn submit_command(&mut self, line: &str) {
        let task = match parse_task_from_cmd(line) {
            Ok(task) => task,
            Err(e) => {
                println!("Invalid command: {e}");
                return;
            }
        };
        if let Err(e) = task.validate() {
            println!("Invalid command: {e}");
            return;
        }

        let internal_task = InternalTask::new(task);
        let kind = match internal_task.worker_kind() {
            Ok(kind) => kind,
            Err(e) => {
                println!("Invalid command: {e}");
                return;
            }
        };
        let priority = internal_task.priority();
        let task_type = internal_task.task.task_type.clone();

        let backend = self.backend.clone();
        let result = self.runtime.block_on(backend.enqueue(kind, internal_task));
        match result {
            Ok(()) => {
                info!(%task_type, priority, worker_kind = ?kind, "task enqueued via shell");
                println!("Task enqueued! type={task_type} priority={priority}");
            }
            Err(e) => println!("Invalid command: {e}"),
        }
    }

    /// Runs the interactive REPL loop against the current terminal. Returns
    /// once the user types `exit` or sends Ctrl-C.
    pub fn run(&mut self, token_groups: &[Vec<String>]) -> Result<(), ShellError> {
        let guard = RawModeGuard::enable()?;
        self.populate(token_groups);

        let mut byte = [0u8; 1];
        loop {
            self.input.clear();
            self.cursor_pos = 0;
            self.is_changed_input = true;
            self.last_suggestions_printed = 0;
            self.last_cursor_row = 0;
            self.redraw();

            loop {
                if io::stdin().read_exact(&mut byte).is_err() {
                    drop(guard);
                    return Ok(());
                }
                match byte[0] {
                    ENTER_1 | ENTER_2 => break,
                    BACKSPACE_1 | BACKSPACE_2 => self.handle_backspace(),
                    CTRL_C => {
                        println!("\nExiting...");
                        drop(guard);
                        return Ok(());
                    }
                    OPTION_BACKSPACE => self.handle_erase_word(),
                    HORIZONTAL_TAB => self.handle_show_suggestions(),
                    CMD_BACKSPACE => self.handle_erase_all(),
                    ESC => {
                        // Either a 3-byte arrow sequence (ESC '[' 'A'|'B'|'C'|'D')
                        // or the 2-byte "clear screen and redraw" (ESC 'c').
                        let mut next = [0u8; 1];
                        if io::stdin().read_exact(&mut next).is_err() {
                            continue;
                        }
                        match next[0] {
                            b'[' => {
                                let mut arrow = [0u8; 1];
                                if io::stdin().read_exact(&mut arrow).is_err() {
                                    continue;
                                }
                                match arrow[0] {
                                    b'C' => self.move_cursor(false),
                                    b'D' => self.move_cursor(true),
                                    b'A' => {
                                        if let Some(prev) = self.history.prev() {
                                            self.replace_input(prev.to_string());
                                        }
                                    }
                                    b'B' => {
                                        if let Some(next) = self.history.next() {
                                            self.replace_input(next.to_string());
                                        } else {
                                            self.replace_input(String::new());
                                        }
                                    }
                                    _ => {}
                                }
                            }
                            b'c' => self.clear_screen_and_redraw(),
                            _ => {}
                        }
                    }
                    b => self.handle_append_char(b),
                }
            }

            let line = String::from_utf8_lossy(&self.input).to_string();
            println!();
            let trimmed = line.trim();
            if trimmed == "exit" {
                println!("Goodbye...");
                break;
            }
            if !trimmed.is_empty() {
                self.history.add(trimmed);
                self.submit_command(trimmed);
            }
        }

        drop(guard);
        Ok(())
    }

    fn replace_input(&mut self, line: String) {
        self.input = line.into_bytes();
        self.cursor_pos = self.input.len();
        self.is_changed_input = true;
        self.last_suggestions_printed = 0;
        self.redraw();
    }
}

#[cfg(unix)]
struct RawModeGuard {
    fd: std::os::unix::io::RawFd,
    original: termios::Termios,
}

#[cfg(unix)]
impl RawModeGuard {
    fn enable() -> Result<Self, ShellError> {
        use std::os::unix::io::AsRawFd;
        use termios::*;

        let fd = io::stdin().as_raw_fd();
        let original = Termios::from_fd(fd).map_err(ShellError::RawModeEnable)?;
        let mut raw = original.clone();
        raw.c_lflag &= !(ECHO | ICANON | ISIG);
        raw.c_iflag &= !(IXON | ICRNL);
        raw.c_cc[VMIN] = 1;
        raw.c_cc[VTIME] = 0;
        tcsetattr(fd, TCSANOW, &raw).map_err(ShellError::RawModeEnable)?;

        Ok(Self { fd, original })
    }
}

#[cfg(unix)]
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = termios::tcsetattr(self.fd, termios::TCSANOW, &self.original);
    }
}

#[cfg(not(unix))]
struct RawModeGuard;

#[cfg(not(unix))]
impl RawModeGuard {
    fn enable() -> Result<Self, ShellError> {
        Ok(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhive_ingress::LocalBackend;
    use taskhive_queue::manager::QueueManager;

    fn test_shell() -> Shell {
        let manager = Arc::new(QueueManager::new());
        let backend: Arc<dyn Backend> = Arc::new(LocalBackend::new(manager));
        Shell::new(backend, tokio::runtime::Handle::current())
    }

    #[tokio::test]
    async fn erase_character_is_a_no_op_on_empty_input() {
        let mut sh = test_shell();
        assert!(!sh.erase_character());
        assert!(sh.input.is_empty());
    }

    #[tokio::test]
    async fn get_input_tokens_splits_on_whitespace() {
        let mut sh = test_shell();
        sh.input = b"add --type send_email".to_vec();
        assert_eq!(
            sh.get_input_tokens(),
            vec!["add", "--type", "send_email"]
        );
    }

    #[tokio::test]
    async fn populate_rune_trie_groups_by_column_one_indexed() {
        let mut sh = test_shell();
        sh.populate_rune_trie(&[
            vec!["send".to_string(), "email".to_string()],
            vec!["set".to_string(), "name".to_string()],
        ]);
        let mut first_col = sh.rune_trie.get_all_words(1);
        first_col.sort();
        assert_eq!(first_col, vec!["send", "set"]);
    }

    #[tokio::test]
    async fn handle_append_char_inserts_at_cursor() {
        let mut sh = test_shell();
        sh.input = b"ac".to_vec();
        sh.cursor_pos = 1;
        sh.handle_append_char(b'b');
        assert_eq!(sh.input, b"abc");
        assert_eq!(sh.cursor_pos, 2);
    }

    #[tokio::test]
    async fn erase_character_removes_before_cursor_not_the_end() {
        let mut sh = test_shell();
        sh.input = b"abc".to_vec();
        sh.cursor_pos = 2;
        assert!(sh.erase_character());
        assert_eq!(sh.input, b"ac");
        assert_eq!(sh.cursor_pos, 1);
    }

    #[tokio::test]
    async fn current_word_tracks_cursor_not_last_token() {
        let mut sh = test_shell();
        sh.input = b"add --type send".to_vec();
        sh.cursor_pos = 7; // between "--t" and "ype"
        assert_eq!(sh.current_word(), b"--t".to_vec());
    }

    #[tokio::test]
    async fn group_index_decrements_mid_word() {
        let mut sh = test_shell();
        sh.input = b"add --type".to_vec();
        sh.cursor_pos = sh.input.len();
        assert_eq!(sh.group_index(), 2);

        sh.cursor_pos = 5; // inside "--type", not at its end
        assert_eq!(sh.group_index(), 1);
    }

    #[test]
    fn layout_wraps_long_lines_with_continuation_prompt() {
        let input = b"0123456789";
        let (lines, cursor_row, cursor_col) = Shell::layout(input, 10, 15);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with(CONTINUATION_PROMPT));
        assert_eq!(cursor_row, 1);
        assert_eq!(cursor_col, CONTINUATION_PROMPT.len() + 5);
    }
}
